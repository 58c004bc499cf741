pub mod agent;
pub mod detail;
pub mod favorites;
pub mod page;
pub mod traits;
pub mod types;

pub use agent::HttpAgent;
pub use favorites::FavoritesCrawler;
pub use types::SiteConfig;
