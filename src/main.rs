mod config;
mod error;
mod export;
mod models;
mod scrapers;

use models::Credentials;
use scrapers::traits::WebAgent;
use scrapers::{FavoritesCrawler, HttpAgent, SiteConfig};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Zillow Favorites Export");

    let credentials = Credentials::from_env()?;
    let agent = HttpAgent::new()?;

    run(agent, credentials, SiteConfig::default(), Path::new(config::OUTPUT_PATH)).await?;

    Ok(())
}

/// Collect every saved home, then write the CSV. Returns the number of rows written.
async fn run<A: WebAgent>(
    agent: A,
    credentials: Credentials,
    site: SiteConfig,
    output: &Path,
) -> anyhow::Result<usize> {
    let mut crawler = FavoritesCrawler::new(agent, credentials, site)?;

    let listings = crawler.fetch_all_listings().await?;

    // Written only once every listing has been collected
    export::write_csv_file(output, &listings)?;

    Ok(listings.len())
}
