use crate::error::Result;
use crate::scrapers::page::{Form, Page};
use async_trait::async_trait;
use url::Url;

/// Cookie-keeping browser session used by the crawler.
/// Requests made through one agent share the same session.
#[async_trait]
pub trait WebAgent: Send + Sync {
    /// Fetch a URL, following HTTP redirects
    async fn get(&self, url: &Url) -> Result<Page>;

    /// Submit a form with its current field values
    async fn submit(&self, form: &Form) -> Result<Page>;
}
