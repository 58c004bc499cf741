use crate::error::{ExportError, Result};
use crate::scrapers::page::{Form, FormMethod, Page};
use crate::scrapers::traits::WebAgent;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP session backed by reqwest with an in-memory cookie jar
pub struct HttpAgent {
    client: Client,
}

impl HttpAgent {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|source| ExportError::Network {
                url: "<client setup>".to_string(),
                source,
            })?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &Url, request: RequestBuilder) -> Result<Page> {
        let network = |source: reqwest::Error| ExportError::Network {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(network)?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
        }
        let response = response.error_for_status().map_err(network)?;

        let final_url = response.url().clone();
        let body = response.text().await.map_err(network)?;

        debug!("Downloaded {} bytes from {}", body.len(), final_url);

        Ok(Page::new(final_url, body))
    }
}

#[async_trait]
impl WebAgent for HttpAgent {
    async fn get(&self, url: &Url) -> Result<Page> {
        debug!("GET {}", url);
        self.fetch(url, self.client.get(url.clone())).await
    }

    async fn submit(&self, form: &Form) -> Result<Page> {
        let request = match form.method {
            FormMethod::Post => self.client.post(form.action.clone()).form(form.fields()),
            FormMethod::Get => self.client.get(form.action.clone()).query(form.fields()),
        };

        debug!("Submitting form `{}` to {}", form.name, form.action);
        self.fetch(&form.action, request).await
    }
}
