use crate::error::{ExportError, Result};
use crate::models::{Credentials, ListingRecord};
use crate::scrapers::detail::DetailExtractor;
use crate::scrapers::page::Page;
use crate::scrapers::traits::WebAgent;
use crate::scrapers::types::SiteConfig;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Favorites pagination links. Page numbers are capped at three digits.
const PAGINATION_PATTERN: &str = r"/myzillow/Favorites\.htm\?p=\d{1,3}\b";

/// Detail pages are linked from listing photos
const DETAIL_PATTERN: &str = "/homedetails";

/// Logs into the site and walks the saved-homes list
pub struct FavoritesCrawler<A: WebAgent> {
    agent: A,
    credentials: Credentials,
    site: SiteConfig,
    extractor: DetailExtractor,
    pagination: Regex,
    detail: Regex,
    logged_in: bool,
}

impl<A: WebAgent> FavoritesCrawler<A> {
    pub fn new(agent: A, credentials: Credentials, site: SiteConfig) -> Result<Self> {
        let extractor = DetailExtractor::new(site.canonical_host.clone())?;

        Ok(Self {
            agent,
            credentials,
            site,
            extractor,
            pagination: pattern(PAGINATION_PATTERN)?,
            detail: pattern(DETAIL_PATTERN)?,
            logged_in: false,
        })
    }

    fn favorites_url(&self) -> Result<Url> {
        Url::parse(&self.site.favorites_url).map_err(|source| ExportError::InvalidUrl {
            href: self.site.favorites_url.clone(),
            base: String::new(),
            source,
        })
    }

    /// Sign in through the login form on the favorites page. No-op once signed in.
    pub async fn ensure_logged_in(&mut self) -> Result<()> {
        if self.logged_in {
            return Ok(());
        }

        info!("Logging in as {}...", self.credentials.username);

        let page = self.agent.get(&self.favorites_url()?).await?;

        let mut form = page.form(&self.site.login_form)?.ok_or_else(|| {
            ExportError::Authentication(format!(
                "no form named `{}` on {}",
                self.site.login_form, page.url
            ))
        })?;

        for (field, value) in [
            (&self.site.email_field, &self.credentials.username),
            (&self.site.password_field, &self.credentials.password),
        ] {
            if !form.set(field, value) {
                return Err(ExportError::Authentication(format!(
                    "login form has no `{}` field",
                    field
                )));
            }
        }

        let response = self.agent.submit(&form).await?;

        // A rejected login serves the form again
        if response.form(&self.site.login_form)?.is_some() {
            return Err(ExportError::Authentication(format!(
                "credentials for {} were rejected",
                self.credentials.username
            )));
        }

        self.logged_in = true;
        info!("✅ Logged in");

        Ok(())
    }

    /// Scrape every saved home, in the order the site lists them
    pub async fn fetch_all_listings(&mut self) -> Result<Vec<ListingRecord>> {
        self.ensure_logged_in().await?;

        let landing = self.agent.get(&self.favorites_url()?).await?;
        let first = match landing.meta_refresh()? {
            Some(target) => {
                debug!("Following meta refresh to {}", target);
                self.agent.get(&target).await?
            }
            None => landing,
        };

        let mut visited: HashSet<Url> = HashSet::new();
        visited.insert(first.url.clone());

        let mut pages = Vec::new();
        for link in first.links()? {
            if !self.pagination.is_match(&link.href) {
                continue;
            }
            let url = first.resolve(&link.href)?;
            if visited.insert(url.clone()) {
                pages.push(url);
            }
        }

        info!("Found {} additional favorites pages", pages.len());

        let mut listings = Vec::new();
        self.process_favorites_page(&first, &mut listings).await?;

        for url in pages {
            let page = self.agent.get(&url).await?;
            self.process_favorites_page(&page, &mut listings).await?;
        }

        info!("Scraped {} saved homes", listings.len());

        Ok(listings)
    }

    /// Fetch and extract every photo-linked detail page on one listing page
    async fn process_favorites_page(
        &self,
        page: &Page,
        listings: &mut Vec<ListingRecord>,
    ) -> Result<()> {
        let details = self.detail_links(page)?;
        info!("{}: {} homes", page.url, details.len());

        if details.is_empty() {
            warn!("No listing links found on {}", page.url);
        }

        for url in details {
            debug!("Fetching {}", url);
            let detail = self.agent.get(&url).await?;
            listings.push(self.extractor.extract(&detail)?);
        }

        Ok(())
    }

    fn detail_links(&self, page: &Page) -> Result<Vec<Url>> {
        page.links()?
            .into_iter()
            .filter(|link| link.text.is_empty() && self.detail.is_match(&link.href))
            .map(|link| page.resolve(&link.href))
            .collect()
    }
}

fn pattern(re: &str) -> Result<Regex> {
    Regex::new(re).map_err(|e| ExportError::Selector {
        pattern: re.to_string(),
        reason: e.to_string(),
    })
}
