use std::time::Duration;

use reqwest::Client;

use super::{FetchedPage, PageFetcher};
use crate::error::ScraperError;

/// Fetches pages straight from the retailer.
///
/// Sends the header set of a desktop browser; the retailer's bot mitigation
/// answers bare clients with 403. The inner client is reused for connection
/// pooling across product numbers.
pub struct DirectFetcher {
    client: Client,
}

impl DirectFetcher {
    /// Creates a `DirectFetcher` with the given per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for DirectFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "de-DE,de;q=0.9,en;q=0.8")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(url, status, bytes = body.len(), "direct fetch complete");

        Ok(FetchedPage { status, body })
    }
}
