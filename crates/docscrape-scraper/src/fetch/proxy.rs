//! Fetching through a scraping-proxy API.
//!
//! The proxy takes the target page as a query parameter and answers with
//! the upstream's status and body, so the extractor sees the same shape as
//! with a direct fetch.

use std::time::Duration;

use reqwest::{Client, Url};

use super::{FetchedPage, PageFetcher};
use crate::error::ScraperError;

pub struct ProxyFetcher {
    client: Client,
    api_key: String,
    base_url: Url,
    country_code: String,
    render_js: bool,
}

impl ProxyFetcher {
    /// Creates a proxy fetcher pointed at `base_url` (the proxy API root).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        country_code: &str,
        render_js: bool,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Keep exactly one trailing slash so query parameters land on the root path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            country_code: country_code.to_owned(),
            render_js,
        })
    }

    /// Builds the proxy request URL for `target`. All parameters are
    /// URL-encoded, including the target's own query string.
    fn request_url(&self, target: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("url", target)
            .append_pair("country_code", &self.country_code)
            .append_pair("render", if self.render_js { "true" } else { "false" });
        url
    }
}

impl PageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let request_url = self.request_url(url);
        let response = self.client.get(request_url).send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(url, status, bytes = body.len(), "proxy fetch complete");

        Ok(FetchedPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(render_js: bool) -> ProxyFetcher {
        ProxyFetcher::with_base_url("k3y", 5, "https://proxy.example.com", "de", render_js)
            .expect("valid proxy fetcher")
    }

    #[test]
    fn request_url_encodes_target_and_parameters() {
        let url = fetcher(false).request_url("https://www.docmorris.de/00040554?x=1&y=2");
        assert_eq!(
            url.as_str(),
            "https://proxy.example.com/?api_key=k3y&url=https%3A%2F%2Fwww.docmorris.de%2F00040554%3Fx%3D1%26y%3D2&country_code=de&render=false"
        );
    }

    #[test]
    fn request_url_sets_render_flag() {
        let url = fetcher(true).request_url("https://www.docmorris.de/00040554");
        assert!(url.as_str().ends_with("render=true"), "got {url}");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ProxyFetcher::with_base_url("k", 5, "not a url", "de", false);
        assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
    }
}
