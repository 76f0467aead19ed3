//! Page fetchers: the single network capability the extractor depends on.
//!
//! A fetcher performs exactly one request per call and reports whatever
//! status the upstream returned. Interpreting statuses is the extractor's
//! job; only transport-level failures surface as errors here.

mod direct;
mod proxy;

use std::future::Future;

use docscrape_core::{AppConfig, FetchMode};

use crate::error::ScraperError;

pub use direct::DirectFetcher;
pub use proxy::ProxyFetcher;

/// Raw outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedPage {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Fetches a URL once and returns the status and body.
pub trait PageFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on DNS, connection, TLS or timeout
    /// failures. Non-2xx statuses are NOT errors.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send;
}

/// Runtime choice between the direct and the proxied fetcher.
pub enum Fetcher {
    Direct(DirectFetcher),
    Proxy(ProxyFetcher),
}

impl Fetcher {
    /// Builds the fetcher selected by `mode`, using the timeouts and
    /// credentials from `config`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingProxySettings`] if `mode` is
    ///   [`FetchMode::Proxy`] and no proxy API key is configured.
    /// - [`ScraperError::Http`] / [`ScraperError::InvalidUrl`] if the client
    ///   cannot be constructed.
    pub fn from_config(config: &AppConfig, mode: FetchMode) -> Result<Self, ScraperError> {
        match mode {
            FetchMode::Direct => Ok(Self::Direct(DirectFetcher::new(
                config.request_timeout_secs,
                &config.user_agent,
            )?)),
            FetchMode::Proxy => {
                let proxy = config
                    .proxy
                    .as_ref()
                    .ok_or(ScraperError::MissingProxySettings)?;
                Ok(Self::Proxy(ProxyFetcher::with_base_url(
                    &proxy.api_key,
                    config.request_timeout_secs,
                    &proxy.base_url,
                    &proxy.country_code,
                    proxy.render_js,
                )?))
            }
        }
    }
}

impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        match self {
            Fetcher::Direct(f) => f.fetch(url).await,
            Fetcher::Proxy(f) => f.fetch(url).await,
        }
    }
}
