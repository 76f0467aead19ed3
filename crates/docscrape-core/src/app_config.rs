use crate::Sentinel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How product pages are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Straight from the retailer with browser-like headers.
    Direct,
    /// Through the scraping proxy configured in [`ProxySettings`].
    Proxy,
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMode::Direct => write!(f, "direct"),
            FetchMode::Proxy => write!(f, "proxy"),
        }
    }
}

#[derive(Clone)]
pub struct ProxySettings {
    pub api_key: String,
    pub base_url: String,
    pub country_code: String,
    pub render_js: bool,
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("country_code", &self.country_code)
            .field("render_js", &self.render_js)
            .finish()
    }
}

#[derive(Clone)]
pub struct SheetsSettings {
    pub access_token: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub base_url: String,
}

impl std::fmt::Debug for SheetsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSettings")
            .field("access_token", &"[redacted]")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("worksheet", &self.worksheet)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Product page URL with a `{pzn}` placeholder.
    pub product_url_template: String,
    pub fetch_mode: FetchMode,
    /// Present whenever `DOCSCRAPE_PROXY_API_KEY` is set; required for
    /// [`FetchMode::Proxy`].
    pub proxy: Option<ProxySettings>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub missing_sentinel: Sentinel,
    pub include_image_url: bool,
    /// Product image URL with a `{pzn}` placeholder.
    pub image_url_template: Option<String>,
    /// Present only when both the access token and spreadsheet id are set.
    pub sheets: Option<SheetsSettings>,
}
