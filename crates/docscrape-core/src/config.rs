use crate::app_config::{AppConfig, Environment, FetchMode, ProxySettings, SheetsSettings};
use crate::{ConfigError, Sentinel, PZN_PLACEHOLDER};

const DEFAULT_PRODUCT_URL_TEMPLATE: &str = "https://www.docmorris.de/{pzn}";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_bool_flag(&or_default(var, default)).ok_or_else(|| {
            invalid(var, "expected one of true/false/1/0/yes/no".to_string())
        })
    };

    let url_template = |var: &str, raw: String| -> Result<String, ConfigError> {
        if raw.contains(PZN_PLACEHOLDER) {
            Ok(raw)
        } else {
            Err(invalid(var, format!("template must contain {PZN_PLACEHOLDER}")))
        }
    };

    let env = parse_environment(&or_default("DOCSCRAPE_ENV", "development"))?;
    let log_level = or_default("DOCSCRAPE_LOG_LEVEL", "info");

    let product_url_template = url_template(
        "DOCSCRAPE_PRODUCT_URL_TEMPLATE",
        or_default("DOCSCRAPE_PRODUCT_URL_TEMPLATE", DEFAULT_PRODUCT_URL_TEMPLATE),
    )?;

    let fetch_mode = parse_fetch_mode(&or_default("DOCSCRAPE_FETCH_MODE", "direct"))?;
    let proxy = match optional("DOCSCRAPE_PROXY_API_KEY") {
        Some(api_key) => Some(ProxySettings {
            api_key,
            base_url: or_default("DOCSCRAPE_PROXY_BASE_URL", "https://api.scraperapi.com/"),
            country_code: or_default("DOCSCRAPE_PROXY_COUNTRY_CODE", "de"),
            render_js: parse_bool("DOCSCRAPE_PROXY_RENDER_JS", "false")?,
        }),
        None => None,
    };

    let request_timeout_secs = parse_u64("DOCSCRAPE_REQUEST_TIMEOUT_SECS", "20")?;
    let user_agent = or_default("DOCSCRAPE_USER_AGENT", DEFAULT_USER_AGENT);

    let delay_min_ms = parse_u64("DOCSCRAPE_DELAY_MIN_MS", "1000")?;
    let delay_max_ms = parse_u64("DOCSCRAPE_DELAY_MAX_MS", "2500")?;
    if delay_min_ms > delay_max_ms {
        return Err(invalid(
            "DOCSCRAPE_DELAY_MAX_MS",
            format!("must be >= DOCSCRAPE_DELAY_MIN_MS ({delay_min_ms})"),
        ));
    }

    // Read raw so that an explicitly empty value selects the empty sentinel.
    let missing_sentinel = match lookup("DOCSCRAPE_MISSING_SENTINEL") {
        Ok(raw) => raw
            .parse::<Sentinel>()
            .map_err(|reason| invalid("DOCSCRAPE_MISSING_SENTINEL", reason))?,
        Err(_) => Sentinel::default(),
    };

    let include_image_url = parse_bool("DOCSCRAPE_INCLUDE_IMAGE_URL", "false")?;
    let image_url_template = optional("DOCSCRAPE_IMAGE_URL_TEMPLATE")
        .map(|raw| url_template("DOCSCRAPE_IMAGE_URL_TEMPLATE", raw))
        .transpose()?;

    let sheets = match (
        optional("DOCSCRAPE_SHEETS_ACCESS_TOKEN"),
        optional("DOCSCRAPE_SHEETS_SPREADSHEET_ID"),
    ) {
        (Some(access_token), Some(spreadsheet_id)) => Some(SheetsSettings {
            access_token,
            spreadsheet_id,
            worksheet: or_default("DOCSCRAPE_SHEETS_WORKSHEET", "Sheet1"),
            base_url: or_default(
                "DOCSCRAPE_SHEETS_BASE_URL",
                "https://sheets.googleapis.com/",
            ),
        }),
        _ => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        product_url_template,
        fetch_mode,
        proxy,
        request_timeout_secs,
        user_agent,
        delay_min_ms,
        delay_max_ms,
        missing_sentinel,
        include_image_url,
        image_url_template,
        sheets,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DOCSCRAPE_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

fn parse_fetch_mode(s: &str) -> Result<FetchMode, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "direct" => Ok(FetchMode::Direct),
        "proxy" => Ok(FetchMode::Proxy),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DOCSCRAPE_FETCH_MODE".to_string(),
            reason: format!("expected direct or proxy; got {other:?}"),
        }),
    }
}

fn parse_bool_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
