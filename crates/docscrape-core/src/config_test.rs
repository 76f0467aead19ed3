use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "DOCSCRAPE_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_environment() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.product_url_template, "https://www.docmorris.de/{pzn}");
    assert_eq!(cfg.fetch_mode, FetchMode::Direct);
    assert!(cfg.proxy.is_none());
    assert_eq!(cfg.request_timeout_secs, 20);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.delay_min_ms, 1000);
    assert_eq!(cfg.delay_max_ms, 2500);
    assert_eq!(cfg.missing_sentinel, Sentinel::NotAvailable);
    assert!(!cfg.include_image_url);
    assert!(cfg.image_url_template.is_none());
    assert!(cfg.sheets.is_none());
}

#[test]
fn proxy_mode_without_api_key_still_loads() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_FETCH_MODE", "proxy");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
    assert_eq!(cfg.fetch_mode, FetchMode::Proxy);
    assert!(cfg.proxy.is_none());
}

#[test]
fn proxy_mode_with_key_uses_proxy_defaults() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_FETCH_MODE", "PROXY");
    map.insert("DOCSCRAPE_PROXY_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_mode, FetchMode::Proxy);
    let proxy = cfg.proxy.expect("proxy settings");
    assert_eq!(proxy.api_key, "secret-key");
    assert_eq!(proxy.base_url, "https://api.scraperapi.com/");
    assert_eq!(proxy.country_code, "de");
    assert!(!proxy.render_js);
}

#[test]
fn proxy_render_js_flag_is_parsed() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_PROXY_API_KEY", "k");
    map.insert("DOCSCRAPE_PROXY_RENDER_JS", "yes");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.proxy.unwrap().render_js);

    map.insert("DOCSCRAPE_PROXY_RENDER_JS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DOCSCRAPE_PROXY_RENDER_JS"),
        "got: {result:?}"
    );
}

#[test]
fn unknown_fetch_mode_is_rejected() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_FETCH_MODE", "carrier-pigeon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DOCSCRAPE_FETCH_MODE"),
        "got: {result:?}"
    );
}

#[test]
fn product_url_template_requires_placeholder() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_PRODUCT_URL_TEMPLATE", "https://example.com/product");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DOCSCRAPE_PRODUCT_URL_TEMPLATE"),
        "got: {result:?}"
    );
}

#[test]
fn image_url_template_requires_placeholder() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_IMAGE_URL_TEMPLATE", "https://cdn.example.com/img.jpg");
    assert!(build_app_config(lookup_from_map(&map)).is_err());

    map.insert(
        "DOCSCRAPE_IMAGE_URL_TEMPLATE",
        "https://cdn.example.com/{pzn}.jpg",
    );
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.image_url_template.as_deref(),
        Some("https://cdn.example.com/{pzn}.jpg")
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DOCSCRAPE_REQUEST_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn delay_bounds_must_be_ordered() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_DELAY_MIN_MS", "3000");
    map.insert("DOCSCRAPE_DELAY_MAX_MS", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DOCSCRAPE_DELAY_MAX_MS"),
        "got: {result:?}"
    );
}

#[test]
fn delay_bounds_override() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_DELAY_MIN_MS", "0");
    map.insert("DOCSCRAPE_DELAY_MAX_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!((cfg.delay_min_ms, cfg.delay_max_ms), (0, 0));
}

#[test]
fn missing_sentinel_policy() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_MISSING_SENTINEL", "empty");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.missing_sentinel, Sentinel::Empty);

    map.insert("DOCSCRAPE_MISSING_SENTINEL", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.missing_sentinel, Sentinel::Empty);

    map.insert("DOCSCRAPE_MISSING_SENTINEL", "???");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn sheets_settings_need_token_and_spreadsheet_id() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_SHEETS_ACCESS_TOKEN", "ya29.token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.sheets.is_none());

    map.insert("DOCSCRAPE_SHEETS_SPREADSHEET_ID", "sheet-123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let sheets = cfg.sheets.expect("sheets settings");
    assert_eq!(sheets.spreadsheet_id, "sheet-123");
    assert_eq!(sheets.worksheet, "Sheet1");
    assert_eq!(sheets.base_url, "https://sheets.googleapis.com/");
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("DOCSCRAPE_PROXY_API_KEY", "super-secret-key");
    map.insert("DOCSCRAPE_SHEETS_ACCESS_TOKEN", "super-secret-token");
    map.insert("DOCSCRAPE_SHEETS_SPREADSHEET_ID", "sheet-123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-key"));
    assert!(!rendered.contains("super-secret-token"));
    assert!(rendered.contains("[redacted]"));
}
