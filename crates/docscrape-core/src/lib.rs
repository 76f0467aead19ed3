mod app_config;
mod config;
pub mod pzn;
pub mod record;

pub use app_config::{AppConfig, Environment, FetchMode, ProxySettings, SheetsSettings};
pub use config::{load_app_config, load_app_config_from_env};
pub use pzn::{normalize_pzns, Pzn, PZN_PLACEHOLDER, PZN_WIDTH};
pub use record::{Field, Record, Sentinel, StatusMarker};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not a product number: {0:?}")]
    InvalidPzn(String),

    #[error("unknown column header: {0:?}")]
    UnknownField(String),
}
