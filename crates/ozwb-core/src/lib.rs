use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod cookies;
pub mod links;
pub mod progress;
pub mod record;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use cookies::{parse_cookie_header, read_cookies_json, CookieEntry};
pub use links::{parse_link_list, read_link_list};
pub use progress::{LinkStatus, ProgressFn};
pub use record::{now_timestamp, PagePrice, ProductRecord, Vendor};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid cookie JSON in {path}: {source}")]
    CookieJson {
        path: String,
        source: serde_json::Error,
    },
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
