//! Application configuration assembled from `OZWB_*` environment variables.

/// Runtime configuration for the extraction pipeline.
///
/// Every field has a default; see [`crate::config::load_app_config`] for the
/// env keys. Base URLs are configurable so tests can point the clients at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Per-request ceiling for both API clients, seconds.
    pub request_timeout_secs: u64,
    /// Browser-profile user agent sent on every request.
    pub user_agent: String,
    pub ozon_base_url: String,
    pub wb_base_url: String,
    /// Host the Wildberries photo names are resolved against.
    pub wb_image_base_url: String,
    /// Wildberries regional destination parameter (`dest`).
    pub wb_dest: i64,
    /// Wildberries loyalty discount parameter (`spp`).
    pub wb_spp: u32,
    /// Divisor mapping Wildberries minor-unit prices to major units.
    /// Observed as 100 on live responses, not documented by the vendor.
    pub wb_price_divisor: u32,
    /// Pause between rendered-page visits, milliseconds.
    pub page_delay_ms: u64,
}
