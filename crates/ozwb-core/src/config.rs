use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default browser profile impersonated by the API clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup. Every key is optional and
/// defaulted; only unparseable values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("OZWB_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("OZWB_REQUEST_TIMEOUT_SECS", "25")?;
    let user_agent = or_default("OZWB_USER_AGENT", DEFAULT_USER_AGENT);

    let ozon_base_url = or_default("OZWB_OZON_BASE_URL", "https://www.ozon.ru");
    let wb_base_url = or_default("OZWB_WB_BASE_URL", "https://card.wb.ru");
    let wb_image_base_url = or_default("OZWB_WB_IMAGE_BASE_URL", "https://images.wbstatic.net");

    let wb_dest = parse_i64("OZWB_WB_DEST", "-1257786")?;
    let wb_spp = parse_u32("OZWB_WB_SPP", "30")?;
    let wb_price_divisor = parse_u32("OZWB_WB_PRICE_DIVISOR", "100")?;

    let page_delay_ms = parse_u64("OZWB_PAGE_DELAY_MS", "2000")?;

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        ozon_base_url,
        wb_base_url,
        wb_image_base_url,
        wb_dest,
        wb_spp,
        wb_price_divisor,
        page_delay_ms,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
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
    fn empty_environment_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 25);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.ozon_base_url, "https://www.ozon.ru");
        assert_eq!(cfg.wb_base_url, "https://card.wb.ru");
        assert_eq!(cfg.wb_image_base_url, "https://images.wbstatic.net");
        assert_eq!(cfg.wb_dest, -1257786);
        assert_eq!(cfg.wb_spp, 30);
        assert_eq!(cfg.wb_price_divisor, 100);
        assert_eq!(cfg.page_delay_ms, 2000);
    }

    #[test]
    fn overrides_are_respected() {
        let mut map = HashMap::new();
        map.insert("OZWB_REQUEST_TIMEOUT_SECS", "60");
        map.insert("OZWB_OZON_BASE_URL", "http://127.0.0.1:9999");
        map.insert("OZWB_WB_PRICE_DIVISOR", "1");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
        assert_eq!(cfg.ozon_base_url, "http://127.0.0.1:9999");
        assert_eq!(cfg.wb_price_divisor, 1);
    }

    #[test]
    fn negative_dest_parses() {
        let mut map = HashMap::new();
        map.insert("OZWB_WB_DEST", "-59202");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.wb_dest, -59202);
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut map = HashMap::new();
        map.insert("OZWB_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OZWB_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(OZWB_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn invalid_divisor_is_rejected() {
        let mut map = HashMap::new();
        map.insert("OZWB_WB_PRICE_DIVISOR", "-100");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OZWB_WB_PRICE_DIVISOR"),
            "expected InvalidEnvVar(OZWB_WB_PRICE_DIVISOR), got: {result:?}"
        );
    }
}
