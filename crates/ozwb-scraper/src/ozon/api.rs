//! HTTP client for the Ozon composer JSON API.
//!
//! The composer endpoint returns the page's server-side state for a given
//! storefront URL; the product payload inside it is a JSON-LD document,
//! mapped with the shared structured-data mapping.

use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use ozwb_core::{AppConfig, CookieEntry, LinkStatus, ProductRecord, ProgressFn, Vendor};

use crate::error::ScrapeError;
use crate::ids::extract_ozon_id;
use crate::jsonld;

/// Percent-encoding set for the relative page URL passed to the composer
/// endpoint: everything but unreserved chars, `/`, and `:` is escaped.
const RELATIVE_PAGE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/')
    .remove(b':');

/// Storefront headers the web client sends on every composer call.
const STOREFRONT_HEADERS: [(&str, &str); 6] = [
    ("x-o3-app-name", "ozon-app-web"),
    ("x-o3-app-version", "d0.0.0"),
    ("x-o3-channel", "web"),
    ("x-o3-device-type", "pc"),
    ("x-o3-geo-region-id", "213"),
    ("x-o3-language", "ru"),
];

/// Connection parameters for [`OzonClient`].
#[derive(Debug, Clone)]
pub struct OzonConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl From<&AppConfig> for OzonConfig {
    fn from(config: &AppConfig) -> Self {
        OzonConfig {
            base_url: config.ozon_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Client for the composer API with a browser-session request profile.
///
/// Cookies exported from an authenticated browser session are seeded into
/// the cookie jar; the session tokens among them are additionally promoted
/// to the headers the storefront expects (`Authorization`, `x-o3-device-id`,
/// `x-o3-session-id`). One attempt per link, no retries.
#[derive(Debug)]
pub struct OzonClient {
    client: Client,
    base_url: String,
    base_host: String,
}

impl OzonClient {
    /// Creates an `OzonClient` with the storefront request profile and the
    /// given session cookies.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::InvalidBaseUrl`] — the configured base URL does not parse.
    /// - [`ScrapeError::InvalidHeader`] — a promoted cookie value is not a valid header.
    /// - [`ScrapeError::Http`] — the underlying `reqwest::Client` cannot be constructed.
    pub fn new(config: &OzonConfig, cookies: &[CookieEntry]) -> Result<Self, ScrapeError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base = reqwest::Url::parse(&base_url).map_err(|e| ScrapeError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let base_host = base
            .host_str()
            .ok_or_else(|| ScrapeError::InvalidBaseUrl {
                base_url: config.base_url.clone(),
                reason: "missing host".to_string(),
            })?
            .to_lowercase();

        let headers = Self::default_headers(&base_url, cookies)?;

        let jar = Jar::default();
        for cookie in cookies {
            let mut cookie_str = format!(
                "{}={}; Path={}",
                cookie.name,
                cookie.value,
                cookie.path.as_deref().unwrap_or("/")
            );
            if let Some(domain) = &cookie.domain {
                cookie_str.push_str("; Domain=");
                cookie_str.push_str(domain);
            }
            jar.add_cookie_str(&cookie_str, &base);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_provider(Arc::new(jar))
            .build()?;

        Ok(Self {
            client,
            base_url,
            base_host,
        })
    }

    fn default_headers(
        base_url: &str,
        cookies: &[CookieEntry],
    ) -> Result<HeaderMap, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(
            header::ORIGIN,
            header_value("Origin", base_url)?,
        );
        headers.insert(
            header::REFERER,
            header_value("Referer", &format!("{base_url}/"))?,
        );
        for (name, value) in STOREFRONT_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }

        // Session tokens ride both in the jar and as headers.
        if let Some(token) = cookie_value(cookies, "__Secure-access-token") {
            headers.insert(
                header::AUTHORIZATION,
                header_value("Authorization", &format!("Bearer {token}"))?,
            );
        }
        if let Some(device_id) = cookie_value(cookies, "rfuid") {
            headers.insert("x-o3-device-id", header_value("x-o3-device-id", device_id)?);
        }
        if let Some(session_id) = cookie_value(cookies, "xcid") {
            headers.insert(
                "x-o3-session-id",
                header_value("x-o3-session-id", session_id)?,
            );
        }
        Ok(headers)
    }

    /// Primes anti-bot cookies with a `GET` of the storefront root.
    ///
    /// The response status is deliberately ignored; only reaching the host
    /// matters.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on a network failure or timeout.
    pub async fn warm_up(&self) -> Result<(), ScrapeError> {
        self.client.get(&self.base_url).send().await?;
        Ok(())
    }

    /// Fetches one product through the composer API and maps its embedded
    /// JSON-LD payload onto the canonical record.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::ForeignUrl`] — the link does not belong to the storefront.
    /// - [`ScrapeError::UnexpectedStatus`] — non-2xx response.
    /// - [`ScrapeError::Deserialize`] — composer response or embedded payload is not valid JSON.
    /// - [`ScrapeError::MissingData`] — no `seo.script[0].innerHTML` in the payload.
    /// - [`ScrapeError::MissingProductId`] — no id in the payload or the URL.
    /// - [`ScrapeError::Http`] — network failure or timeout.
    pub async fn fetch_product(&self, link: &str) -> Result<ProductRecord, ScrapeError> {
        let rel = self.relative_page_url(link)?;
        let api_url = format!(
            "{}/api/composer-api.bx/page/json/v2?url={rel}",
            self.base_url
        );

        let response = self.client.get(&api_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: api_url,
            });
        }

        let body = response.text().await?;
        let payload =
            serde_json::from_str::<Value>(&body).map_err(|e| ScrapeError::Deserialize {
                context: format!("composer payload for {link}"),
                source: e,
            })?;

        let script = payload
            .get("seo")
            .and_then(|s| s.get("script"))
            .and_then(|s| s.get(0))
            .and_then(|s| s.get("innerHTML"))
            .and_then(Value::as_str)
            .ok_or_else(|| ScrapeError::MissingData {
                node: "seo.script[0].innerHTML",
                url: link.to_string(),
            })?;
        let block =
            serde_json::from_str::<Value>(script).map_err(|e| ScrapeError::Deserialize {
                context: format!("embedded structured data for {link}"),
                source: e,
            })?;

        let product_id = jsonld::sku_from_block(&block)
            .or_else(|| web_product_id(&payload))
            .or_else(|| extract_ozon_id(link))
            .ok_or_else(|| ScrapeError::MissingProductId {
                url: link.to_string(),
            })?;

        let mut record =
            jsonld::record_from_block(Vendor::Ozon, product_id, link.to_string(), &block);
        if record.name.is_none() {
            record.name = payload
                .get("seo")
                .and_then(|s| jsonld::string_field(s, "title"));
        }
        Ok(record)
    }

    /// Fetches every link in order, skipping failed ones.
    ///
    /// The storefront root is warmed up once before the first product call;
    /// a warm-up failure is logged and the batch proceeds anyway. The
    /// optional callback fires after every link.
    pub async fn fetch_products(
        &self,
        links: &[String],
        progress: Option<&ProgressFn<'_>>,
    ) -> Vec<ProductRecord> {
        if links.is_empty() {
            return Vec::new();
        }
        if let Err(err) = self.warm_up().await {
            warn!(kind = %err.kind(), error = %err, "storefront warm-up failed");
        }

        let total = links.len();
        let mut records = Vec::with_capacity(total);

        for (idx, link) in links.iter().enumerate() {
            let status = match self.fetch_product(link).await {
                Ok(record) => {
                    info!(url = %link, product_id = %record.product_id, "ozon product fetched");
                    records.push(record);
                    LinkStatus::Ok
                }
                Err(err) => {
                    warn!(url = %link, kind = %err.kind(), error = %err, "skipping ozon link");
                    err.link_status()
                }
            };
            if let Some(callback) = progress {
                callback(idx + 1, total, link, status);
            }
        }

        records
    }

    /// Relative page URL (`path?query`) for the composer call, checked to
    /// belong to the storefront and percent-encoded keeping `/` and `:`.
    ///
    /// The raw link is split by hand so pre-encoded input is not encoded a
    /// second time differently from raw Cyrillic input.
    fn relative_page_url(&self, link: &str) -> Result<String, ScrapeError> {
        let foreign = || ScrapeError::ForeignUrl {
            url: link.to_string(),
        };
        let without_fragment = link.split('#').next().unwrap_or(link);
        let rest = without_fragment
            .split_once("://")
            .map(|(_, rest)| rest)
            .ok_or_else(foreign)?;
        let (host, path_query) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        if !self.host_matches(host) {
            return Err(foreign());
        }
        Ok(utf8_percent_encode(path_query, RELATIVE_PAGE).to_string())
    }

    fn host_matches(&self, host: &str) -> bool {
        let bare = host.split(':').next().unwrap_or(host).to_lowercase();
        bare.contains("ozon") || bare == self.base_host
    }
}

fn cookie_value<'a>(cookies: &'a [CookieEntry], name: &str) -> Option<&'a str> {
    cookies
        .iter()
        .find(|cookie| cookie.name == name)
        .map(|cookie| cookie.value.as_str())
}

fn header_value(name: &'static str, raw: &str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(raw).map_err(|e| ScrapeError::InvalidHeader {
        name,
        reason: e.to_string(),
    })
}

/// `widgetStates.webProductId`, as a string or a bare number.
fn web_product_id(payload: &Value) -> Option<String> {
    match payload.get("widgetStates")?.get("webProductId")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
