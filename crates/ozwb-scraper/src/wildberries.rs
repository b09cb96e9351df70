//! HTTP client for the Wildberries `cards/v2/detail` endpoint.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{info, warn};

use ozwb_core::{AppConfig, LinkStatus, ProductRecord, ProgressFn, Vendor};

use crate::error::ScrapeError;
use crate::ids::extract_wb_id;
use crate::jsonld::{f64_from_value, i64_from_value, string_field};

/// Connection and query parameters for [`WbClient`].
///
/// `dest` and `spp` are passed through to the card endpoint verbatim; the
/// defaults in [`AppConfig`] reproduce the storefront's own web requests.
#[derive(Debug, Clone)]
pub struct WbConfig {
    pub base_url: String,
    /// Host the bare photo names from the payload are resolved against.
    pub image_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Regional destination parameter (`dest`).
    pub dest: i64,
    /// Loyalty discount parameter (`spp`).
    pub spp: u32,
    /// Divisor mapping minor-unit prices to major units.
    pub price_divisor: u32,
}

impl From<&AppConfig> for WbConfig {
    fn from(config: &AppConfig) -> Self {
        WbConfig {
            base_url: config.wb_base_url.clone(),
            image_base_url: config.wb_image_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            dest: config.wb_dest,
            spp: config.wb_spp,
            price_divisor: config.wb_price_divisor,
        }
    }
}

/// Client for the public Wildberries card detail API.
///
/// One attempt per link, no retries: a failed link is logged with its
/// failure kind and dropped so the rest of the batch proceeds.
pub struct WbClient {
    client: Client,
    config: WbConfig,
}

impl WbClient {
    /// Creates a `WbClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: WbConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetches one product card and maps it onto the canonical record.
    ///
    /// The numeric article is extracted from the link before any request is
    /// made; a link without one is rejected up front.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::MissingProductId`] — no article derivable from the link.
    /// - [`ScrapeError::UnexpectedStatus`] — non-2xx response.
    /// - [`ScrapeError::Deserialize`] — response body is not valid JSON.
    /// - [`ScrapeError::MissingData`] — payload carries no `data.products[0]`.
    /// - [`ScrapeError::Http`] — network failure or timeout.
    pub async fn fetch_product(&self, link: &str) -> Result<ProductRecord, ScrapeError> {
        let article = extract_wb_id(link).ok_or_else(|| ScrapeError::MissingProductId {
            url: link.to_string(),
        })?;
        let url = self.card_url(&article)?;

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let payload =
            serde_json::from_str::<Value>(&body).map_err(|e| ScrapeError::Deserialize {
                context: format!("card payload for article {article}"),
                source: e,
            })?;

        let item = payload
            .get("data")
            .and_then(|d| d.get("products"))
            .and_then(|p| p.get(0))
            .ok_or_else(|| ScrapeError::MissingData {
                node: "data.products[0]",
                url: link.to_string(),
            })?;

        Ok(self.record_from_item(link, &article, item))
    }

    /// Fetches every link in order, skipping failed ones.
    ///
    /// Each failure is logged once with its kind; successful records come
    /// back in input order. The optional callback fires after every link.
    pub async fn fetch_products(
        &self,
        links: &[String],
        progress: Option<&ProgressFn<'_>>,
    ) -> Vec<ProductRecord> {
        let total = links.len();
        let mut records = Vec::with_capacity(total);

        for (idx, link) in links.iter().enumerate() {
            let status = match self.fetch_product(link).await {
                Ok(record) => {
                    info!(url = %link, product_id = %record.product_id, "wildberries card fetched");
                    records.push(record);
                    LinkStatus::Ok
                }
                Err(err) => {
                    warn!(url = %link, kind = %err.kind(), error = %err, "skipping wildberries link");
                    err.link_status()
                }
            };
            if let Some(callback) = progress {
                callback(idx + 1, total, link, status);
            }
        }

        records
    }

    fn card_url(&self, article: &str) -> Result<String, ScrapeError> {
        let base = format!(
            "{}/cards/v2/detail",
            self.config.base_url.trim_end_matches('/')
        );
        let mut url = reqwest::Url::parse(&base).map_err(|e| ScrapeError::InvalidBaseUrl {
            base_url: self.config.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("appType", "1")
            .append_pair("curr", "rub")
            .append_pair("dest", &self.config.dest.to_string())
            .append_pair("spp", &self.config.spp.to_string())
            .append_pair("nm", article);
        Ok(url.to_string())
    }

    fn record_from_item(&self, link: &str, article: &str, item: &Value) -> ProductRecord {
        let product_id = match item.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => article.to_string(),
        };

        let mut record = ProductRecord::new(Vendor::Wildberries, product_id, link);
        record.name = string_field(item, "name");
        record.brand = string_field(item, "brand");
        record.description = string_field(item, "description");
        record.price = self.price_from_item(item);
        record.currency = Some("RUB".to_string());
        record.rating_value = item.get("reviewRating").and_then(f64_from_value);
        record.review_count = item.get("feedbacks").and_then(i64_from_value);
        record.images = self.images_from_item(item);
        record.supplier_id = item.get("supplierId").and_then(i64_from_value);
        record.supplier_name = string_field(item, "supplier");
        record.subject_id = item.get("subjectId").and_then(i64_from_value);
        record
    }

    /// First positive of `sizes[0].price.{product,total,basic}`, divided by
    /// the minor-unit divisor and rounded to two decimals.
    fn price_from_item(&self, item: &Value) -> Option<Decimal> {
        if self.config.price_divisor == 0 {
            return None;
        }
        let price = item.get("sizes")?.get(0)?.get("price")?;
        let divisor = Decimal::from(self.config.price_divisor);
        for key in ["product", "total", "basic"] {
            let Some(minor) = price.get(key).and_then(Value::as_i64) else {
                continue;
            };
            if minor > 0 {
                return Some((Decimal::from(minor) / divisor).round_dp(2).normalize());
            }
        }
        None
    }

    /// First 10 photo entries, each resolved `full` else `big` else `tm`
    /// against the static image host.
    fn images_from_item(&self, item: &Value) -> Vec<String> {
        let Some(photos) = item.get("photos").and_then(Value::as_array) else {
            return Vec::new();
        };
        let base = self.config.image_base_url.trim_end_matches('/');
        photos
            .iter()
            .take(10)
            .filter_map(|photo| {
                ["full", "big", "tm"].iter().find_map(|key| {
                    photo
                        .get(*key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                })
            })
            .map(|name| format!("{base}/{name}"))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
