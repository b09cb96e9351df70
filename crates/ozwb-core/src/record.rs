//! Canonical record types shared by every adapter.

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marketplace that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Ozon,
    Wildberries,
}

impl Vendor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Ozon => "ozon",
            Vendor::Wildberries => "wildberries",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Vendor {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ozon" => Ok(Vendor::Ozon),
            "wildberries" | "wb" => Ok(Vendor::Wildberries),
            other => Err(crate::CoreError::UnknownVendor(other.to_string())),
        }
    }
}

/// Canonical, vendor-agnostic product representation.
///
/// One record is produced per successfully parsed link and lives in memory
/// for the duration of a single run. `vendor` is set at construction and
/// never reassigned afterwards. `product_id` is never empty: adapters drop
/// links they cannot derive an id for instead of emitting a blank key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub vendor: Vendor,
    /// Vendor-local identifier; unique within one vendor's result set but
    /// not across vendors.
    pub product_id: String,
    /// Source URL exactly as the caller supplied it.
    pub url: String,
    /// `None` means "not found", never "empty string".
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    /// Major-unit price in the vendor's currency; non-negative when present.
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    /// Vendor-reported stock state; populated on structured-data paths only.
    pub availability: Option<String>,
    pub rating_value: Option<f64>,
    pub review_count: Option<i64>,
    /// Image URLs in vendor-provided order; may be empty.
    #[serde(default)]
    pub images: Vec<String>,
    /// Multi-seller marketplace extensions; Wildberries only, absent elsewhere.
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
    pub subject_id: Option<i64>,
}

impl ProductRecord {
    /// Record with identity fields set and every optional field absent.
    #[must_use]
    pub fn new(vendor: Vendor, product_id: impl Into<String>, url: impl Into<String>) -> Self {
        ProductRecord {
            vendor,
            product_id: product_id.into(),
            url: url.into(),
            name: None,
            brand: None,
            description: None,
            price: None,
            currency: None,
            availability: None,
            rating_value: None,
            review_count: None,
            images: Vec::new(),
            supplier_id: None,
            supplier_name: None,
            subject_id: None,
        }
    }
}

/// Price capture from one rendered product page.
///
/// Out-of-stock pages still yield a `PagePrice` with both prices `None`;
/// pages that failed to load yield nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePrice {
    pub url: String,
    pub product_id: String,
    pub name: Option<String>,
    pub price_with_card: Option<Decimal>,
    pub price_without_card: Option<Decimal>,
    /// Local ISO-8601 capture time, second precision.
    pub captured_at: String,
}

/// Local ISO-8601 timestamp at second precision, e.g. `2025-11-03T14:21:07`.
#[must_use]
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Vendor::Ozon).unwrap(), "\"ozon\"");
        assert_eq!(
            serde_json::to_string(&Vendor::Wildberries).unwrap(),
            "\"wildberries\""
        );
    }

    #[test]
    fn vendor_parses_aliases() {
        assert_eq!("ozon".parse::<Vendor>().unwrap(), Vendor::Ozon);
        assert_eq!("WB".parse::<Vendor>().unwrap(), Vendor::Wildberries);
        assert_eq!(
            " wildberries ".parse::<Vendor>().unwrap(),
            Vendor::Wildberries
        );
        assert!("amazon".parse::<Vendor>().is_err());
    }

    #[test]
    fn new_record_has_no_optional_fields() {
        let record = ProductRecord::new(Vendor::Ozon, "123456789", "https://www.ozon.ru/product/x-123456789/");
        assert_eq!(record.vendor, Vendor::Ozon);
        assert_eq!(record.product_id, "123456789");
        assert!(record.name.is_none());
        assert!(record.price.is_none());
        assert!(record.images.is_empty());
        assert!(record.supplier_id.is_none());
    }

    #[test]
    fn record_price_round_trips_as_string() {
        let mut record = ProductRecord::new(Vendor::Wildberries, "987654", "https://example.test");
        record.price = Some(Decimal::new(19950, 2)); // 199.50
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"price\":\"199.50\""), "json: {json}");
        let back: ProductRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn timestamp_is_iso_second_precision() {
        let ts = now_timestamp();
        // 2025-11-03T14:21:07
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[16..17], ":");
    }
}
