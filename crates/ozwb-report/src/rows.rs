//! Row shapes for the CSV report schemas.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ozwb_core::{PagePrice, ProductRecord, Vendor};

/// One positionally paired Ozon/Wildberries row.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedRow {
    pub name: String,
    pub ozon_url: String,
    pub wb_url: String,
    pub price_ozon_card: Option<Decimal>,
    /// Not a column of its own; feeds the legacy merged price only.
    pub price_ozon_no_card: Option<Decimal>,
    pub price_wb: Option<Decimal>,
    pub wb_article: String,
    pub parsed_at: String,
}

impl PairedRow {
    /// Single price for the legacy schema: the with-card Ozon price, else
    /// the without-card one, else the Wildberries price.
    #[must_use]
    pub fn merged_price(&self) -> Option<Decimal> {
        self.price_ozon_card
            .or(self.price_ozon_no_card)
            .or(self.price_wb)
    }
}

/// Flat export row; field order is the column order.
///
/// The schema carries no availability column, so records read back from a
/// flat file always have `availability` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FlatRow {
    vendor: Vendor,
    product_id: String,
    url: String,
    name: Option<String>,
    brand: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    currency: Option<String>,
    rating_value: Option<f64>,
    review_count: Option<i64>,
    /// Image URLs joined with `|`; empty lists serialize as an empty cell.
    images: Option<String>,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    subject_id: Option<i64>,
}

impl From<&ProductRecord> for FlatRow {
    fn from(record: &ProductRecord) -> Self {
        FlatRow {
            vendor: record.vendor,
            product_id: record.product_id.clone(),
            url: record.url.clone(),
            name: record.name.clone(),
            brand: record.brand.clone(),
            description: record.description.clone(),
            price: record.price,
            currency: record.currency.clone(),
            rating_value: record.rating_value,
            review_count: record.review_count,
            images: if record.images.is_empty() {
                None
            } else {
                Some(record.images.join("|"))
            },
            supplier_id: record.supplier_id,
            supplier_name: record.supplier_name.clone(),
            subject_id: record.subject_id,
        }
    }
}

impl FlatRow {
    pub(crate) fn into_record(self) -> ProductRecord {
        let mut record = ProductRecord::new(self.vendor, self.product_id, self.url);
        record.name = self.name;
        record.brand = self.brand;
        record.description = self.description;
        record.price = self.price;
        record.currency = self.currency;
        record.rating_value = self.rating_value;
        record.review_count = self.review_count;
        record.images = self
            .images
            .map(|joined| joined.split('|').map(str::to_string).collect())
            .unwrap_or_default();
        record.supplier_id = self.supplier_id;
        record.supplier_name = self.supplier_name;
        record.subject_id = self.subject_id;
        record
    }
}

/// Rendered-page price row; `timestamp` is the column name for
/// [`PagePrice::captured_at`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PagePriceRow {
    url: String,
    product_id: String,
    name: Option<String>,
    price_with_card: Option<Decimal>,
    price_without_card: Option<Decimal>,
    timestamp: String,
}

impl From<&PagePrice> for PagePriceRow {
    fn from(price: &PagePrice) -> Self {
        PagePriceRow {
            url: price.url.clone(),
            product_id: price.product_id.clone(),
            name: price.name.clone(),
            price_with_card: price.price_with_card,
            price_without_card: price.price_without_card,
            timestamp: price.captured_at.clone(),
        }
    }
}

impl PagePriceRow {
    pub(crate) fn into_page_price(self) -> PagePrice {
        PagePrice {
            url: self.url,
            product_id: self.product_id,
            name: self.name,
            price_with_card: self.price_with_card,
            price_without_card: self.price_without_card,
            captured_at: self.timestamp,
        }
    }
}

/// Price cell text: absent prices become empty cells, and the decimal
/// separator switches to a comma when requested.
pub(crate) fn price_cell(price: Option<Decimal>, decimal_comma: bool) -> String {
    match price {
        Some(value) => {
            let text = value.to_string();
            if decimal_comma {
                text.replace('.', ",")
            } else {
                text
            }
        }
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
