//! schema.org JSON-LD product extraction shared by the Ozon composer API
//! adapter and the cached-HTML adapter.
//!
//! Both sources embed the same structured-data shape: a `Product` object
//! with `offers` and `aggregateRating` sub-objects. The helpers here locate
//! that object inside a document and map it onto the canonical record.

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use ozwb_core::{ProductRecord, Vendor};

/// Finds the first JSON-LD object whose declared `@type` is `product`
/// (case-insensitive) inside the document's
/// `<script type="application/ld+json">` blocks.
///
/// Block bodies may hold several concatenated JSON objects; candidates are
/// recovered by brace-depth splitting. List-wrapped blocks are searched one
/// level deep.
#[must_use]
pub fn find_product_block(html: &str) -> Option<Value> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    for cap in script_re.captures_iter(html) {
        let Some(m) = cap.get(1) else { continue };
        for candidate in split_concatenated_objects(m.as_str()) {
            let Ok(value) = serde_json::from_str::<Value>(candidate) else {
                continue;
            };
            match value {
                Value::Array(items) => {
                    for item in items {
                        if declared_type_is_product(&item) {
                            return Some(item);
                        }
                    }
                }
                other if declared_type_is_product(&other) => return Some(other),
                _ => {}
            }
        }
    }
    None
}

/// Splits a script body that may hold several concatenated top-level JSON
/// objects into individual object slices.
///
/// Scans char-by-char tracking brace depth, respecting string literals and
/// escape sequences, so braces inside values never split an object. A body
/// that opens with `[` is one candidate as-is; a body with no complete
/// object at all is returned whole so the JSON parser produces the error.
pub(crate) fn split_concatenated_objects(raw: &str) -> Vec<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        return vec![trimmed];
    }

    let mut parts: Vec<&str> = Vec::new();
    let mut depth: i32 = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in trimmed.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        parts.push(&trimmed[s..=i]);
                    }
                }
                if depth < 0 {
                    depth = 0;
                }
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        vec![trimmed]
    } else {
        parts
    }
}

/// `@type` may be a plain string or an array of strings; the object counts
/// as a product when any element equals `product` ignoring case.
fn declared_type_is_product(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("product"),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case("product")),
        _ => false,
    }
}

/// Maps a located product block onto a canonical record. Identity fields
/// come from the caller; everything else is read from the block with absent
/// or empty values staying `None`.
#[must_use]
pub fn record_from_block(
    vendor: Vendor,
    product_id: String,
    url: String,
    block: &Value,
) -> ProductRecord {
    let offers = block.get("offers").filter(|v| v.is_object());
    let rating = block.get("aggregateRating").filter(|v| v.is_object());

    let mut record = ProductRecord::new(vendor, product_id, url);
    record.name = string_field(block, "name");
    record.brand = block.get("brand").and_then(brand_from_value);
    record.description = string_field(block, "description");
    record.price = offers
        .and_then(|o| o.get("price"))
        .and_then(decimal_from_value);
    record.currency = offers.and_then(|o| string_field(o, "priceCurrency"));
    record.availability = offers.and_then(|o| string_field(o, "availability"));
    record.rating_value = rating
        .and_then(|r| r.get("ratingValue"))
        .and_then(f64_from_value);
    record.review_count = rating
        .and_then(|r| r.get("reviewCount"))
        .and_then(i64_from_value);
    record.images = block.get("image").map(string_list).unwrap_or_default();
    record
}

/// Source URL declared by the block itself: `url`, else `offers.url`.
pub(crate) fn block_url(block: &Value) -> Option<String> {
    string_field(block, "url")
        .or_else(|| block.get("offers").and_then(|o| string_field(o, "url")))
}

/// Document-level URL fallback: `<link rel="canonical">` first, then
/// `<meta property="og:url">`.
#[must_use]
pub fn document_url(html: &str) -> Option<String> {
    let patterns = [
        r#"(?i)<link[^>]+rel=["']canonical["'][^>]*href=["']([^"']+)["']"#,
        r#"(?i)<meta[^>]+property=["']og:url["'][^>]*content=["']([^"']+)["']"#,
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(html) {
            if let Some(m) = cap.get(1) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}

/// Product id declared by the block: `sku` first, then `productID`, either
/// as a string or a bare number.
pub(crate) fn sku_from_block(block: &Value) -> Option<String> {
    for key in ["sku", "productID"] {
        match block.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// `brand` in the wild is a string, an object with `name` (or nested
/// `brand`), or a list of either; the first hit wins.
pub(crate) fn brand_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("brand"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Value::Array(items) => items.iter().find_map(brand_from_value),
        _ => None,
    }
}

/// Price node coercion: a JSON number as-is, or a string with embedded
/// spaces removed and comma mapped to decimal point. Trailing fraction
/// zeros are stripped either way.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
        _ => return None,
    };
    raw.parse::<Decimal>().ok().map(|d| d.normalize())
}

pub(crate) fn f64_from_value(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| {
        value
            .as_str()
            .and_then(|s| s.trim().replace(',', ".").parse().ok())
    })
}

pub(crate) fn i64_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
