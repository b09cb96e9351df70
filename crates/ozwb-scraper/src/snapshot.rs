//! Cached-HTML adapter: canonical records from on-disk page snapshots.
//!
//! Snapshots are whatever the crawl (or a browser save) wrote to disk, so
//! decoding is lossy and extraction leans entirely on the embedded JSON-LD
//! structured data.

use std::path::{Path, PathBuf};

use tracing::warn;

use ozwb_core::{ProductRecord, Vendor};

use crate::error::ScrapeError;
use crate::ids::{extract_ozon_id, extract_wb_id};
use crate::jsonld;

/// Parses one snapshot file into a canonical record.
///
/// The source URL is resolved from the product block itself, else the
/// document's canonical/og:url tags; the product id from that URL
/// (vendor-specific patterns), else the block's declared `sku`/`productID`.
///
/// # Errors
///
/// - [`ScrapeError::Io`] — the file cannot be read.
/// - [`ScrapeError::MissingData`] — no JSON-LD product block in the document.
/// - [`ScrapeError::MissingProductId`] — no id derivable; the record would
///   otherwise carry an empty key.
pub fn parse_file(path: &Path, vendor: Vendor) -> Result<ProductRecord, ScrapeError> {
    let bytes = std::fs::read(path).map_err(|source| ScrapeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let html = String::from_utf8_lossy(&bytes);

    let block = jsonld::find_product_block(&html).ok_or_else(|| ScrapeError::MissingData {
        node: "application/ld+json product",
        url: path.display().to_string(),
    })?;

    let url = jsonld::block_url(&block)
        .or_else(|| jsonld::document_url(&html))
        .unwrap_or_default();
    let product_id = match vendor {
        Vendor::Ozon => extract_ozon_id(&url),
        Vendor::Wildberries => extract_wb_id(&url),
    }
    .or_else(|| jsonld::sku_from_block(&block))
    .ok_or_else(|| ScrapeError::MissingProductId {
        url: if url.is_empty() {
            path.display().to_string()
        } else {
            url.clone()
        },
    })?;

    Ok(jsonld::record_from_block(vendor, product_id, url, &block))
}

/// Parses every `*.html` file of `dir` in sorted order.
///
/// Per-file failures are logged with their kind and excluded; only an
/// inaccessible directory aborts the walk.
///
/// # Errors
///
/// Returns [`ScrapeError::Io`] when the directory cannot be listed.
pub fn parse_dir(dir: &Path, vendor: Vendor) -> Result<Vec<ProductRecord>, ScrapeError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ScrapeError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match parse_file(&path, vendor) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(path = %path.display(), kind = %err.kind(), error = %err, "skipping snapshot");
            }
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
