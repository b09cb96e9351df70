//! Rendered-page crawl loop, generic over the page transport.
//!
//! The loop owns the per-link sequencing (navigate, stock check, delay,
//! snapshot, price scan, name read) while the [`RenderedPage`] transport
//! owns the actual rendering. Rendered records are keyed by URL, so a link
//! without a derivable product id is still recorded under a surrogate key
//! instead of being dropped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use ozwb_core::{now_timestamp, LinkStatus, PagePrice, ProgressFn};

use crate::ids::{extract_ozon_id, last_path_segment};
use crate::ozon::widget::{extract_widget_prices, is_out_of_stock};

pub(crate) const PRICE_WIDGET_SELECTOR: &str = "[data-widget='webPrice']";
const NAME_SELECTORS: [&str; 2] = ["h1", "[data-widget='webProductHeading'] h1"];
/// Out-of-stock pages are not worth the full settle delay.
const OUT_OF_STOCK_DELAY: Duration = Duration::from_millis(200);

/// Failure of a single rendered-page interaction.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("navigation timed out")]
    Timeout,
    #[error("page transport failure: {0}")]
    Transport(String),
    #[error("snapshot write failed: {0}")]
    Snapshot(#[from] std::io::Error),
}

/// Driver for one rendered browser tab.
///
/// Implementations wrap whatever renders the page; the crawl loop only
/// needs navigation, text reads, and document persistence. Reads refer to
/// the most recently navigated document.
#[async_trait]
pub trait RenderedPage {
    /// Navigates to `url`, resolving once the DOM is available.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), PageError>;
    /// Inner text of the first node matching `selector`.
    async fn text_of(&mut self, selector: &str) -> Result<String, PageError>;
    /// Full visible text of the document body.
    async fn full_text(&mut self) -> Result<String, PageError>;
    /// Document title.
    async fn title(&mut self) -> Result<String, PageError>;
    /// Writes the current document source to `path`.
    async fn save_html(&mut self, path: &Path) -> Result<(), PageError>;
}

/// Knobs for [`collect_page_prices`].
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Per-navigation ceiling.
    pub timeout: Duration,
    /// Pause after each loaded page.
    pub page_delay: Duration,
    /// Directory for raw document snapshots; `None` disables persistence.
    pub html_dir: Option<PathBuf>,
    /// Rewrite snapshots that already exist.
    pub overwrite: bool,
}

/// Visits every link in order and captures a price record per loaded page.
///
/// A navigation timeout or transport failure drops the link and the loop
/// continues; out-of-stock pages short-circuit to an empty-priced record.
/// The optional callback fires once per link with
/// `(completed, total, link, status)`.
pub async fn collect_page_prices<P: RenderedPage>(
    page: &mut P,
    links: &[String],
    options: &CrawlOptions,
    progress: Option<&ProgressFn<'_>>,
) -> Vec<PagePrice> {
    let total = links.len();
    let mut records = Vec::with_capacity(total);

    for (idx, link) in links.iter().enumerate() {
        let status = match visit_link(page, link, idx + 1, options).await {
            Ok((record, status)) => {
                info!(
                    url = %link,
                    status = %status,
                    with_card = ?record.price_with_card,
                    without_card = ?record.price_without_card,
                    "page captured"
                );
                records.push(record);
                status
            }
            Err(err) => {
                let status = match err {
                    PageError::Timeout => LinkStatus::Timeout,
                    PageError::Transport(_) | PageError::Snapshot(_) => LinkStatus::Transport,
                };
                warn!(url = %link, kind = %status, error = %err, "skipping rendered page");
                status
            }
        };
        if let Some(callback) = progress {
            callback(idx + 1, total, link, status);
        }
    }

    records
}

async fn visit_link<P: RenderedPage>(
    page: &mut P,
    link: &str,
    index: usize,
    options: &CrawlOptions,
) -> Result<(PagePrice, LinkStatus), PageError> {
    page.goto(link, options.timeout).await?;

    // An unreadable body counts as in stock; the price scan decides later.
    let out_of_stock = page
        .full_text()
        .await
        .is_ok_and(|text| is_out_of_stock(&text));

    let delay = if out_of_stock {
        options.page_delay.min(OUT_OF_STOCK_DELAY)
    } else {
        options.page_delay
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let stem = page_stem(link, index);
    if let Some(dir) = &options.html_dir {
        std::fs::create_dir_all(dir)?;
        let target = dir.join(format!("{stem}.html"));
        if target.exists() && !options.overwrite {
            debug!(path = %target.display(), "snapshot exists, keeping");
        } else {
            page.save_html(&target).await?;
            debug!(path = %target.display(), "snapshot saved");
        }
    }

    let (price_with_card, price_without_card) = if out_of_stock {
        (None, None)
    } else {
        let widget_text = match page.text_of(PRICE_WIDGET_SELECTOR).await {
            Ok(text) => Some(text),
            Err(_) => page.full_text().await.ok(),
        };
        widget_text
            .as_deref()
            .map_or((None, None), extract_widget_prices)
    };

    let record = PagePrice {
        url: link.to_string(),
        product_id: stem,
        name: read_name(page).await,
        price_with_card,
        price_without_card,
        captured_at: now_timestamp(),
    };
    let status = if out_of_stock {
        LinkStatus::OutOfStock
    } else {
        LinkStatus::Ok
    };
    Ok((record, status))
}

async fn read_name<P: RenderedPage>(page: &mut P) -> Option<String> {
    for selector in NAME_SELECTORS {
        if let Ok(name) = page.text_of(selector).await {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    page.title()
        .await
        .ok()
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Record key and snapshot file stem for one link: the extracted product
/// id, else the last URL path segment, else a positional placeholder.
fn page_stem(link: &str, index: usize) -> String {
    extract_ozon_id(link)
        .or_else(|| last_path_segment(link))
        .unwrap_or_else(|| format!("page_{index:04}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
