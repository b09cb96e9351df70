//! `pair` command: join a rendered-page price capture with live Wildberries
//! cards, row by row, into the paired report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use ozwb_core::{read_link_list, AppConfig};
use ozwb_report::{
    pair_price_lists, read_page_prices_csv, write_legacy_paired_csv, write_paired_csv,
};
use ozwb_scraper::{WbClient, WbConfig};

use crate::print_progress;

#[derive(Debug, Args)]
pub struct PairArgs {
    /// Page-price CSV captured from rendered Ozon pages
    #[arg(long)]
    pub ozon_prices: PathBuf,

    /// File with Ozon product links, one per line; fills the `ozon_url`
    /// column by position
    #[arg(long)]
    pub ozon_links: PathBuf,

    /// File with Wildberries product links, one per line, in the same order
    /// as the Ozon list
    #[arg(long)]
    pub wb_links: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = "paired.csv")]
    pub output: PathBuf,

    /// Write the legacy single-price schema instead of separate Ozon and
    /// Wildberries price columns
    #[arg(long)]
    pub legacy: bool,

    /// Render prices with a decimal comma for spreadsheet locales
    #[arg(long)]
    pub decimal_comma: bool,
}

/// # Errors
///
/// Fails when an input file cannot be read, when the Wildberries client
/// cannot be constructed, when zero rows pair up, or when the output cannot
/// be written. Count mismatches between the lists are warnings, not errors.
pub(crate) async fn run(args: PairArgs, config: &AppConfig) -> anyhow::Result<()> {
    let ozon_links = read_link_list(&args.ozon_links)
        .with_context(|| format!("failed to read links from {}", args.ozon_links.display()))?;
    let wb_links = read_link_list(&args.wb_links)
        .with_context(|| format!("failed to read links from {}", args.wb_links.display()))?;
    if ozon_links.len() != wb_links.len() {
        tracing::warn!(
            ozon = ozon_links.len(),
            wb = wb_links.len(),
            "link lists differ in length; pairing stops at the shorter one"
        );
    }

    let ozon_prices = read_page_prices_csv(&args.ozon_prices).with_context(|| {
        format!(
            "failed to read page prices from {}",
            args.ozon_prices.display()
        )
    })?;

    let client = WbClient::new(WbConfig::from(config))
        .context("failed to build the Wildberries client")?;
    let progress = print_progress("wildberries");
    let wb_records = client.fetch_products(&wb_links, Some(&progress)).await;

    let pairing = pair_price_lists(&ozon_prices, &wb_records, &ozon_links, &wb_links);
    if pairing.is_truncated() {
        tracing::warn!(
            ozon = pairing.ozon_count,
            wb = pairing.wb_count,
            rows = pairing.rows.len(),
            "pairing dropped unmatched rows"
        );
    }
    if pairing.rows.is_empty() {
        anyhow::bail!("no rows could be paired; not writing an empty report");
    }

    if args.legacy {
        write_legacy_paired_csv(&pairing.rows, &args.output, args.decimal_comma)
    } else {
        write_paired_csv(&pairing.rows, &args.output, args.decimal_comma)
    }
    .context("failed to write the paired report")?;

    println!(
        "wrote {} paired rows to {}",
        pairing.rows.len(),
        args.output.display()
    );
    Ok(())
}
