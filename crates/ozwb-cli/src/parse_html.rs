//! `parse-html` command: re-parse saved product pages from disk, no network.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use ozwb_core::Vendor;
use ozwb_report::write_flat_csv;
use ozwb_scraper::parse_dir;

#[derive(Debug, Args)]
pub struct ParseHtmlArgs {
    /// Directory of saved `.html` product pages
    #[arg(long)]
    pub dir: PathBuf,

    /// Vendor the pages belong to: `ozon` or `wildberries`
    #[arg(long)]
    pub vendor: Vendor,

    /// Output CSV path
    #[arg(long, default_value = "records.csv")]
    pub output: PathBuf,
}

/// # Errors
///
/// Fails when the directory cannot be scanned, when not a single page
/// yields a record, or when the output cannot be written. Per-file parse
/// failures are logged and skipped, not propagated.
pub(crate) fn run(args: &ParseHtmlArgs) -> anyhow::Result<()> {
    let records = parse_dir(&args.dir, args.vendor)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;
    if records.is_empty() {
        anyhow::bail!(
            "no records could be parsed from {}; not writing an empty report",
            args.dir.display()
        );
    }

    write_flat_csv(&records, &args.output).context("failed to write the flat report")?;
    println!(
        "wrote {} records to {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}
