//! `fetch` command: drive both API adapters over explicit link lists and
//! write the surviving records as one flat CSV.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use ozwb_core::{
    parse_cookie_header, read_cookies_json, read_link_list, AppConfig, CookieEntry,
};
use ozwb_report::write_flat_csv;
use ozwb_scraper::{OzonClient, OzonConfig, WbClient, WbConfig};

use crate::print_progress;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// File with Ozon product links, one per line
    #[arg(long)]
    pub ozon_links: Option<PathBuf>,

    /// File with Wildberries product links, one per line
    #[arg(long)]
    pub wb_links: Option<PathBuf>,

    /// JSON array of cookies seeding the Ozon session
    #[arg(long)]
    pub cookies: Option<PathBuf>,

    /// Inline `name=value; name2=value2` cookie string, as copied from
    /// browser devtools
    #[arg(long, conflicts_with = "cookies")]
    pub cookie_header: Option<String>,

    /// Output CSV path
    #[arg(long, default_value = "records.csv")]
    pub output: PathBuf,
}

/// # Errors
///
/// Fails when no link file was given, when an input file cannot be read,
/// when a client cannot be constructed, when not a single record survives,
/// or when the output cannot be written. Per-link fetch failures are logged
/// and skipped, not propagated.
pub(crate) async fn run(args: FetchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let ozon_links = read_links(args.ozon_links.as_deref())?;
    let wb_links = read_links(args.wb_links.as_deref())?;
    if ozon_links.is_empty() && wb_links.is_empty() {
        anyhow::bail!("nothing to fetch; pass --ozon-links and/or --wb-links");
    }

    let cookies = load_cookies(&args)?;
    let mut records = Vec::new();

    if !ozon_links.is_empty() {
        let client = OzonClient::new(&OzonConfig::from(config), &cookies)
            .context("failed to build the Ozon client")?;
        let progress = print_progress("ozon");
        records.extend(client.fetch_products(&ozon_links, Some(&progress)).await);
    }

    if !wb_links.is_empty() {
        let client = WbClient::new(WbConfig::from(config))
            .context("failed to build the Wildberries client")?;
        let progress = print_progress("wildberries");
        records.extend(client.fetch_products(&wb_links, Some(&progress)).await);
    }

    if records.is_empty() {
        anyhow::bail!(
            "no records were produced from {} links; not writing an empty report",
            ozon_links.len() + wb_links.len()
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

fn read_links(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    match path {
        Some(path) => read_link_list(path)
            .with_context(|| format!("failed to read links from {}", path.display())),
        None => Ok(Vec::new()),
    }
}

fn load_cookies(args: &FetchArgs) -> anyhow::Result<Vec<CookieEntry>> {
    if let Some(path) = &args.cookies {
        return read_cookies_json(path)
            .with_context(|| format!("failed to read cookies from {}", path.display()));
    }
    if let Some(raw) = &args.cookie_header {
        return Ok(parse_cookie_header(raw));
    }
    Ok(Vec::new())
}
