mod fetch;
mod pair;
mod parse_html;


use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ozwb_core::LinkStatus;

#[derive(Debug, Parser)]
#[command(name = "ozwb-cli")]
#[command(about = "Ozon/Wildberries record extraction and price pairing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch product records over the vendor APIs into a flat CSV
    Fetch(fetch::FetchArgs),
    /// Parse saved product pages from a directory into a flat CSV
    ParseHtml(parse_html::ParseHtmlArgs),
    /// Pair a page-price capture with live Wildberries cards into a report
    Pair(pair::PairArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ozwb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => fetch::run(args, &config).await,
        Commands::ParseHtml(args) => parse_html::run(&args),
        Commands::Pair(args) => pair::run(args, &config).await,
    }
}

/// Progress printer shared by the fetching commands; one line per processed
/// link, in input order.
pub(crate) fn print_progress(vendor: &'static str) -> impl Fn(usize, usize, &str, LinkStatus) {
    move |done, total, url, status| {
        println!("[{vendor} {done}/{total}] {status} {url}");
    }
}
