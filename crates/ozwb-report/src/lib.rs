use thiserror::Error;

pub mod export;
pub mod pairing;
pub mod rows;

pub use export::{
    read_flat_csv, read_page_prices_csv, write_flat_csv, write_legacy_paired_csv,
    write_page_prices_csv, write_paired_csv,
};
pub use pairing::{pair_price_lists, Pairing};
pub use rows::PairedRow;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}
