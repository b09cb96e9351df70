//! CSV writers and readers for every report schema.
//!
//! Four schemas leave this module:
//!
//! * paired: one row per Ozon/Wildberries pair, both price columns kept
//! * legacy paired: one merged price column, for older spreadsheets
//! * flat: one row per canonical record, any vendor mix
//! * page prices: raw rendered-page captures, re-read later by pairing
//!
//! Flat and page-price files are read back by this module, so their cells
//! always use dot decimals. The paired writers accept a decimal-comma flag
//! for spreadsheet locales; those files are write-only.

use std::fs;
use std::path::Path;

use csv::{Reader, Writer};

use ozwb_core::{PagePrice, ProductRecord};

use crate::rows::{price_cell, FlatRow, PagePriceRow, PairedRow};
use crate::ReportError;

const PAIRED_HEADER: [&str; 7] = [
    "name",
    "ozon_url",
    "wb_url",
    "price_ozon_card",
    "price_wb",
    "wb_article",
    "parsed_at",
];

const LEGACY_HEADER: [&str; 6] = [
    "name",
    "ozon_url",
    "wb_url",
    "price",
    "wb_article",
    "parsed_at",
];

const FLAT_HEADER: [&str; 14] = [
    "vendor",
    "product_id",
    "url",
    "name",
    "brand",
    "description",
    "price",
    "currency",
    "rating_value",
    "review_count",
    "images",
    "supplier_id",
    "supplier_name",
    "subject_id",
];

const PAGE_PRICE_HEADER: [&str; 6] = [
    "url",
    "product_id",
    "name",
    "price_with_card",
    "price_without_card",
    "timestamp",
];

/// Writes the paired report with separate Ozon and Wildberries price
/// columns.
///
/// # Errors
///
/// Returns [`ReportError::Io`] when the file or its parent directory cannot
/// be created and [`ReportError::Csv`] when a row fails to serialize.
pub fn write_paired_csv(
    rows: &[PairedRow],
    path: &Path,
    decimal_comma: bool,
) -> Result<(), ReportError> {
    let mut writer = create_writer(path)?;
    writer
        .write_record(PAIRED_HEADER)
        .map_err(|source| csv_error(path, source))?;
    for row in rows {
        let card = price_cell(row.price_ozon_card, decimal_comma);
        let wb = price_cell(row.price_wb, decimal_comma);
        writer
            .write_record([
                row.name.as_str(),
                row.ozon_url.as_str(),
                row.wb_url.as_str(),
                card.as_str(),
                wb.as_str(),
                row.wb_article.as_str(),
                row.parsed_at.as_str(),
            ])
            .map_err(|source| csv_error(path, source))?;
    }
    flush(writer, path)
}

/// Writes the legacy paired report with one merged price column.
///
/// # Errors
///
/// Returns [`ReportError::Io`] when the file or its parent directory cannot
/// be created and [`ReportError::Csv`] when a row fails to serialize.
pub fn write_legacy_paired_csv(
    rows: &[PairedRow],
    path: &Path,
    decimal_comma: bool,
) -> Result<(), ReportError> {
    let mut writer = create_writer(path)?;
    writer
        .write_record(LEGACY_HEADER)
        .map_err(|source| csv_error(path, source))?;
    for row in rows {
        let price = price_cell(row.merged_price(), decimal_comma);
        writer
            .write_record([
                row.name.as_str(),
                row.ozon_url.as_str(),
                row.wb_url.as_str(),
                price.as_str(),
                row.wb_article.as_str(),
                row.parsed_at.as_str(),
            ])
            .map_err(|source| csv_error(path, source))?;
    }
    flush(writer, path)
}

/// Writes canonical records as the flat schema, one row per record.
///
/// # Errors
///
/// Returns [`ReportError::Io`] when the file or its parent directory cannot
/// be created and [`ReportError::Csv`] when a row fails to serialize.
pub fn write_flat_csv(records: &[ProductRecord], path: &Path) -> Result<(), ReportError> {
    let mut writer = create_writer(path)?;
    if records.is_empty() {
        writer
            .write_record(FLAT_HEADER)
            .map_err(|source| csv_error(path, source))?;
    }
    for record in records {
        writer
            .serialize(FlatRow::from(record))
            .map_err(|source| csv_error(path, source))?;
    }
    flush(writer, path)
}

/// Reads a flat file back into canonical records.
///
/// The flat schema has no availability column, so every returned record has
/// `availability` unset regardless of what the original carried.
///
/// # Errors
///
/// Returns [`ReportError::Csv`] when the file cannot be opened or a row
/// does not fit the schema.
pub fn read_flat_csv(path: &Path) -> Result<Vec<ProductRecord>, ReportError> {
    let mut reader = open_reader(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<FlatRow>() {
        let row = row.map_err(|source| csv_error(path, source))?;
        records.push(row.into_record());
    }
    Ok(records)
}

/// Writes rendered-page price captures, one row per visited page.
///
/// # Errors
///
/// Returns [`ReportError::Io`] when the file or its parent directory cannot
/// be created and [`ReportError::Csv`] when a row fails to serialize.
pub fn write_page_prices_csv(prices: &[PagePrice], path: &Path) -> Result<(), ReportError> {
    let mut writer = create_writer(path)?;
    if prices.is_empty() {
        writer
            .write_record(PAGE_PRICE_HEADER)
            .map_err(|source| csv_error(path, source))?;
    }
    for price in prices {
        writer
            .serialize(PagePriceRow::from(price))
            .map_err(|source| csv_error(path, source))?;
    }
    flush(writer, path)
}

/// Reads a page-price file back, usually as the Ozon side of a pairing run.
///
/// # Errors
///
/// Returns [`ReportError::Csv`] when the file cannot be opened or a row
/// does not fit the schema.
pub fn read_page_prices_csv(path: &Path) -> Result<Vec<PagePrice>, ReportError> {
    let mut reader = open_reader(path)?;
    let mut prices = Vec::new();
    for row in reader.deserialize::<PagePriceRow>() {
        let row = row.map_err(|source| csv_error(path, source))?;
        prices.push(row.into_page_price());
    }
    Ok(prices)
}

/// Opens a writer, creating missing parent directories first.
fn create_writer(path: &Path) -> Result<Writer<fs::File>, ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| io_error(path, source))?;
        }
    }
    let file = fs::File::create(path).map_err(|source| io_error(path, source))?;
    Ok(Writer::from_writer(file))
}

fn open_reader(path: &Path) -> Result<Reader<fs::File>, ReportError> {
    Reader::from_path(path).map_err(|source| csv_error(path, source))
}

fn flush(mut writer: Writer<fs::File>, path: &Path) -> Result<(), ReportError> {
    writer.flush().map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> ReportError {
    ReportError::Csv {
        path: path.display().to_string(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ozwb_core::Vendor;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn paired_row() -> PairedRow {
        PairedRow {
            name: "Чайник электрический".to_string(),
            ozon_url: "https://www.ozon.ru/product/chaynik-161234567/".to_string(),
            wb_url: "https://www.wildberries.ru/catalog/221501024/detail.aspx".to_string(),
            price_ozon_card: Some(dec("1399")),
            price_ozon_no_card: Some(dec("1599")),
            price_wb: Some(dec("1450.5")),
            wb_article: "221501024".to_string(),
            parsed_at: "2025-11-03T14:21:07".to_string(),
        }
    }

    fn wb_record() -> ProductRecord {
        let mut record = ProductRecord::new(
            Vendor::Wildberries,
            "221501024",
            "https://www.wildberries.ru/catalog/221501024/detail.aspx",
        );
        record.name = Some("Кроссовки беговые".to_string());
        record.brand = Some("Demix".to_string());
        record.description = Some("Лёгкие, дышащие кроссовки \"для зала\"".to_string());
        record.price = Some(dec("2999.5"));
        record.currency = Some("RUB".to_string());
        record.rating_value = Some(4.8);
        record.review_count = Some(1154);
        record.images = vec![
            "https://img.test/c246/1.webp".to_string(),
            "https://img.test/c246/2.webp".to_string(),
        ];
        record.supplier_id = Some(126_077);
        record.supplier_name = Some("ООО Спорттовары".to_string());
        record.subject_id = Some(1724);
        record
    }

    #[test]
    fn paired_csv_has_expected_header_and_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paired.csv");

        write_paired_csv(&[paired_row()], &path, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,ozon_url,wb_url,price_ozon_card,price_wb,wb_article,parsed_at"
        );
        let row = lines.next().unwrap();
        assert!(row.contains(",1399,"), "row: {row}");
        assert!(row.contains(",1450.5,"), "row: {row}");
        assert!(row.contains(",221501024,"), "row: {row}");
        assert!(lines.next().is_none());
    }

    #[test]
    fn paired_csv_renders_decimal_commas_when_asked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paired.csv");

        write_paired_csv(&[paired_row()], &path, true).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        // The comma separator forces quoting of the fractional price cell.
        assert!(text.contains("\"1450,5\""), "text: {text}");
        // Integral prices have no separator to replace and stay bare.
        assert!(text.contains(",1399,"), "text: {text}");
    }

    #[test]
    fn legacy_csv_merges_the_price_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");

        let mut no_card_row = paired_row();
        no_card_row.price_ozon_card = None;

        write_legacy_paired_csv(&[paired_row(), no_card_row], &path, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,ozon_url,wb_url,price,wb_article,parsed_at"
        );
        assert!(lines.next().unwrap().contains(",1399,"));
        assert!(lines.next().unwrap().contains(",1599,"));
    }

    #[test]
    fn flat_csv_round_trips_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/flat.csv");

        let minimal = ProductRecord::new(
            Vendor::Ozon,
            "161234567",
            "https://www.ozon.ru/product/chaynik-161234567/",
        );
        let records = vec![wb_record(), minimal];

        write_flat_csv(&records, &path).unwrap();
        let back = read_flat_csv(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn flat_csv_header_matches_the_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.csv");

        write_flat_csv(&[wb_record()], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next().unwrap(), FLAT_HEADER.join(","));
    }

    #[test]
    fn empty_flat_csv_still_carries_the_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.csv");

        write_flat_csv(&[], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), FLAT_HEADER.join(","));
        assert!(read_flat_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn page_prices_round_trip_under_the_timestamp_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.csv");

        let prices = vec![
            PagePrice {
                url: "https://www.ozon.ru/product/chaynik-161234567/".to_string(),
                product_id: "161234567".to_string(),
                name: Some("Чайник электрический".to_string()),
                price_with_card: Some(dec("1399")),
                price_without_card: Some(dec("1599")),
                captured_at: "2025-11-03T14:21:07".to_string(),
            },
            PagePrice {
                url: "https://www.ozon.ru/product/out-of-stock-999/".to_string(),
                product_id: "999".to_string(),
                name: None,
                price_with_card: None,
                price_without_card: None,
                captured_at: "2025-11-03T14:21:12".to_string(),
            },
        ];

        write_page_prices_csv(&prices, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next().unwrap(), PAGE_PRICE_HEADER.join(","));

        let back = read_page_prices_csv(&path).unwrap();
        assert_eq!(back, prices);
    }

    #[test]
    fn writers_create_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/nested/prices.csv");

        write_page_prices_csv(&[], &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn free_text_cells_survive_commas_and_quotes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.csv");

        let records = vec![wb_record()];
        write_flat_csv(&records, &path).unwrap();

        let back = read_flat_csv(&path).unwrap();
        assert_eq!(
            back[0].description.as_deref(),
            Some("Лёгкие, дышащие кроссовки \"для зала\"")
        );
    }

    #[test]
    fn reading_a_missing_file_reports_the_path() {
        let err = read_flat_csv(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(err.to_string().contains("/no/such/file.csv"), "err: {err}");
    }
}
