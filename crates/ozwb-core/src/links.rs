//! Link-list input files: one URL per line, `#` starts a comment line.

use std::path::Path;

use crate::CoreError;

/// Parse link-list text. Lines are trimmed; blank lines and lines starting
/// with `#` are ignored.
#[must_use]
pub fn parse_link_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read and parse a link-list file.
///
/// # Errors
///
/// Returns `CoreError::Io` when the file cannot be read.
pub fn read_link_list(path: &Path) -> Result<Vec<String>, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_link_list(&text))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# ozon links\nhttps://www.ozon.ru/product/a-123456/\n\n  \n# another\nhttps://www.ozon.ru/product/b-654321/\n";
        let links = parse_link_list(text);
        assert_eq!(
            links,
            vec![
                "https://www.ozon.ru/product/a-123456/",
                "https://www.ozon.ru/product/b-654321/",
            ]
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let links = parse_link_list("  https://example.test/x  \n");
        assert_eq!(links, vec!["https://example.test/x"]);
    }

    #[test]
    fn empty_input_gives_empty_list() {
        assert!(parse_link_list("").is_empty());
        assert!(parse_link_list("# only comments\n\n").is_empty());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(&path, "https://www.wildberries.ru/catalog/123456/detail.aspx\n").unwrap();
        let links = read_link_list(&path).unwrap();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_link_list(Path::new("/nonexistent/links.txt")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
