//! Per-vendor product id extraction from marketplace URLs.
//!
//! Vendor-specific structural patterns are tried first, then a shared
//! digit-run fallback. Marketplaces reorganize their URL structure over
//! time; the fallback keeps ingestion alive through such changes at the
//! cost of precision. No candidate at all means the link must be dropped,
//! never given a fabricated id.

use regex::Regex;

/// Extracts the Wildberries article number from a product URL.
///
/// Matches the numeric segment of `/catalog/<id>/` on the lowercased URL,
/// falling back to [`longest_digit_run`].
#[must_use]
pub fn extract_wb_id(url: &str) -> Option<String> {
    let re = Regex::new(r"/catalog/(\d+)/").expect("valid regex");
    if let Some(cap) = re.captures(&url.to_lowercase()) {
        if let Some(m) = cap.get(1) {
            return Some(m.as_str().to_string());
        }
    }
    longest_digit_run(url)
}

/// Extracts the Ozon product id from a product URL.
///
/// Ozon product paths end in a slug whose last hyphen-delimited token is the
/// numeric id (`/product/smartfon-x-123456789/`). Takes that token when
/// present, falling back to [`longest_digit_run`].
#[must_use]
pub fn extract_ozon_id(url: &str) -> Option<String> {
    if let Some(slug) = last_path_segment(url) {
        for part in slug.rsplit('-') {
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                return Some(part.to_string());
            }
        }
    }
    longest_digit_run(url)
}

/// Shared fallback: the longest run of six or more consecutive digits
/// anywhere in the URL. On equal lengths the later run wins, which keeps id
/// extraction stable for URLs that embed the article twice.
#[must_use]
pub fn longest_digit_run(url: &str) -> Option<String> {
    let re = Regex::new(r"\d{6,}").expect("valid regex");
    let mut best: Option<&str> = None;
    for m in re.find_iter(url) {
        let run = m.as_str();
        if best.is_none_or(|b| run.len() >= b.len()) {
            best = Some(run);
        }
    }
    best.map(str::to_string)
}

/// Last non-empty path segment of the URL with query and fragment stripped.
/// Also used by the rendered-page crawl as a surrogate key for links that
/// carry no numeric id.
#[must_use]
pub fn last_path_segment(url: &str) -> Option<String> {
    let no_fragment = url.split('#').next().unwrap_or(url);
    let no_query = no_fragment.split('?').next().unwrap_or(no_fragment);

    // Skip past "scheme://host" so a dotted host never counts as a segment.
    let path_start = match no_query.find("://") {
        Some(pos) => match no_query[pos + 3..].find('/') {
            Some(slash) => pos + 3 + slash,
            None => return None,
        },
        None => 0,
    };

    no_query[path_start..]
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // extract_wb_id
    // -----------------------------------------------------------------------

    #[test]
    fn wb_id_from_catalog_path() {
        assert_eq!(
            extract_wb_id("https://www.wildberries.ru/catalog/123456/detail.aspx").as_deref(),
            Some("123456")
        );
    }

    #[test]
    fn wb_id_catalog_pattern_is_case_insensitive_on_url() {
        assert_eq!(
            extract_wb_id("HTTPS://WWW.WILDBERRIES.RU/CATALOG/654321/DETAIL.ASPX").as_deref(),
            Some("654321")
        );
    }

    #[test]
    fn wb_id_falls_back_to_digit_run() {
        assert_eq!(
            extract_wb_id("https://www.wildberries.ru/somewhere?article=98765432").as_deref(),
            Some("98765432")
        );
    }

    #[test]
    fn wb_id_none_without_candidates() {
        assert!(extract_wb_id("https://www.wildberries.ru/brands/acme").is_none());
    }

    // -----------------------------------------------------------------------
    // extract_ozon_id
    // -----------------------------------------------------------------------

    #[test]
    fn ozon_id_from_slug_tail() {
        assert_eq!(
            extract_ozon_id("https://www.ozon.ru/product/smartfon-apple-iphone-15-1234567890/")
                .as_deref(),
            Some("1234567890")
        );
    }

    #[test]
    fn ozon_id_skips_non_trailing_digit_tokens() {
        // "15" is a digit token too, but the id is the last one in the slug.
        assert_eq!(
            extract_ozon_id("https://www.ozon.ru/product/iphone-15-pro-987654321/").as_deref(),
            Some("987654321")
        );
    }

    #[test]
    fn ozon_id_ignores_query_string() {
        assert_eq!(
            extract_ozon_id("https://www.ozon.ru/product/x-555666777/?sh=abc-123").as_deref(),
            Some("555666777")
        );
    }

    #[test]
    fn ozon_id_falls_back_to_digit_run() {
        // No digit token in the slug itself; the id lives mid-path.
        assert_eq!(
            extract_ozon_id("https://www.ozon.ru/context/detail/id/161234567/detail").as_deref(),
            Some("161234567")
        );
    }

    #[test]
    fn ozon_id_none_without_candidates() {
        assert!(extract_ozon_id("https://www.ozon.ru/category/telefony/").is_none());
    }

    // -----------------------------------------------------------------------
    // longest_digit_run
    // -----------------------------------------------------------------------

    #[test]
    fn digit_run_requires_six_digits() {
        assert!(longest_digit_run("https://example.test/a-12345/").is_none());
        assert_eq!(
            longest_digit_run("https://example.test/a-123456/").as_deref(),
            Some("123456")
        );
    }

    #[test]
    fn digit_run_prefers_longest() {
        assert_eq!(
            longest_digit_run("https://example.test/123456/item-1234567890").as_deref(),
            Some("1234567890")
        );
    }

    #[test]
    fn digit_run_later_run_wins_ties() {
        assert_eq!(
            longest_digit_run("https://example.test/111111/222222").as_deref(),
            Some("222222")
        );
    }

    // -----------------------------------------------------------------------
    // last_path_segment
    // -----------------------------------------------------------------------

    #[test]
    fn path_segment_strips_query_and_trailing_slash() {
        assert_eq!(
            last_path_segment("https://www.ozon.ru/product/tovar-bez-nomera/?avtc=1").as_deref(),
            Some("tovar-bez-nomera")
        );
    }

    #[test]
    fn path_segment_none_for_bare_host() {
        assert!(last_path_segment("https://www.ozon.ru").is_none());
        assert!(last_path_segment("https://www.ozon.ru/").is_none());
    }
}
