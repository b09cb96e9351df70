//! Text normalization and numeric price extraction for marketplace page text.
//!
//! Page fragments mix currency glyphs, thin/no-break spaces, and locale
//! punctuation inconsistently; a narrow, order-sensitive cleanup pipeline is
//! more predictable than a single catch-all regex. See
//! [`crate::ozon::widget`] for how these compose into label-anchored price
//! scanning.

use rust_decimal::Decimal;

/// Normalizes a label fragment for matching: thin (U+2009) and no-break
/// (U+00A0) spaces become plain spaces, `ё`/`Ё` folds to `е`/`Е`, the result
/// is trimmed and lowercased, and whitespace runs collapse to one space.
///
/// Idempotent: normalizing an already-normalized fragment is a no-op.
#[must_use]
pub fn normalize_label(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2009}' | '\u{00a0}' => ' ',
            'ё' => 'е',
            'Ё' => 'Е',
            other => other,
        })
        .collect();

    let lowered = folded.trim().to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut prev_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

/// Extracts the raw numeric candidate from a fragment that plausibly denotes
/// a currency amount.
///
/// The fragment qualifies only when it contains the `₽` glyph or the word
/// `руб` (case-insensitive); everything else returns `None` so that rating
/// counts and article numbers sitting near a price label are never mistaken
/// for prices. Cleanup order: thin/no-break spaces are removed outright,
/// currency glyphs and words are stripped, every remaining char outside
/// `[0-9,.]` is dropped, `,` maps to `.`, and the first maximal digit run
/// containing at most one decimal point is returned.
#[must_use]
pub fn price_candidate(text: &str) -> Option<String> {
    if !text.contains('₽') && !text.to_lowercase().contains("руб") {
        return None;
    }

    let stripped = text
        .replace('\u{2009}', "")
        .replace('\u{00a0}', "")
        .replace('₽', "")
        .replace("руб.", "")
        .replace("руб", "");

    let cleaned: String = stripped
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    first_digit_run(&cleaned)
}

/// First maximal run of digits with at most one embedded decimal point.
/// The point is kept only when digits follow it (`"12."` yields `"12"`).
fn first_digit_run(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;

    while i < len {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let mut end = i;
            if i < len && bytes[i] == b'.' && i + 1 < len && bytes[i + 1].is_ascii_digit() {
                i += 1;
                while i < len && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                end = i;
            }
            return Some(s[start..end].to_string());
        }
        i += 1;
    }
    None
}

/// Parses a raw candidate into a [`Decimal`] with trailing zero fractional
/// digits stripped: `"199.00"` becomes `199`, `"199.50"` becomes `199.5`.
///
/// Idempotent on its own output. Unparseable input returns `None`.
#[must_use]
pub fn normalize_price(raw: &str) -> Option<Decimal> {
    raw.parse::<Decimal>().ok().map(|d| d.normalize())
}

/// Full extraction pipeline: currency gate, cleanup, digit-run capture, and
/// decimal normalization in one call.
#[must_use]
pub fn extract_price(text: &str) -> Option<Decimal> {
    price_candidate(text).and_then(|raw| normalize_price(&raw))
}
