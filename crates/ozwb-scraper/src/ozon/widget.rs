//! Price widget parsing for rendered Ozon product pages.
//!
//! The widget renders each amount on the line above its label ("c Ozon
//! Картой" / "без Ozon Карты"), so extraction is a label scan followed by
//! an upward walk to the nearest line that yields a price.

use rust_decimal::Decimal;

use crate::text::{normalize_label, normalize_price, price_candidate};

const OUT_OF_STOCK_PHRASES: [&str; 2] = ["товар закончился", "нет в наличии"];

/// True when the page text carries a vendor out-of-stock phrase.
#[must_use]
pub fn is_out_of_stock(page_text: &str) -> bool {
    let lowered = page_text.to_lowercase();
    OUT_OF_STOCK_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// Extracts `(with_card, without_card)` prices from widget text.
///
/// Only the first label match of each kind is honored; when no price line
/// precedes it the side stays `None`.
#[must_use]
pub fn extract_widget_prices(text: &str) -> (Option<Decimal>, Option<Decimal>) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let with_card = find_price_before_label(&lines, |label| {
        label.contains("ozon") && label.contains("карт") && !label.contains("без")
    });
    let without_card = find_price_before_label(&lines, |label| {
        label.contains("без") && label.contains("ozon") && label.contains("карт")
    });
    (with_card, without_card)
}

fn find_price_before_label(
    lines: &[&str],
    predicate: impl Fn(&str) -> bool,
) -> Option<Decimal> {
    let label_idx = lines
        .iter()
        .position(|line| predicate(&normalize_label(line)))?;
    lines[..label_idx]
        .iter()
        .rev()
        .find_map(|line| price_candidate(line))
        .and_then(|raw| normalize_price(&raw))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: &str = "\
        Распродажа\n\
        1\u{2009}399 ₽\n\
        c Ozon Картой\n\
        1 599 ₽\n\
        2 100 ₽\n\
        без Ozon Карты\n";

    #[test]
    fn extracts_both_price_kinds() {
        let (with_card, without_card) = extract_widget_prices(WIDGET);
        assert_eq!(with_card, Some("1399".parse().unwrap()));
        // Nearest line above the label wins.
        assert_eq!(without_card, Some("2100".parse().unwrap()));
    }

    #[test]
    fn with_card_label_must_not_contain_bez() {
        let text = "999 ₽\nбез Ozon Карты\n";
        let (with_card, without_card) = extract_widget_prices(text);
        assert!(with_card.is_none());
        assert_eq!(without_card, Some("999".parse().unwrap()));
    }

    #[test]
    fn label_match_survives_nbsp_and_case() {
        let text = "1\u{a0}234 ₽\nБЕЗ\u{a0}OZON\u{a0}КАРТЫ\n";
        let (_, without_card) = extract_widget_prices(text);
        assert_eq!(without_card, Some("1234".parse().unwrap()));
    }

    #[test]
    fn first_label_occurrence_wins() {
        // Even with a second with-card label further down, only the first
        // one is scanned.
        let text = "нет цены здесь\nс Ozon Картой\n777 ₽\nс Ozon Картой\n";
        let (with_card, _) = extract_widget_prices(text);
        assert!(with_card.is_none());
    }

    #[test]
    fn non_price_lines_above_the_label_are_skipped() {
        let text = "Осталось 3 шт\n5 990 ₽\nкакой-то бейдж\nc Ozon Картой\n";
        let (with_card, _) = extract_widget_prices(text);
        assert_eq!(with_card, Some("5990".parse().unwrap()));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(extract_widget_prices(""), (None, None));
        assert_eq!(extract_widget_prices("просто текст"), (None, None));
    }

    #[test]
    fn out_of_stock_phrases_match_case_insensitively() {
        assert!(is_out_of_stock("К сожалению, ТОВАР ЗАКОНЧИЛСЯ."));
        assert!(is_out_of_stock("Сейчас нет в наличии, загляните позже"));
        assert!(!is_out_of_stock("В наличии, доставка завтра"));
    }
}
