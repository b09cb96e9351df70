//! Positional pairing of Ozon page prices with Wildberries records.

use ozwb_core::{PagePrice, ProductRecord};

use crate::rows::PairedRow;

/// Outcome of pairing two result lists.
///
/// `ozon_count` and `wb_count` keep the original list lengths so a caller
/// can tell how much was dropped when the lists disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    pub rows: Vec<PairedRow>,
    pub ozon_count: usize,
    pub wb_count: usize,
}

impl Pairing {
    /// True when either source list was longer than the paired output.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.ozon_count != self.rows.len() || self.wb_count != self.rows.len()
    }
}

/// Pairs results row by row: index `i` of the Ozon list goes with index `i`
/// of the Wildberries list, on the assumption that the caller supplied the
/// two link lists in matching order.
///
/// The output length is the shortest of the four inputs; the surplus of any
/// longer list is dropped. URL columns come from the link lists exactly as
/// the caller gave them, not from the fetched records.
#[must_use]
pub fn pair_price_lists(
    ozon: &[PagePrice],
    wb: &[ProductRecord],
    ozon_links: &[String],
    wb_links: &[String],
) -> Pairing {
    let limit = ozon
        .len()
        .min(wb.len())
        .min(ozon_links.len())
        .min(wb_links.len());

    let mut rows = Vec::with_capacity(limit);
    for idx in 0..limit {
        let oz = &ozon[idx];
        let card = &wb[idx];
        rows.push(PairedRow {
            name: oz
                .name
                .clone()
                .or_else(|| card.name.clone())
                .unwrap_or_default(),
            ozon_url: ozon_links[idx].clone(),
            wb_url: wb_links[idx].clone(),
            price_ozon_card: oz.price_with_card,
            price_ozon_no_card: oz.price_without_card,
            price_wb: card.price,
            wb_article: card.product_id.clone(),
            parsed_at: oz.captured_at.clone(),
        });
    }

    Pairing {
        rows,
        ozon_count: ozon.len(),
        wb_count: wb.len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
