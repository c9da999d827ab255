//! Line item extraction.

use crate::models::line::TextLine;
use crate::models::record::BillItem;

use super::patterns::ITEM_LINE;
use super::{ExtractionMatch, FieldExtractor};

/// Reads `description price` lines.
///
/// Prices at or below the minimum are treated as page numbers or row
/// counters and skipped.
pub struct LineItemExtractor {
    min_price: u32,
}

impl LineItemExtractor {
    pub fn new() -> Self {
        Self { min_price: 5 }
    }

    /// Prices must exceed this value.
    pub fn with_min_price(mut self, min_price: u32) -> Self {
        self.min_price = min_price;
        self
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = ExtractionMatch<BillItem>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .iter()
            .filter_map(|line| {
                let caps = ITEM_LINE.captures(&line.text)?;
                let name = caps[1].trim();
                let price: u32 = caps[2].parse().ok()?;

                (price > self.min_price && !name.is_empty())
                    .then(|| ExtractionMatch::new(BillItem::new(name, price), line.index, &caps[0]))
            })
            .collect()
    }
}
