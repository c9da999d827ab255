//! Document-level fields: title, currency, total quantity.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::line::TextLine;

use super::patterns::{CURRENCY_MARKER, INVOICE_TYPE, QUANTITY_WITH_UNIT, TOTAL_WORD};
use super::{ExtractionMatch, FieldExtractor};

/// Document title extractor ("Tax Invoice", "Bill of Supply", ...).
pub struct InvoiceTypeExtractor;

impl InvoiceTypeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceTypeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceTypeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .iter()
            .filter_map(|line| {
                let caps = INVOICE_TYPE.captures(&line.text)?;
                Some(ExtractionMatch::new(title_case(&caps[1]), line.index, &caps[0]))
            })
            .collect()
    }
}

fn title_case(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if lower == "of" {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Currency marker extractor. Every marker it knows denotes Indian rupees.
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .iter()
            .filter_map(|line| {
                let m = CURRENCY_MARKER.find(&line.text)?;
                Some(ExtractionMatch::new("INR".to_string(), line.index, m.as_str()))
            })
            .collect()
    }
}

/// Quantity printed on a total line, e.g. `Total 5 Nos 1180.00`.
pub struct QuantityExtractor;

impl QuantityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for QuantityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for QuantityExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .iter()
            .filter(|line| TOTAL_WORD.is_match(&line.text))
            .filter_map(|line| {
                let caps = QUANTITY_WITH_UNIT.captures(&line.text)?;
                let quantity = Decimal::from_str(&caps[1]).ok()?;
                Some(ExtractionMatch::new(quantity, line.index, &caps[0]))
            })
            .collect()
    }
}
