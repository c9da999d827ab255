//! Rule-based field extractors for bills and tax invoices.
//!
//! Every extractor reads the whole cleaned line sequence on its own. None of
//! them assumes a cursor left behind by another, because OCR line order is
//! only roughly reliable.

pub mod amounts;
pub mod bill_number;
pub mod dates;
pub mod document;
pub mod gstin;
pub mod items;
pub mod party;
pub mod patterns;
pub mod shop;
pub mod totals;

pub use amounts::{extract_candidates, parse_amount, AmountExtractor, CandidateAmount};
pub use bill_number::{trim_reference, BillNumberExtractor};
pub use dates::{repair_month, repair_year, DateExtractor};
pub use document::{CurrencyExtractor, InvoiceTypeExtractor, QuantityExtractor};
pub use gstin::{state_from_gstin, GstinExtractor, StateExtractor};
pub use items::LineItemExtractor;
pub use party::{label_key, PartyExtractor};
pub use shop::ShopNameExtractor;
pub use totals::TotalExtractor;

use crate::models::line::TextLine;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field, or `None` when absent.
    fn extract(&self, lines: &[TextLine]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    /// Extract all occurrences of the field, in document order.
    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output>;
}

/// A value found in the text and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the source line in the original OCR sequence.
    pub line: usize,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            line,
            source: source.into(),
        }
    }

    /// Keep the value, drop the provenance.
    pub fn into_value(self) -> T {
        self.value
    }
}
