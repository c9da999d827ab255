//! Amount candidate extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::line::TextLine;

use super::patterns::AMOUNT_CANDIDATE;
use super::{ExtractionMatch, FieldExtractor};

/// A parsed amount and the line it was read from.
pub type CandidateAmount = ExtractionMatch<Decimal>;

/// Amount candidate extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = CandidateAmount;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for line in lines {
            let text = line.text.as_str();
            for m in AMOUNT_CANDIDATE.find_iter(text) {
                if is_part_of_dotted_run(text, m.start(), m.end()) {
                    continue;
                }
                if let Some(amount) = parse_amount(m.as_str()) {
                    results.push(ExtractionMatch::new(amount, line.index, m.as_str()));
                }
            }
        }

        results
    }
}

/// Collect amount candidates from all lines.
pub fn extract_candidates(lines: &[TextLine]) -> Vec<CandidateAmount> {
    AmountExtractor::new().extract_all(lines)
}

/// Parse an amount written with comma grouping and a dot decimal separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

// A match like "12.05" inside "12.05.2024" is a date or version, not money.
fn is_part_of_dotted_run(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    let digit_at = |i: usize| bytes.get(i).is_some_and(|b| b.is_ascii_digit());

    let dotted_after = bytes.get(end) == Some(&b'.') && digit_at(end + 1);
    let dotted_before = start >= 2 && bytes[start - 1] == b'.' && digit_at(start - 2);

    dotted_after || dotted_before
}
