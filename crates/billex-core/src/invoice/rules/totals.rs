//! Keyword-anchored bill total extraction.

use crate::models::line::{join_lines, TextLine};

use super::patterns::{STANDALONE_INTEGER, TOTAL_KEYWORD};
use super::{ExtractionMatch, FieldExtractor};

/// Total amount extractor.
///
/// Looks for `Total`, `Amt` or `Net` followed by an integer. When no keyword
/// is present and the fallback is enabled, the largest standalone integer
/// above the fallback minimum is used instead.
pub struct TotalExtractor {
    fallback: bool,
    fallback_min: u64,
}

impl TotalExtractor {
    pub fn new() -> Self {
        Self {
            fallback: true,
            fallback_min: 10,
        }
    }

    /// Enable or disable the largest-integer fallback.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Integers must exceed this value to be considered by the fallback.
    pub fn with_fallback_min(mut self, min: u64) -> Self {
        self.fallback_min = min;
        self
    }

    fn extract_keyword(&self, lines: &[TextLine]) -> Option<ExtractionMatch<u64>> {
        let text = join_lines(lines);
        let caps = TOTAL_KEYWORD.captures(&text)?;
        let value: u64 = caps[2].parse().ok()?;

        let start = caps.get(0)?.start();
        let line = lines
            .get(text[..start].matches('\n').count())
            .map(|l| l.index)
            .unwrap_or_default();

        Some(ExtractionMatch::new(value, line, &caps[0]))
    }

    fn extract_largest(&self, lines: &[TextLine]) -> Option<ExtractionMatch<u64>> {
        lines
            .iter()
            .flat_map(|line| {
                STANDALONE_INTEGER.find_iter(&line.text).filter_map(move |m| {
                    let value: u64 = m.as_str().parse().ok()?;
                    Some(ExtractionMatch::new(value, line.index, m.as_str()))
                })
            })
            .filter(|m| m.value > self.fallback_min)
            .max_by_key(|m| m.value)
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<u64>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        let found = match self.extract_keyword(lines) {
            Some(m) => Some(m),
            None if self.fallback => self.extract_largest(lines),
            None => None,
        };
        found.into_iter().collect()
    }
}
