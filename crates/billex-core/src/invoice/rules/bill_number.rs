//! Bill and invoice number extraction.

use crate::models::line::{join_lines, TextLine};

use super::patterns::{BILL_NUMBER_STRICT, DIGIT_TOKEN, NUMBER_MARKER};
use super::{ExtractionMatch, FieldExtractor};

/// Bill/invoice number extractor.
///
/// A structured reference such as `INV/2024/0071` anywhere in the text wins.
/// Otherwise the first line carrying a "No" label is used: a number on the
/// label line itself, or else the first digit-bearing line within a small
/// window below it.
pub struct BillNumberExtractor {
    window: usize,
    min_length: usize,
}

impl BillNumberExtractor {
    pub fn new() -> Self {
        Self {
            window: 3,
            min_length: 3,
        }
    }

    /// Set how many lines below the label are scanned.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the minimum length of a line accepted by the window scan.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    fn extract_structured(&self, lines: &[TextLine]) -> Option<ExtractionMatch<String>> {
        let text = join_lines(lines);
        let m = BILL_NUMBER_STRICT.find(&text)?;

        // Newlines separate lines, so the match line is the count of newlines before it
        let position = text[..m.start()].matches('\n').count();
        let line = lines.get(position).map(|l| l.index).unwrap_or_default();

        Some(ExtractionMatch::new(trim_reference(m.as_str()), line, m.as_str()))
    }

    fn extract_labeled(&self, lines: &[TextLine]) -> Option<ExtractionMatch<String>> {
        let (pos, marker_end) = lines
            .iter()
            .enumerate()
            .find_map(|(i, l)| NUMBER_MARKER.find(&l.text).map(|m| (i, m.end())))?;

        // Only the word right after the marker counts
        let label = &lines[pos];
        let next_word = label.text[marker_end..].split_whitespace().next();
        if let Some(token) = next_word.and_then(|w| DIGIT_TOKEN.find(w)) {
            let value = trim_reference(token.as_str());
            if !value.is_empty() {
                return Some(ExtractionMatch::new(value, label.index, label.text.clone()));
            }
        }

        lines
            .iter()
            .skip(pos + 1)
            .take(self.window)
            .find(|l| {
                l.text.trim().chars().count() >= self.min_length
                    && l.text.chars().any(|c| c.is_ascii_digit())
            })
            .map(|l| ExtractionMatch::new(trim_reference(&l.text), l.index, l.text.clone()))
            .filter(|m| !m.value.is_empty())
    }
}

impl Default for BillNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BillNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        self.extract_structured(lines)
            .or_else(|| self.extract_labeled(lines))
            .into_iter()
            .collect()
    }
}

/// Strip trailing separators and whitespace from a reference number.
pub fn trim_reference(s: &str) -> String {
    s.trim()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '/' | '-' | '.' | ':' | ','))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(lines: &[&str]) -> Option<String> {
        BillNumberExtractor::new()
            .extract(&TextLine::from_strs(lines))
            .map(|m| m.value)
    }

    #[test]
    fn test_number_on_label_line() {
        assert_eq!(extract(&["ACME RETAIL STORE", "Bill No: 4521"]), Some("4521".to_string()));
        assert_eq!(extract(&["Invoice No. A-77/"]), Some("A-77".to_string()));
    }

    #[test]
    fn test_structured_reference_wins() {
        let lines = ["Bill No: 12", "Ref INV/2024/0071 dated"];
        assert_eq!(extract(&lines), Some("INV/2024/0071".to_string()));

        assert_eq!(extract(&["GST/23-24/115."]), Some("GST/23-24/115".to_string()));
    }

    #[test]
    fn test_structured_match_reports_its_line() {
        let lines = vec![TextLine::new(4, "TAX INVOICE"), TextLine::new(9, "No INV/2024/0071")];
        let m = BillNumberExtractor::new().extract(&lines).unwrap();

        assert_eq!(m.line, 9);
    }

    #[test]
    fn test_window_scan_below_label() {
        let lines = ["Invoice No. Dated", "Delivery Note", "SI-0042 12-May-2024"];
        assert_eq!(extract(&lines), Some("SI-0042 12-May-2024".to_string()));
    }

    #[test]
    fn test_date_on_label_line_is_not_the_number() {
        let lines = ["Invoice No. Dated 12-May-2024", "SI-0042"];
        assert_eq!(extract(&lines), Some("SI-0042".to_string()));

        assert_eq!(extract(&["Bill No: 4521 Dated 12-May-2024"]), Some("4521".to_string()));
    }

    #[test]
    fn test_window_is_bounded() {
        let lines = ["Invoice No.", "Seller", "Address", "Phone", "SI-0042"];
        assert_eq!(extract(&lines), None);

        let wide = BillNumberExtractor::new().with_window(4);
        let found = wide.extract(&TextLine::from_strs(&lines)).map(|m| m.value);
        assert_eq!(found, Some("SI-0042".to_string()));
    }

    #[test]
    fn test_no_label() {
        assert_eq!(extract(&["Milk 40", "Bread 20"]), None);
        assert_eq!(extract(&[]), None);
    }

    #[test]
    fn test_trim_reference() {
        assert_eq!(trim_reference(" 4521/- "), "4521");
        assert_eq!(trim_reference("INV/22:"), "INV/22");
    }
}
