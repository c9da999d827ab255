//! Shop and seller name extraction.

use crate::models::line::TextLine;

use super::{ExtractionMatch, FieldExtractor};

/// Picks the first line that looks like a business name.
///
/// A line qualifies when it is entirely upper-case and longer than the
/// minimum length, or when it contains an organisational suffix such as
/// `PVT` or `LLP`.
pub struct ShopNameExtractor {
    scan_limit: Option<usize>,
    min_length: usize,
    org_suffixes: Vec<String>,
}

impl ShopNameExtractor {
    pub fn new() -> Self {
        Self {
            scan_limit: None,
            min_length: 15,
            org_suffixes: Vec::new(),
        }
    }

    /// Only consider the first `limit` lines.
    pub fn with_scan_limit(mut self, limit: Option<usize>) -> Self {
        self.scan_limit = limit;
        self
    }

    /// Set the length an upper-case line must exceed.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Set the organisational suffix words.
    pub fn with_org_suffixes<S: AsRef<str>>(mut self, suffixes: &[S]) -> Self {
        self.org_suffixes = suffixes.iter().map(|s| s.as_ref().to_uppercase()).collect();
        self
    }

    fn is_candidate(&self, text: &str) -> bool {
        let text = text.trim();
        (is_upper(text) && text.chars().count() > self.min_length) || self.has_org_suffix(text)
    }

    fn has_org_suffix(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| self.org_suffixes.contains(&w.to_uppercase()))
    }
}

impl Default for ShopNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ShopNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        let limit = self.scan_limit.unwrap_or(lines.len());

        lines
            .iter()
            .take(limit)
            .filter(|l| self.is_candidate(&l.text))
            .map(|l| ExtractionMatch::new(l.text.trim().to_string(), l.index, l.text.clone()))
            .collect()
    }
}

// At least one cased letter and no lower-case ones.
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> ShopNameExtractor {
        ShopNameExtractor::new().with_org_suffixes(&["PVT", "LTD", "LLP"])
    }

    fn extract(extractor: &ShopNameExtractor, lines: &[&str]) -> Option<String> {
        extractor.extract(&TextLine::from_strs(lines)).map(|m| m.value)
    }

    #[test]
    fn test_upper_case_line() {
        let lines = ["ACME RETAIL STORE", "Bill No: 4521"];
        assert_eq!(extract(&extractor(), &lines), Some("ACME RETAIL STORE".to_string()));
    }

    #[test]
    fn test_short_upper_case_line_is_skipped() {
        let lines = ["TAX INVOICE", "BILL NO 12", "SHREE BALAJI GENERAL STORES"];
        assert_eq!(
            extract(&extractor(), &lines),
            Some("SHREE BALAJI GENERAL STORES".to_string())
        );
    }

    #[test]
    fn test_org_suffix_line() {
        let lines = ["Tax Invoice", "Nova Foods Pvt Ltd", "ACME RETAIL STORE"];
        assert_eq!(extract(&extractor(), &lines), Some("Nova Foods Pvt Ltd".to_string()));
    }

    #[test]
    fn test_suffix_must_be_whole_word() {
        let lines = ["Saltdale market"];
        assert_eq!(extract(&extractor(), &lines), None);
    }

    #[test]
    fn test_scan_limit() {
        let lines = ["Bill", "Date", "ACME RETAIL STORE"];
        let limited = extractor().with_scan_limit(Some(2));

        assert_eq!(extract(&limited, &lines), None);
        assert_eq!(extract(&extractor(), &lines), Some("ACME RETAIL STORE".to_string()));
    }

    #[test]
    fn test_digits_only_line_is_not_upper() {
        assert_eq!(extract(&extractor(), &["1234567890123456"]), None);
    }
}
