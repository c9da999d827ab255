//! GST registration id and state extraction.

use std::collections::BTreeMap;

use crate::models::line::TextLine;

use super::patterns::{GSTIN, STATE_CODE_SUFFIX, STATE_LABEL};
use super::{ExtractionMatch, FieldExtractor};

/// GSTIN extractor. Matches are reported in document order.
pub struct GstinExtractor;

impl GstinExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GstinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GstinExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .iter()
            .flat_map(|line| {
                let upper = line.text.to_uppercase();
                GSTIN
                    .captures_iter(&upper)
                    .map(|caps| ExtractionMatch::new(caps[1].to_string(), line.index, &caps[0]))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// `State Name: Karnataka` label extractor.
pub struct StateExtractor;

impl StateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .iter()
            .filter_map(|line| {
                let caps = STATE_LABEL.captures(&line.text)?;
                let name = STATE_CODE_SUFFIX.replace(caps[1].trim(), "");
                let name = name.trim();
                (!name.is_empty())
                    .then(|| ExtractionMatch::new(name.to_string(), line.index, &caps[0]))
            })
            .collect()
    }
}

/// Look up the state named by the first two digits of a GSTIN.
pub fn state_from_gstin(gstin: &str, state_codes: &BTreeMap<String, String>) -> Option<String> {
    let code = gstin.get(..2)?;
    state_codes.get(code).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_gstins_in_order() {
        let lines = TextLine::from_strs(&[
            "GSTIN/UIN: 29AABCU9603R1ZM",
            "Buyer",
            "gstin 33aaacn1234k1z5",
        ]);
        let found: Vec<String> = GstinExtractor::new()
            .extract_all(&lines)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(found, vec!["29AABCU9603R1ZM", "33AAACN1234K1Z5"]);
    }

    #[test]
    fn test_malformed_gstin_is_ignored() {
        let lines = TextLine::from_strs(&["GSTIN 29AABCU9603R1XM"]);
        assert!(GstinExtractor::new().extract_all(&lines).is_empty());
    }

    #[test]
    fn test_state_label() {
        let lines = TextLine::from_strs(&["State Name : Kamataka Code : 29"]);
        let found = StateExtractor::new().extract(&lines).map(|m| m.value);

        assert_eq!(found, Some("Kamataka".to_string()));
    }

    #[test]
    fn test_state_label_without_code() {
        let lines = TextLine::from_strs(&["State Name: Tamil Nadu"]);
        let found = StateExtractor::new().extract(&lines).map(|m| m.value);

        assert_eq!(found, Some("Tamil Nadu".to_string()));
    }

    #[test]
    fn test_state_from_gstin() {
        let codes: BTreeMap<String, String> =
            [("29".to_string(), "Karnataka".to_string())].into_iter().collect();

        assert_eq!(state_from_gstin("29AABCU9603R1ZM", &codes), Some("Karnataka".to_string()));
        assert_eq!(state_from_gstin("99AABCU9603R1ZM", &codes), None);
        assert_eq!(state_from_gstin("", &codes), None);
    }
}
