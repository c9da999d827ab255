//! Party (buyer) extraction.

use crate::models::line::TextLine;

use super::{ExtractionMatch, FieldExtractor};

/// Finds a role label line such as "Buyer" and takes the next line as the party name.
pub struct PartyExtractor {
    labels: Vec<String>,
}

impl PartyExtractor {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            labels: labels.iter().map(|l| label_key(l.as_ref())).collect(),
        }
    }

    /// Position (in `lines`) of the first role label.
    pub fn find_label(&self, lines: &[TextLine]) -> Option<usize> {
        lines
            .iter()
            .position(|l| self.labels.contains(&label_key(&l.text)))
    }
}

impl Default for PartyExtractor {
    fn default() -> Self {
        Self::new(&["buyer"])
    }
}

impl FieldExtractor for PartyExtractor {
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        lines
            .windows(2)
            .filter(|pair| self.labels.contains(&label_key(&pair[0].text)))
            .map(|pair| {
                let name = &pair[1];
                ExtractionMatch::new(name.text.trim().to_string(), name.index, name.text.clone())
            })
            .collect()
    }
}

/// Comparable form of a label line: lower-case, single spaces, no trailing separators.
pub fn label_key(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    collapsed
        .trim_end_matches(|c: char| matches!(c, ':' | '.' | '-') || c.is_whitespace())
        .to_string()
}
