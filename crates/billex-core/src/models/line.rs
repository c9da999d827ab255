//! Text lines as produced by the OCR collaborator.

use serde::{Deserialize, Serialize};

/// One line of recognized text and its position in the original sequence.
///
/// The index is the position the line had before any cleanup, so it stays
/// stable when junk lines around it are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Position in the sequence returned by the OCR collaborator.
    pub index: usize,

    /// Line content.
    pub text: String,

    /// Axis-aligned bounds (x1, y1, x2, y2) when layout information is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,
}

impl TextLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            bbox: None,
        }
    }

    pub fn with_bbox(mut self, bbox: [f32; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Build a numbered sequence from plain strings.
    pub fn from_strs<S: AsRef<str>>(lines: &[S]) -> Vec<TextLine> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| TextLine::new(i, l.as_ref()))
            .collect()
    }

    /// Split a block of text on newlines into a numbered sequence.
    pub fn from_text(text: &str) -> Vec<TextLine> {
        text.lines()
            .enumerate()
            .map(|(i, l)| TextLine::new(i, l))
            .collect()
    }
}

/// Join line texts with newlines, for extractors that match across the whole document.
pub fn join_lines(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_numbers_lines() {
        let lines = TextLine::from_text("first\n\nthird");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], TextLine::new(2, "third"));
    }

    #[test]
    fn test_join_lines() {
        let lines = TextLine::from_strs(&["a", "b"]);
        assert_eq!(join_lines(&lines), "a\nb");
    }
}
