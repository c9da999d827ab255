//! OCR line cleanup.

use tracing::debug;

use crate::models::config::NormalizerConfig;
use crate::models::line::TextLine;

/// Strips noise characters and drops junk lines.
#[derive(Debug, Clone)]
pub struct LineNormalizer {
    allowed: Vec<char>,
    noise: Vec<char>,
    min_line_length: usize,
}

impl LineNormalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            allowed: config.allowed_symbols.chars().collect(),
            noise: config.noise_glyphs.chars().collect(),
            min_line_length: config.min_line_length,
        }
    }

    /// Clean a single line.
    pub fn clean_line(&self, line: &str) -> String {
        let kept: String = line
            .trim()
            .chars()
            .filter(|c| !self.noise.contains(c))
            .filter(|c| c.is_ascii_alphanumeric() || self.allowed.contains(c))
            .collect();

        kept.trim().to_string()
    }

    /// Clean a line sequence. Surviving lines keep their order and index.
    pub fn normalize(&self, lines: &[TextLine]) -> Vec<TextLine> {
        let cleaned: Vec<TextLine> = lines
            .iter()
            .filter_map(|line| {
                let text = self.clean_line(&line.text);
                if text.chars().count() < self.min_line_length {
                    return None;
                }
                Some(TextLine {
                    index: line.index,
                    text,
                    bbox: line.bbox,
                })
            })
            .collect();

        debug!("Normalized {} lines down to {}", lines.len(), cleaned.len());
        cleaned
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

/// Clean a line sequence with the default settings.
pub fn normalize(lines: &[TextLine]) -> Vec<TextLine> {
    LineNormalizer::default().normalize(lines)
}
