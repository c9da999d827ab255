//! OCR collaborator: image preprocessing and text recognition.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::line::TextLine;

/// Vertical distance (pixels) within which boxes are read as one line.
pub const DEFAULT_LINE_TOLERANCE: f32 = 20.0;

/// Anything that turns an image into recognized text boxes.
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    pub fn new(text: impl Into<String>, bbox: [f32; 8], confidence: f32) -> Self {
        Self {
            bbox,
            text: text.into(),
            confidence,
        }
    }

    /// Axis-aligned box from its corners.
    pub fn from_rect(text: impl Into<String>, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(text, [x1, y1, x2, y1, x2, y2, x1, y2], 1.0)
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let x = (self.bbox[0] + self.bbox[2] + self.bbox[4] + self.bbox[6]) / 4.0;
        let y = (self.bbox[1] + self.bbox[3] + self.bbox[5] + self.bbox[7]) / 4.0;
        (x, y)
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    pub fn sort_by_reading_order(&mut self, tolerance: f32) {
        let tolerance = tolerance.max(1.0);

        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            let row_a = (ay / tolerance) as i32;
            let row_b = (by / tolerance) as i32;

            row_a
                .cmp(&row_b)
                .then(ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal))
        });
    }

    /// Group boxes into text lines.
    ///
    /// A box joins the current line when its vertical center is within
    /// `tolerance` of the line's first box; boxes on a line are joined left to
    /// right with a space.
    pub fn lines(&self, tolerance: f32) -> Vec<TextLine> {
        let mut boxes: Vec<&TextBox> = self.boxes.iter().filter(|b| !b.text.trim().is_empty()).collect();
        boxes.sort_by(|a, b| a.center().1.partial_cmp(&b.center().1).unwrap_or(std::cmp::Ordering::Equal));

        let mut rows: Vec<Vec<&TextBox>> = Vec::new();
        for text_box in boxes {
            let y = text_box.center().1;
            match rows.last_mut() {
                Some(row) if (y - row[0].center().1).abs() < tolerance => row.push(text_box),
                _ => rows.push(vec![text_box]),
            }
        }

        rows.into_iter()
            .enumerate()
            .map(|(index, mut row)| {
                row.sort_by(|a, b| a.rect().0.partial_cmp(&b.rect().0).unwrap_or(std::cmp::Ordering::Equal));

                let text = row.iter().map(|b| b.text.trim()).collect::<Vec<_>>().join(" ");
                let bounds = row.iter().map(|b| b.rect()).fold(
                    (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
                    |acc, r| (acc.0.min(r.0), acc.1.min(r.1), acc.2.max(r.2), acc.3.max(r.3)),
                );

                TextLine::new(index, text).with_bbox([bounds.0, bounds.1, bounds.2, bounds.3])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(boxes: Vec<TextBox>) -> OcrResult {
        OcrResult {
            boxes,
            ..OcrResult::empty(400, 200)
        }
    }

    #[test]
    fn test_boxes_on_one_row_form_one_line() {
        let ocr = result(vec![
            TextBox::from_rect("40", 200.0, 52.0, 230.0, 70.0),
            TextBox::from_rect("Milk", 10.0, 50.0, 60.0, 68.0),
            TextBox::from_rect("ACME RETAIL STORE", 10.0, 5.0, 200.0, 25.0),
        ]);
        let lines = ocr.lines(DEFAULT_LINE_TOLERANCE);

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["ACME RETAIL STORE", "Milk 40"]);
        assert_eq!(lines[1].index, 1);
        assert_eq!(lines[1].bbox, Some([10.0, 50.0, 230.0, 70.0]));
    }

    #[test]
    fn test_blank_boxes_are_skipped() {
        let ocr = result(vec![TextBox::from_rect("  ", 0.0, 0.0, 10.0, 10.0)]);
        assert!(ocr.lines(DEFAULT_LINE_TOLERANCE).is_empty());
    }

    #[test]
    fn test_reading_order() {
        let mut ocr = result(vec![
            TextBox::from_rect("second", 10.0, 100.0, 50.0, 120.0),
            TextBox::from_rect("b", 60.0, 5.0, 80.0, 15.0),
            TextBox::from_rect("a", 10.0, 5.0, 30.0, 15.0),
        ]);
        ocr.sort_by_reading_order(DEFAULT_LINE_TOLERANCE);

        let texts: Vec<&str> = ocr.boxes.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "second"]);
    }
}
