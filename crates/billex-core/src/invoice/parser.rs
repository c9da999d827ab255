//! Line-based bill parser: normalize, extract, reconcile, assemble.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::models::config::BillexConfig;
use crate::models::line::{join_lines, TextLine};
use crate::models::record::{BillRecord, InvoiceRecord};
use crate::ocr::{OcrResult, DEFAULT_LINE_TOLERANCE};

use super::assembler::RecordAssembler;
use super::fields::{ExtractorOutputs, FieldExtractors};
use super::normalizer::LineNormalizer;

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Tax-invoice view of the document.
    pub invoice: InvoiceRecord,
    /// Simple-bill view of the document.
    pub bill: BillRecord,
    /// Lines that survived normalization.
    pub cleaned_lines: Vec<TextLine>,
    /// Fields that could not be found.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Cleaned lines joined with newlines, as the extractors saw them.
    pub fn cleaned_text(&self) -> String {
        join_lines(&self.cleaned_lines)
    }
}

/// Trait for bill parsing. Parsing never fails: absent fields are `None`.
pub trait InvoiceParser {
    /// Parse a document from its OCR lines.
    fn parse_lines(&self, lines: &[TextLine]) -> ExtractionResult;

    /// Parse a document from newline-separated text.
    fn parse(&self, text: &str) -> ExtractionResult {
        self.parse_lines(&TextLine::from_text(text))
    }

    /// Parse a document from an OCR result, one text line per row.
    fn parse_ocr(&self, ocr_result: &OcrResult) -> ExtractionResult {
        self.parse_lines(&ocr_result.lines(DEFAULT_LINE_TOLERANCE))
    }
}

/// Rule-based parser built from a [`BillexConfig`].
pub struct BillParser {
    line_tolerance: f32,
    normalizer: LineNormalizer,
    extractors: FieldExtractors,
    assembler: RecordAssembler,
}

impl BillParser {
    pub fn new(config: &BillexConfig) -> Self {
        Self {
            line_tolerance: config.ocr.line_merge_tolerance,
            normalizer: LineNormalizer::new(&config.normalizer),
            extractors: FieldExtractors::new(config),
            assembler: RecordAssembler::new(&config.reference, &config.extraction.default_currency),
        }
    }

    /// Raw extractor results for already cleaned lines.
    pub fn extract_fields(&self, cleaned: &[TextLine]) -> ExtractorOutputs {
        self.extractors.extract(cleaned)
    }
}

impl Default for BillParser {
    fn default() -> Self {
        Self::new(&BillexConfig::default())
    }
}

impl InvoiceParser for BillParser {
    fn parse_lines(&self, lines: &[TextLine]) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing document from {} lines", lines.len());
        trace!("Raw OCR text:\n{}", join_lines(lines));

        let cleaned_lines = self.normalizer.normalize(lines);
        debug!("Cleaned OCR text:\n{}", join_lines(&cleaned_lines));
        let outputs = self.extract_fields(&cleaned_lines);

        let invoice = self.assembler.assemble(&outputs);
        let bill = self.assembler.assemble_bill(&outputs);
        let warnings = missing_fields(&outputs);

        debug!(
            "Extracted {} items, {} amount candidates, {} missing fields",
            outputs.items.len(),
            outputs.amounts.candidates.len(),
            warnings.len()
        );

        ExtractionResult {
            invoice,
            bill,
            cleaned_lines,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn parse_ocr(&self, ocr_result: &OcrResult) -> ExtractionResult {
        let mut result = self.parse_lines(&ocr_result.lines(self.line_tolerance));
        result.processing_time_ms += ocr_result.processing_time_ms;
        result
    }
}

fn missing_fields(outputs: &ExtractorOutputs) -> Vec<String> {
    let checks = [
        ("shop name", outputs.shop_name.is_none()),
        ("bill number", outputs.bill_number.is_none()),
        ("date", outputs.date.is_none()),
        ("line items", outputs.items.is_empty()),
        ("total", outputs.total.is_none()),
        ("final amount", outputs.amounts.final_amount.is_none()),
    ];

    checks
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(field, _)| format!("Could not extract {}", field))
        .collect()
}
