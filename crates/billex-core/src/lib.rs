//! Core library for bill and tax-invoice OCR extraction.
//!
//! This crate provides:
//! - Image preprocessing and an OCR collaborator seam ([`ocr::TextRecognizer`])
//! - Line cleanup for noisy OCR output
//! - Rule-based field extractors (shop, reference number, date, items, totals,
//!   parties, GSTIN, state, currency)
//! - Amount reconciliation into final amount, tax and taxable base
//! - Fixed-schema bill and tax-invoice records

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pipeline;

pub use error::{BillexError, ErrorKind, ErrorReport, OcrError, Result};
pub use invoice::{
    assemble, assemble_bill, normalize, reconcile, AmountSummary, BillParser, ExtractionResult,
    ExtractorOutputs, InvoiceParser,
};
pub use models::config::{BillexConfig, RecordVariant};
pub use models::line::TextLine;
pub use models::record::{BillItem, BillRecord, InvoiceRecord};
pub use ocr::{OcrResult, TextBox, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pipeline::{ExtractedRecord, ExtractionPipeline, PipelineOutcome};
