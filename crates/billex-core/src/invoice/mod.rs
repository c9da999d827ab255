//! Bill and tax-invoice field extraction.

pub mod assembler;
pub mod fields;
pub mod normalizer;
mod parser;
pub mod reconciler;
pub mod rules;

pub use assembler::{assemble, assemble_bill, RecordAssembler};
pub use fields::{ExtractorOutputs, FieldExtractors, FieldKind};
pub use normalizer::{normalize, LineNormalizer};
pub use parser::{BillParser, ExtractionResult, InvoiceParser};
pub use reconciler::{footer_band, reconcile, AmountReconciler, AmountSummary};
