//! Error types for the billex-core library.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Main error type for the billex library.
///
/// Only input and collaborator failures live here. A field the extractors
/// cannot find is not an error; it ends up as `null` in the record.
#[derive(Error, Debug)]
pub enum BillexError {
    /// The referenced input image does not exist.
    #[error("input image not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Category of a failure reported in-band to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input path does not exist.
    InputMissing,
    /// The OCR collaborator (or image decoding in front of it) failed.
    CollaboratorFailure,
    /// Anything else, such as a bad configuration.
    Internal,
}

/// Serializable error object returned instead of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Human readable message, including the underlying cause.
    pub error: String,
    /// Failure category.
    pub kind: ErrorKind,
}

impl BillexError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillexError::InputMissing(_) => ErrorKind::InputMissing,
            BillexError::Ocr(_) | BillexError::Image(_) | BillexError::Io(_) => {
                ErrorKind::CollaboratorFailure
            }
            BillexError::Config(_) => ErrorKind::Internal,
        }
    }

    /// Convert into the in-band error object.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error: self.to_string(),
            kind: self.kind(),
        }
    }
}

/// Result type for the billex library.
pub type Result<T> = std::result::Result<T, BillexError>;
