//! End-to-end extraction: input check, preprocessing, OCR, parsing, output.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{BillexError, ErrorReport, OcrError, Result};
use crate::invoice::{BillParser, ExtractionResult, InvoiceParser};
use crate::models::config::{BillexConfig, OcrConfig, RecordVariant};
use crate::models::line::TextLine;
use crate::models::record::{BillRecord, InvoiceRecord};
use crate::ocr::{ImagePreprocessor, TextRecognizer};

/// The record shape selected by [`RecordVariant`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedRecord {
    Bill(BillRecord),
    Invoice(InvoiceRecord),
}

/// What a run hands back: a record, or the in-band error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineOutcome {
    Record(ExtractedRecord),
    Error(ErrorReport),
}

impl PipelineOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, PipelineOutcome::Error(_))
    }

    pub fn record(&self) -> Option<&ExtractedRecord> {
        match self {
            PipelineOutcome::Record(record) => Some(record),
            PipelineOutcome::Error(_) => None,
        }
    }
}

/// Runs one document at a time through the whole extraction chain.
pub struct ExtractionPipeline {
    config: BillexConfig,
    parser: BillParser,
    preprocessor: ImagePreprocessor,
}

impl ExtractionPipeline {
    pub fn new(config: BillexConfig) -> Self {
        let parser = BillParser::new(&config);
        let preprocessor = ImagePreprocessor::new(&config.preprocessing);
        Self {
            config,
            parser,
            preprocessor,
        }
    }

    /// Parse lines that were already recognized.
    pub fn process_lines(&self, lines: &[TextLine]) -> ExtractionResult {
        self.parser.parse_lines(lines)
    }

    /// Pick the configured record shape out of a parse result.
    pub fn select_record(&self, result: ExtractionResult) -> ExtractedRecord {
        match self.config.output.variant {
            RecordVariant::Bill => ExtractedRecord::Bill(result.bill),
            RecordVariant::Invoice => ExtractedRecord::Invoice(result.invoice),
        }
    }

    /// Decode, preprocess and recognize an image, then parse the text.
    pub fn extract_image<R: TextRecognizer>(&self, path: &Path, recognizer: &R) -> Result<ExtractionResult> {
        check_input(path)?;

        let image = image::open(path)?;
        let prepared = self.prepare(&image)?;
        let ocr = recognizer.recognize(&prepared)?;
        debug!("Recognized {} text boxes", ocr.boxes.len());

        let result = self.parser.parse_ocr(&ocr);
        for warning in &result.warnings {
            debug!("{}", warning);
        }
        Ok(result)
    }

    /// Run the full chain for one image.
    ///
    /// The input path is checked before `connect` builds the recognizer, so a
    /// missing image never loads OCR models. Failures come back as
    /// [`PipelineOutcome::Error`].
    pub fn run<R, F>(&self, path: &Path, connect: F) -> PipelineOutcome
    where
        R: TextRecognizer,
        F: FnOnce(&OcrConfig) -> std::result::Result<R, OcrError>,
    {
        info!("Extracting {}", path.display());

        let outcome = check_input(path)
            .and_then(|_| connect(&self.config.ocr).map_err(BillexError::from))
            .and_then(|recognizer| self.extract_image(path, &recognizer));

        match outcome {
            Ok(result) => PipelineOutcome::Record(self.select_record(result)),
            Err(e) => {
                warn!("Extraction failed: {}", e);
                PipelineOutcome::Error(e.report())
            }
        }
    }

    /// Run the full chain with the bundled ONNX engine.
    #[cfg(feature = "native")]
    pub fn run_native(&self, path: &Path) -> PipelineOutcome {
        self.run(path, crate::ocr::PureOcrEngine::from_config)
    }

    /// Write a record as pretty JSON to the configured output path.
    pub fn write_output(&self, record: &ExtractedRecord) -> Result<PathBuf> {
        let path = self.config.output.path.clone();
        write_json(&path, record)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    fn prepare(&self, image: &DynamicImage) -> Result<DynamicImage> {
        Ok(self.preprocessor.process(image)?)
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(BillexConfig::default())
    }
}

fn check_input(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(BillexError::InputMissing(path.to_path_buf()))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    fs::write(path, content)?;
    Ok(())
}
