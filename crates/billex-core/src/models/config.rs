//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BillexError;

/// Main configuration for the billex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillexConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessConfig,

    /// Line cleanup configuration.
    pub normalizer: NormalizerConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Document-independent lookup tables.
    pub reference: ReferenceData,

    /// Output configuration.
    pub output: OutputConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,

    /// Vertical distance (pixels) within which text boxes share a line.
    pub line_merge_tolerance: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            line_merge_tolerance: 20.0,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Run preprocessing at all; when false the decoded image goes straight to OCR.
    pub enabled: bool,

    /// Upscale factor applied before denoising.
    pub scale: f32,

    /// Median filter radius (0 disables).
    pub median_radius: u32,

    /// Adaptive threshold window size (odd, 0 disables thresholding).
    pub threshold_block: u32,

    /// Constant subtracted from the local mean.
    pub threshold_offset: i32,

    /// Run a 3x3 morphological close after thresholding.
    pub close_gaps: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 1.7,
            median_radius: 2,
            threshold_block: 11,
            threshold_offset: 2,
            close_gaps: true,
        }
    }
}

/// Line cleanup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Non-alphanumeric characters kept in a cleaned line.
    pub allowed_symbols: String,

    /// Glyphs always removed, even if listed in `allowed_symbols`.
    pub noise_glyphs: String,

    /// Lines shorter than this (in characters) after cleanup are dropped.
    pub min_line_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            allowed_symbols: " ₹:/.-".to_string(),
            noise_glyphs: "|!".to_string(),
            min_line_length: 3,
        }
    }
}

/// How tax-like amounts are chosen among numeric candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Second largest distinct amount anywhere in the document.
    #[default]
    Lenient,
    /// Only amounts in the footer band, inside the plausibility range.
    Strict,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Only the first N lines are considered for the shop name.
    pub shop_scan_limit: Option<usize>,

    /// An upper-case line must be longer than this to count as a shop name.
    pub shop_name_min_length: usize,

    /// Lines scanned after a "No" label when the label line has no number.
    pub bill_number_window: usize,

    /// Minimum length of a line accepted as a bill number by the window scan.
    pub bill_number_min_length: usize,

    /// Item prices must exceed this to be kept.
    pub min_item_price: u32,

    /// Fall back to the largest integer when no total keyword is present.
    pub total_fallback_to_largest: bool,

    /// Integers must exceed this to be used by the total fallback.
    pub total_fallback_min: u64,

    /// Tax selection mode.
    pub reconcile_mode: ReconcileMode,

    /// Fraction of the line count where the footer band starts (strict mode).
    pub footer_start_fraction: f64,

    /// Smallest plausible tax amount (strict mode).
    pub tax_min: Decimal,

    /// Largest plausible tax amount (strict mode).
    pub tax_max: Decimal,

    /// Currency reported when amounts exist but no currency marker was seen.
    pub default_currency: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            shop_scan_limit: None,
            shop_name_min_length: 15,
            bill_number_window: 3,
            bill_number_min_length: 3,
            min_item_price: 5,
            total_fallback_to_largest: true,
            total_fallback_min: 10,
            reconcile_mode: ReconcileMode::Lenient,
            footer_start_fraction: 0.5,
            tax_min: Decimal::ONE,
            tax_max: Decimal::from(10_000_000),
            default_currency: "INR".to_string(),
        }
    }
}

/// Lookup tables that vary by deployment rather than by document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    /// Words that mark a line as an organisation name.
    pub org_suffixes: Vec<String>,

    /// Labels introducing the buyer block.
    pub buyer_labels: Vec<String>,

    /// Tax values known to appear on the documents being processed.
    pub known_tax_amounts: Vec<Decimal>,

    /// GST state code to state name.
    pub state_codes: BTreeMap<String, String>,

    /// OCR misspelling to correct spelling, applied to free-text fields.
    pub corrections: BTreeMap<String, String>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        let org_suffixes = ["PVT", "LTD", "LIMITED", "LLP", "INC", "CORP"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let buyer_labels = ["buyer", "buyer bill to", "bill to", "billed to"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let corrections = [
            ("Kamataka", "Karnataka"),
            ("Tamilnadu", "Tamil Nadu"),
            ("Telangna", "Telangana"),
            ("Maharastra", "Maharashtra"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            org_suffixes,
            buyer_labels,
            known_tax_amounts: Vec::new(),
            state_codes: default_state_codes(),
            corrections,
        }
    }
}

fn default_state_codes() -> BTreeMap<String, String> {
    [
        ("01", "Jammu and Kashmir"),
        ("02", "Himachal Pradesh"),
        ("03", "Punjab"),
        ("04", "Chandigarh"),
        ("05", "Uttarakhand"),
        ("06", "Haryana"),
        ("07", "Delhi"),
        ("08", "Rajasthan"),
        ("09", "Uttar Pradesh"),
        ("10", "Bihar"),
        ("11", "Sikkim"),
        ("12", "Arunachal Pradesh"),
        ("13", "Nagaland"),
        ("14", "Manipur"),
        ("15", "Mizoram"),
        ("16", "Tripura"),
        ("17", "Meghalaya"),
        ("18", "Assam"),
        ("19", "West Bengal"),
        ("20", "Jharkhand"),
        ("21", "Odisha"),
        ("22", "Chhattisgarh"),
        ("23", "Madhya Pradesh"),
        ("24", "Gujarat"),
        ("26", "Dadra and Nagar Haveli and Daman and Diu"),
        ("27", "Maharashtra"),
        ("29", "Karnataka"),
        ("30", "Goa"),
        ("31", "Lakshadweep"),
        ("32", "Kerala"),
        ("33", "Tamil Nadu"),
        ("34", "Puducherry"),
        ("35", "Andaman and Nicobar Islands"),
        ("36", "Telangana"),
        ("37", "Andhra Pradesh"),
        ("38", "Ladakh"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Which record shape is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordVariant {
    /// Simple retail bill.
    #[default]
    Bill,
    /// Tax invoice with seller, buyer and financial summary groups.
    Invoice,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the record is written after each run.
    pub path: PathBuf,

    /// Record shape to write.
    pub variant: RecordVariant,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output").join("final_bill.json"),
            variant: RecordVariant::Bill,
        }
    }
}

impl BillexConfig {
    /// Load configuration from a JSON file.
    ///
    /// A file that cannot be read is an I/O error; one that does not
    /// deserialize is a [`BillexError::Config`].
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BillexError::Config(format!("{}: {}", path.display(), e)))
    }
}
