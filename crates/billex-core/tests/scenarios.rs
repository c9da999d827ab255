//! End-to-end extraction scenarios.

use std::path::{Path, PathBuf};

use billex_core::models::config::RecordVariant;
use billex_core::{
    BillItem, BillRecord, BillexConfig, ErrorKind, ExtractedRecord, ExtractionPipeline, InvoiceRecord,
    OcrError, OcrResult, PipelineOutcome, TextBox, TextLine, TextRecognizer,
};
use image::DynamicImage;
use pretty_assertions::assert_eq;

/// Recognizer that returns a fixed page, one box per line.
struct ScriptedRecognizer {
    lines: Vec<&'static str>,
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let boxes = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let top = 10.0 + i as f32 * 30.0;
                TextBox::from_rect(*text, 5.0, top, 300.0, top + 18.0)
            })
            .collect();

        Ok(OcrResult {
            boxes,
            ..OcrResult::empty(image.width(), image.height())
        })
    }
}

fn invoice_pipeline() -> ExtractionPipeline {
    let mut config = BillexConfig::default();
    config.output.variant = RecordVariant::Invoice;
    ExtractionPipeline::new(config)
}

fn blank_image(dir: &Path) -> PathBuf {
    let path = dir.join("scan.png");
    image::GrayImage::from_pixel(32, 32, image::Luma([255]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn simple_retail_bill() {
    let lines = TextLine::from_strs(&["ACME RETAIL STORE", "Bill No: 4521", "Milk 40", "Bread 20", "Total: 60"]);
    let result = ExtractionPipeline::default().process_lines(&lines);

    assert_eq!(
        result.bill,
        BillRecord {
            shop_name: Some("ACME RETAIL STORE".to_string()),
            bill_number: Some("4521".to_string()),
            items: vec![BillItem::new("Milk", 40), BillItem::new("Bread", 20)],
            total_amount: Some(60),
            currency: Some("INR".to_string()),
        }
    );
}

#[test]
fn two_amount_invoice() {
    let pipeline = invoice_pipeline();
    let result = pipeline.process_lines(&TextLine::from_strs(&["Taxable Value 1,000.00", "Grand Total 1,200.00"]));
    let json = serde_json::to_value(pipeline.select_record(result)).unwrap();
    let summary = &json["financial_summary"];

    assert_eq!(summary["final_payable_amount"], 1200.0);
    assert_eq!(summary["cgst_amount"], 1000.0);
    assert_eq!(summary["sgst_amount"], 1000.0);
    assert_eq!(summary["total_tax"], 2000.0);
    assert_eq!(summary["taxable_amount"], -800.0);
}

#[test]
fn empty_page_is_all_null() {
    let pipeline = invoice_pipeline();
    let result = pipeline.process_lines(&[]);

    assert_eq!(result.invoice, InvoiceRecord::default());
    assert_eq!(result.bill, BillRecord::default());

    let json = serde_json::to_value(pipeline.select_record(result)).unwrap();
    for group in json.as_object().unwrap().values() {
        assert!(group.as_object().unwrap().values().all(|v| v.is_null()));
    }
}

#[test]
fn missing_image_reports_error_without_record() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.jpg");

    let outcome = ExtractionPipeline::default().run(&missing, |_| {
        Ok(ScriptedRecognizer { lines: vec!["ACME RETAIL STORE"] })
    });

    assert!(outcome.is_error());
    assert!(outcome.record().is_none());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
    assert_eq!(json["kind"], "input_missing");
    assert!(matches!(
        outcome,
        PipelineOutcome::Error(ref report) if report.kind == ErrorKind::InputMissing
    ));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn scanned_tax_invoice() {
    let dir = tempfile::tempdir().unwrap();
    let image = blank_image(dir.path());
    let recognizer = ScriptedRecognizer {
        lines: vec![
            "TAX INVOICE",
            "NOVA DISTRIBUTORS PVT LTD",
            "GSTIN/UIN: 29AABCN1234K1Z5",
            "State Name : Kamataka Code : 29",
            "Invoice No. INV/2024/0071 Dated 12-May-2024",
            "Buyer",
            "Sri Ganesh Stores",
            "GSTIN/UIN: 33AAACS5678L1Z2",
            "Widget 1,000.00",
            "CGST 90.00",
            "SGST 90.00",
            "Total 5 Nos Rs. 1,180.00",
        ],
    };

    let outcome = invoice_pipeline().run(&image, |_| Ok(recognizer));
    let record = match outcome {
        PipelineOutcome::Record(ExtractedRecord::Invoice(record)) => record,
        other => panic!("expected invoice, got {:?}", other),
    };

    assert_eq!(record.invoice_information.invoice_type.as_deref(), Some("Tax Invoice"));
    assert_eq!(record.invoice_information.invoice_number.as_deref(), Some("INV/2024/0071"));
    assert_eq!(
        record.invoice_information.invoice_date,
        chrono::NaiveDate::from_ymd_opt(2024, 5, 12)
    );
    assert_eq!(record.seller_details.seller_name.as_deref(), Some("NOVA DISTRIBUTORS PVT LTD"));
    assert_eq!(record.seller_details.seller_state.as_deref(), Some("Karnataka"));
    assert_eq!(record.seller_details.seller_gstin.as_deref(), Some("29AABCN1234K1Z5"));
    assert_eq!(record.buyer_details.buyer_name.as_deref(), Some("Sri Ganesh Stores"));
    assert_eq!(record.buyer_details.buyer_state.as_deref(), Some("Tamil Nadu"));
    assert_eq!(record.buyer_details.buyer_gstin.as_deref(), Some("33AAACS5678L1Z2"));
    assert_eq!(record.financial_summary.currency.as_deref(), Some("INR"));
    assert_eq!(record.financial_summary.total_quantity, Some(rust_decimal::Decimal::from(5)));
    assert_eq!(
        record.financial_summary.final_payable_amount,
        Some(rust_decimal::Decimal::new(118000, 2))
    );
}
