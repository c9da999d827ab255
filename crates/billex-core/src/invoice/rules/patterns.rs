//! Common regex patterns for bill and invoice extraction.
//!
//! Digits are matched as ASCII `[0-9]` only.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Reference numbers: alphabetic prefix plus slash-delimited numeric groups
    pub static ref BILL_NUMBER_STRICT: Regex = Regex::new(
        r"\b[A-Za-z]+(?:/[0-9]+(?:-[0-9]+)?){2,}\b"
    ).unwrap();

    // "No", "No.", "NO:" as a standalone word
    pub static ref NUMBER_MARKER: Regex = Regex::new(
        r"(?i)\bno\b\.?\s*[:\-]?"
    ).unwrap();

    pub static ref DIGIT_TOKEN: Regex = Regex::new(
        r"[A-Za-z0-9/\-]*[0-9][A-Za-z0-9/\-]*"
    ).unwrap();

    // Day, three-letter month (or a known misread of one), year
    pub static ref DATE_DAY_MONTH_YEAR: Regex = Regex::new(
        r"(?i)\b([0-9]{1,2})[\s./\-]*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|0ct|ju1|5ep|n0v|0ec)[a-z]*[\s./\-]*([0-9]{2,4})\b"
    ).unwrap();

    // Line items: description followed by a short price at end of line
    pub static ref ITEM_LINE: Regex = Regex::new(
        r"([A-Za-z ]{3,})\s+([0-9]{1,4})$"
    ).unwrap();

    // Keyword-anchored totals
    pub static ref TOTAL_KEYWORD: Regex = Regex::new(
        r"(?i)(Total|Tota|Amt|Net)\s*[:\-]?\s*([0-9]+)"
    ).unwrap();

    pub static ref STANDALONE_INTEGER: Regex = Regex::new(
        r"\b[0-9]+\b"
    ).unwrap();

    // Amounts: grouped (1,200.00 / 12,34,567.50) or plain with two decimals (1200.00)
    pub static ref AMOUNT_CANDIDATE: Regex = Regex::new(
        r"\b(?:[0-9]{1,3}(?:,[0-9]{2,3})*,[0-9]{3}(?:\.[0-9]{1,2})?|[0-9]+\.[0-9]{2})\b"
    ).unwrap();

    // Document titles
    pub static ref INVOICE_TYPE: Regex = Regex::new(
        r"(?i)\b(tax\s+invoice|bill\s+of\s+supply|proforma\s+invoice|credit\s+note|debit\s+note|retail\s+invoice|cash\s+memo|invoice)\b"
    ).unwrap();

    // Indian GST registration id
    pub static ref GSTIN: Regex = Regex::new(
        r"\b([0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z])\b"
    ).unwrap();

    pub static ref STATE_LABEL: Regex = Regex::new(
        r"(?i)\bstate\s*name\s*[:\-]?\s*([A-Za-z][A-Za-z ]*)"
    ).unwrap();

    pub static ref STATE_CODE_SUFFIX: Regex = Regex::new(
        r"(?i)\s*\bcode\b.*$"
    ).unwrap();

    pub static ref CURRENCY_MARKER: Regex = Regex::new(
        r"(?i)(₹|\bINR\b|\bRs\b)"
    ).unwrap();

    pub static ref TOTAL_WORD: Regex = Regex::new(
        r"(?i)\btotal\b"
    ).unwrap();

    pub static ref QUANTITY_WITH_UNIT: Regex = Regex::new(
        r"(?i)\b([0-9]+(?:\.[0-9]+)?)\s*(?:nos|pcs|pc|units|qty|kg)\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        assert!(!DIGIT_TOKEN.is_match("INV-४५२१"));
        assert!(!AMOUNT_CANDIDATE.is_match("१२००.००"));
        assert!(!STANDALONE_INTEGER.is_match("٦٠"));
        assert!(!TOTAL_KEYWORD.is_match("Total ६०"));

        assert!(DIGIT_TOKEN.is_match("INV-4521"));
        assert!(AMOUNT_CANDIDATE.is_match("1200.00"));
    }
}
