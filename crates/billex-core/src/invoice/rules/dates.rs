//! Date extraction for bills and invoices.

use chrono::NaiveDate;

use crate::models::line::TextLine;

use super::patterns::DATE_DAY_MONTH_YEAR;
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor for `12-May-2024` style dates.
///
/// Only the first day/month/year match in the document counts. If that
/// match does not form a real calendar date the field is unknown.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract_all(&self, lines: &[TextLine]) -> Vec<Self::Output> {
        let first = lines.iter().find_map(|line| {
            DATE_DAY_MONTH_YEAR
                .captures(&line.text)
                .map(|caps| (line.index, caps))
        });

        let Some((index, caps)) = first else {
            return Vec::new();
        };

        let day: u32 = caps[1].parse().unwrap_or(0);
        let month = repair_month(&caps[2]).and_then(month_number);
        let year = repair_year(&caps[3]);

        match (month, year) {
            (Some(month), Some(year)) => NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| ExtractionMatch::new(date, index, &caps[0]))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Map a month token, including common OCR misreads, to its canonical abbreviation.
pub fn repair_month(token: &str) -> Option<&'static str> {
    let canonical = match token.to_lowercase().as_str() {
        "jan" => "Jan",
        "feb" => "Feb",
        "mar" => "Mar",
        "apr" => "Apr",
        "may" => "May",
        "jun" => "Jun",
        "jul" | "ju1" => "Jul",
        "aug" => "Aug",
        "sep" | "5ep" => "Sep",
        "oct" | "0ct" => "Oct",
        "nov" | "n0v" => "Nov",
        "dec" | "0ec" => "Dec",
        _ => return None,
    };
    Some(canonical)
}

/// Expand a year token to four digits.
///
/// Two digits map to 20xx. A three-digit year starting with `2` lost its
/// zero to the OCR engine, so `224` becomes `2024`.
pub fn repair_year(token: &str) -> Option<i32> {
    let digits = match token.len() {
        2 => format!("20{}", token),
        3 if token.starts_with('2') => format!("20{}", &token[1..]),
        4 => token.to_string(),
        _ => return None,
    };
    digits.parse().ok()
}

fn month_number(abbr: &str) -> Option<u32> {
    let number = match abbr {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    Some(number)
}
