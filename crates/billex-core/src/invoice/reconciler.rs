//! Amount reconciliation: final amount, tax and taxable base.
//!
//! All money-looking tokens are collected, collapsed by value and ranked.
//! The largest is the final amount. The tax candidate is the next one down
//! (lenient mode) or the best footer-band value inside the plausibility range
//! (strict mode). Tax is assumed to be split evenly into two parts, so the
//! total tax is twice the candidate and the taxable base is what remains.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::{ExtractionConfig, ReconcileMode};
use crate::models::line::TextLine;

use super::rules::{extract_candidates, CandidateAmount};

/// Reconciled amounts. Tax, total tax and taxable base are known together or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountSummary {
    /// Largest amount in the document.
    pub final_amount: Option<Decimal>,
    /// One half of the tax (each of the two symmetric parts).
    pub tax_amount: Option<Decimal>,
    /// Both tax parts together.
    pub total_tax: Option<Decimal>,
    /// Final amount minus total tax.
    pub taxable_amount: Option<Decimal>,
    /// Every candidate found, before deduplication, in document order.
    pub candidates: Vec<CandidateAmount>,
}

/// Ranks amount candidates into final amount, tax and taxable base.
#[derive(Debug, Clone)]
pub struct AmountReconciler {
    mode: ReconcileMode,
    footer_start_fraction: f64,
    tax_min: Decimal,
    tax_max: Decimal,
    known_tax_amounts: Vec<Decimal>,
}

impl AmountReconciler {
    /// Lenient reconciler with default bands.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            mode: config.reconcile_mode,
            footer_start_fraction: config.footer_start_fraction,
            tax_min: config.tax_min,
            tax_max: config.tax_max,
            known_tax_amounts: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: ReconcileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Tax values known in advance; a footer candidate equal to one wins in strict mode.
    pub fn with_known_tax_amounts(mut self, amounts: Vec<Decimal>) -> Self {
        self.known_tax_amounts = amounts;
        self
    }

    pub fn reconcile(&self, lines: &[TextLine]) -> AmountSummary {
        let candidates = extract_candidates(lines);
        let distinct = distinct_values(&candidates);

        let final_amount = distinct.last().copied();
        let tax_amount = match self.mode {
            ReconcileMode::Lenient => distinct.iter().rev().nth(1).copied(),
            ReconcileMode::Strict => final_amount.and_then(|f| self.strict_tax(lines, &candidates, f)),
        };

        let split = match (final_amount, tax_amount) {
            (Some(f), Some(t)) => split_tax(f, t),
            _ => None,
        };
        if tax_amount.is_some() && split.is_none() {
            debug!("Tax split overflowed for {:?}, leaving tax fields unknown", tax_amount);
        }
        let (tax_amount, total_tax, taxable_amount) = match split {
            Some((tax, total, taxable)) => (Some(tax), Some(total), Some(taxable)),
            None => (None, None, None),
        };

        debug!(
            "Reconciled {} candidates ({} distinct): final={:?} tax={:?}",
            candidates.len(),
            distinct.len(),
            final_amount,
            tax_amount
        );

        AmountSummary {
            final_amount,
            tax_amount,
            total_tax,
            taxable_amount,
            candidates,
        }
    }

    fn strict_tax(
        &self,
        lines: &[TextLine],
        candidates: &[CandidateAmount],
        final_amount: Decimal,
    ) -> Option<Decimal> {
        let footer: BTreeSet<usize> = footer_band(lines, self.footer_start_fraction)
            .iter()
            .map(|l| l.index)
            .collect();

        let eligible: BTreeSet<Decimal> = candidates
            .iter()
            .filter(|c| footer.contains(&c.line))
            .map(|c| c.value)
            .filter(|v| *v != final_amount)
            .filter(|v| *v >= self.tax_min && *v <= self.tax_max)
            .collect();

        eligible
            .iter()
            .find(|v| self.known_tax_amounts.contains(v))
            .or_else(|| eligible.last())
            .copied()
    }
}

impl Default for AmountReconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Lenient reconciliation with default settings.
pub fn reconcile(lines: &[TextLine]) -> AmountSummary {
    AmountReconciler::new().reconcile(lines)
}

/// Trailing part of the document where totals and tax lines usually sit.
///
/// This is a positional heuristic, not footer detection: the band starts at
/// `ceil(len * fraction)` of the cleaned line sequence.
pub fn footer_band(lines: &[TextLine], fraction: f64) -> &[TextLine] {
    let fraction = fraction.clamp(0.0, 1.0);
    let start = (lines.len() as f64 * fraction).ceil() as usize;
    &lines[start.min(lines.len())..]
}

// Tax, total tax and taxable base, or nothing when the arithmetic overflows.
fn split_tax(final_amount: Decimal, tax: Decimal) -> Option<(Decimal, Decimal, Decimal)> {
    let total = tax.checked_mul(Decimal::from(2))?;
    let taxable = final_amount.checked_sub(total)?;
    Some((tax, total, taxable))
}

fn distinct_values(candidates: &[CandidateAmount]) -> Vec<Decimal> {
    candidates
        .iter()
        .map(|c| c.value)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_two_amounts() {
        let lines = TextLine::from_strs(&["Taxable 1,000.00", "Total 1,200.00"]);
        let summary = reconcile(&lines);

        assert_eq!(summary.final_amount, Some(dec("1200.00")));
        assert_eq!(summary.tax_amount, Some(dec("1000.00")));
        assert_eq!(summary.total_tax, Some(dec("2000.00")));
        assert_eq!(summary.taxable_amount, Some(dec("-800.00")));
    }

    #[test]
    fn test_single_amount() {
        let summary = reconcile(&TextLine::from_strs(&["Total 1,200.00"]));

        assert_eq!(summary.final_amount, Some(dec("1200.00")));
        assert_eq!(summary.tax_amount, None);
        assert_eq!(summary.total_tax, None);
        assert_eq!(summary.taxable_amount, None);
    }

    #[test]
    fn test_no_amounts() {
        let summary = reconcile(&TextLine::from_strs(&["Milk 40"]));
        assert_eq!(summary, AmountSummary::default());
    }

    #[test]
    fn test_repeated_total_is_not_a_tax_line() {
        let lines = TextLine::from_strs(&["Total 1,180.00", "Amount 1,180.00", "Paid 1180.00"]);
        let summary = reconcile(&lines);

        assert_eq!(summary.final_amount, Some(dec("1180")));
        assert_eq!(summary.tax_amount, None);
        assert_eq!(summary.candidates.len(), 3);
    }

    #[test]
    fn test_tax_split() {
        let lines = TextLine::from_strs(&[
            "Widget 1,000.00",
            "CGST 90.00",
            "SGST 90.00",
            "Total 1,180.00",
        ]);
        let summary = reconcile(&lines);

        assert_eq!(summary.tax_amount, Some(dec("1000.00")));

        let strict = AmountReconciler::new().with_mode(ReconcileMode::Strict);
        let summary = strict.reconcile(&lines);
        assert_eq!(summary.final_amount, Some(dec("1180.00")));
        assert_eq!(summary.tax_amount, Some(dec("90.00")));
        assert_eq!(summary.total_tax, Some(dec("180.00")));
        assert_eq!(summary.taxable_amount, Some(dec("1000.00")));
    }

    #[test]
    fn test_strict_prefers_known_tax_amount() {
        let lines = TextLine::from_strs(&[
            "Header",
            "Item 500.00",
            "Round off 0.40",
            "CGST 45.00",
            "Freight 150.00",
            "Total 590.00",
        ]);
        let reconciler = AmountReconciler::new().with_mode(ReconcileMode::Strict);
        assert_eq!(reconciler.reconcile(&lines).tax_amount, Some(dec("150.00")));

        let reconciler = reconciler.with_known_tax_amounts(vec![dec("45")]);
        assert_eq!(reconciler.reconcile(&lines).tax_amount, Some(dec("45.00")));
    }

    #[test]
    fn test_strict_plausibility_band() {
        let lines = TextLine::from_strs(&["Item 500.00", "Header", "Round off 0.40", "Total 500.40"]);
        let reconciler = AmountReconciler::new().with_mode(ReconcileMode::Strict);

        assert_eq!(reconciler.reconcile(&lines).tax_amount, None);
    }

    #[test]
    fn test_huge_amounts_leave_tax_unknown() {
        let lines = TextLine::from_strs(&[
            "Barcode 50000000000000000000000000000.00",
            "Ref 60000000000000000000000000000.00",
        ]);
        let summary = reconcile(&lines);

        assert_eq!(summary.final_amount, Some(dec("60000000000000000000000000000")));
        assert_eq!(summary.tax_amount, None);
        assert_eq!(summary.total_tax, None);
        assert_eq!(summary.taxable_amount, None);
        assert_eq!(summary.candidates.len(), 2);
    }

    #[test]
    fn test_footer_band() {
        let lines = TextLine::from_strs(&["a", "b", "c", "d", "e"]);

        assert_eq!(footer_band(&lines, 0.5).len(), 2);
        assert_eq!(footer_band(&lines, 0.0).len(), 5);
        assert!(footer_band(&lines, 1.0).is_empty());
        assert!(footer_band(&[], 0.5).is_empty());
    }
}
