//! Merges extractor outputs into the fixed record schemas.

use std::collections::BTreeMap;

use crate::models::config::ReferenceData;
use crate::models::record::{
    BillRecord, BuyerDetails, FinancialSummary, InvoiceInformation, InvoiceRecord, SellerDetails,
};

use super::fields::ExtractorOutputs;
use super::rules::{state_from_gstin, trim_reference};

/// Builds records from [`ExtractorOutputs`], applying reference-data corrections.
pub struct RecordAssembler {
    state_codes: BTreeMap<String, String>,
    corrections: BTreeMap<String, String>,
    default_currency: String,
}

impl RecordAssembler {
    pub fn new(reference: &ReferenceData, default_currency: impl Into<String>) -> Self {
        Self {
            state_codes: reference.state_codes.clone(),
            corrections: reference.corrections.clone(),
            default_currency: default_currency.into(),
        }
    }

    /// Build the tax-invoice record. Tax is split evenly into CGST and SGST.
    pub fn assemble(&self, outputs: &ExtractorOutputs) -> InvoiceRecord {
        let amounts = &outputs.amounts;

        let seller_state = self
            .correct_opt(outputs.seller_state.as_deref())
            .or_else(|| self.state_for(outputs.seller_gstin.as_deref()));
        let buyer_state = self
            .correct_opt(outputs.buyer_state.as_deref())
            .or_else(|| self.state_for(outputs.buyer_gstin.as_deref()));

        InvoiceRecord {
            invoice_information: InvoiceInformation {
                invoice_type: outputs.invoice_type.clone(),
                invoice_number: reference_number(outputs.bill_number.as_deref()),
                invoice_date: outputs.date,
            },
            seller_details: SellerDetails {
                seller_name: self.correct_opt(outputs.shop_name.as_deref()),
                seller_state,
                seller_gstin: outputs.seller_gstin.clone(),
            },
            buyer_details: BuyerDetails {
                buyer_name: self.correct_opt(outputs.buyer_name.as_deref()),
                buyer_state,
                buyer_gstin: outputs.buyer_gstin.clone(),
            },
            financial_summary: FinancialSummary {
                taxable_amount: amounts.taxable_amount,
                cgst_amount: amounts.tax_amount,
                sgst_amount: amounts.tax_amount,
                total_tax: amounts.total_tax,
                final_payable_amount: amounts.final_amount,
                currency: self.currency(outputs),
                total_quantity: outputs.total_quantity,
            },
        }
    }

    /// Build the simple bill record.
    pub fn assemble_bill(&self, outputs: &ExtractorOutputs) -> BillRecord {
        BillRecord {
            shop_name: self.correct_opt(outputs.shop_name.as_deref()),
            bill_number: reference_number(outputs.bill_number.as_deref()),
            items: outputs.items.clone(),
            total_amount: outputs.total,
            currency: self.currency(outputs),
        }
    }

    /// Apply every configured misspelling correction by plain substitution.
    pub fn correct(&self, text: &str) -> String {
        self.corrections
            .iter()
            .fold(text.to_string(), |acc, (wrong, right)| acc.replace(wrong.as_str(), right))
    }

    fn correct_opt(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.correct(t))
    }

    fn state_for(&self, gstin: Option<&str>) -> Option<String> {
        gstin.and_then(|g| state_from_gstin(g, &self.state_codes))
    }

    // A detected marker wins; the default is only claimed when there is money to label.
    fn currency(&self, outputs: &ExtractorOutputs) -> Option<String> {
        outputs.currency.clone().or_else(|| {
            has_monetary_value(outputs).then(|| self.default_currency.clone())
        })
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new(&ReferenceData::default(), "INR")
    }
}

fn has_monetary_value(outputs: &ExtractorOutputs) -> bool {
    outputs.amounts.final_amount.is_some() || outputs.total.is_some() || !outputs.items.is_empty()
}

fn reference_number(raw: Option<&str>) -> Option<String> {
    raw.map(trim_reference).filter(|r| !r.is_empty())
}

/// Assemble an invoice with default reference data.
pub fn assemble(outputs: &ExtractorOutputs) -> InvoiceRecord {
    RecordAssembler::default().assemble(outputs)
}

/// Assemble a bill with default reference data.
pub fn assemble_bill(outputs: &ExtractorOutputs) -> BillRecord {
    RecordAssembler::default().assemble_bill(outputs)
}
