//! Output records.
//!
//! Every leaf is an `Option` serialized as `null` when unknown; no field is
//! ever skipped, so the key set of a serialized record never changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tax invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Document identity.
    pub invoice_information: InvoiceInformation,

    /// Issuer of the invoice.
    pub seller_details: SellerDetails,

    /// Recipient of the invoice.
    pub buyer_details: BuyerDetails,

    /// Totals and tax breakdown.
    pub financial_summary: FinancialSummary,
}

/// Invoice type, number and date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceInformation {
    /// Document title, e.g. "Tax Invoice".
    pub invoice_type: Option<String>,

    /// Invoice reference number.
    pub invoice_number: Option<String>,

    /// Issue date.
    pub invoice_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerDetails {
    pub seller_name: Option<String>,
    pub seller_state: Option<String>,
    /// GST registration id.
    pub seller_gstin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerDetails {
    pub buyer_name: Option<String>,
    pub buyer_state: Option<String>,
    /// GST registration id.
    pub buyer_gstin: Option<String>,
}

/// Invoice totals. Amounts are written as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Final amount minus total tax.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub taxable_amount: Option<Decimal>,

    /// Central share of the tax.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cgst_amount: Option<Decimal>,

    /// State share of the tax.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub sgst_amount: Option<Decimal>,

    /// Sum of both tax shares.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_tax: Option<Decimal>,

    /// Amount payable.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub final_payable_amount: Option<Decimal>,

    /// ISO currency code.
    pub currency: Option<String>,

    /// Quantity printed on the total line.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_quantity: Option<Decimal>,
}

/// A simple retail bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    pub shop_name: Option<String>,
    pub bill_number: Option<String>,
    pub items: Vec<BillItem>,
    pub total_amount: Option<u64>,
    pub currency: Option<String>,
}

/// One priced line of a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillItem {
    /// Item description.
    pub item: String,
    /// Price in whole currency units.
    pub price: u32,
}

impl BillItem {
    pub fn new(item: impl Into<String>, price: u32) -> Self {
        Self {
            item: item.into(),
            price,
        }
    }
}
