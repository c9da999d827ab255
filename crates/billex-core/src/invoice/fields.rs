//! Running the independent field extractors over one document.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::config::BillexConfig;
use crate::models::line::TextLine;
use crate::models::record::BillItem;

use super::reconciler::{AmountReconciler, AmountSummary};
use super::rules::*;

/// One extractor's slot in [`ExtractorOutputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    ShopName,
    BillNumber,
    Date,
    Buyer,
    LineItems,
    Total,
    InvoiceType,
    Gstin,
    State,
    Currency,
    Quantity,
    Amounts,
}

impl FieldKind {
    /// Every field, in the order the parser runs them.
    pub const ALL: [FieldKind; 12] = [
        FieldKind::ShopName,
        FieldKind::BillNumber,
        FieldKind::Date,
        FieldKind::Buyer,
        FieldKind::LineItems,
        FieldKind::Total,
        FieldKind::InvoiceType,
        FieldKind::Gstin,
        FieldKind::State,
        FieldKind::Currency,
        FieldKind::Quantity,
        FieldKind::Amounts,
    ];
}

/// Raw results of all extractors, before assembly into a record.
///
/// Each [`FieldKind`] writes its own fields and reads nothing but the
/// cleaned lines, so the order they run in does not matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractorOutputs {
    pub shop_name: Option<String>,
    pub bill_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub buyer_name: Option<String>,
    pub items: Vec<BillItem>,
    pub total: Option<u64>,
    pub invoice_type: Option<String>,
    pub seller_gstin: Option<String>,
    pub buyer_gstin: Option<String>,
    pub seller_state: Option<String>,
    pub buyer_state: Option<String>,
    pub currency: Option<String>,
    pub total_quantity: Option<Decimal>,
    pub amounts: AmountSummary,
}

/// Extractors configured for one pipeline.
pub struct FieldExtractors {
    shop: ShopNameExtractor,
    bill_number: BillNumberExtractor,
    date: DateExtractor,
    party: PartyExtractor,
    items: LineItemExtractor,
    total: TotalExtractor,
    invoice_type: InvoiceTypeExtractor,
    gstin: GstinExtractor,
    state: StateExtractor,
    currency: CurrencyExtractor,
    quantity: QuantityExtractor,
    reconciler: AmountReconciler,
}

impl FieldExtractors {
    pub fn new(config: &BillexConfig) -> Self {
        let extraction = &config.extraction;
        let reference = &config.reference;

        Self {
            shop: ShopNameExtractor::new()
                .with_scan_limit(extraction.shop_scan_limit)
                .with_min_length(extraction.shop_name_min_length)
                .with_org_suffixes(&reference.org_suffixes),
            bill_number: BillNumberExtractor::new()
                .with_window(extraction.bill_number_window)
                .with_min_length(extraction.bill_number_min_length),
            date: DateExtractor::new(),
            party: PartyExtractor::new(&reference.buyer_labels),
            items: LineItemExtractor::new().with_min_price(extraction.min_item_price),
            total: TotalExtractor::new()
                .with_fallback(extraction.total_fallback_to_largest)
                .with_fallback_min(extraction.total_fallback_min),
            invoice_type: InvoiceTypeExtractor::new(),
            gstin: GstinExtractor::new(),
            state: StateExtractor::new(),
            currency: CurrencyExtractor::new(),
            quantity: QuantityExtractor::new(),
            reconciler: AmountReconciler::from_config(extraction)
                .with_known_tax_amounts(reference.known_tax_amounts.clone()),
        }
    }

    /// Run every extractor.
    pub fn extract(&self, lines: &[TextLine]) -> ExtractorOutputs {
        self.extract_in_order(lines, &FieldKind::ALL)
    }

    /// Run the given extractors in the given order.
    pub fn extract_in_order(&self, lines: &[TextLine], kinds: &[FieldKind]) -> ExtractorOutputs {
        let mut outputs = ExtractorOutputs::default();
        for kind in kinds {
            self.run(*kind, lines, &mut outputs);
        }
        outputs
    }

    fn run(&self, kind: FieldKind, lines: &[TextLine], out: &mut ExtractorOutputs) {
        match kind {
            FieldKind::ShopName => out.shop_name = first_value(&self.shop, lines),
            FieldKind::BillNumber => out.bill_number = first_value(&self.bill_number, lines),
            FieldKind::Date => out.date = first_value(&self.date, lines),
            FieldKind::Buyer => out.buyer_name = first_value(&self.party, lines),
            FieldKind::LineItems => {
                out.items = self
                    .items
                    .extract_all(lines)
                    .into_iter()
                    .map(ExtractionMatch::into_value)
                    .collect();
            }
            FieldKind::Total => out.total = first_value(&self.total, lines),
            FieldKind::InvoiceType => out.invoice_type = first_value(&self.invoice_type, lines),
            FieldKind::Gstin => {
                let (seller, buyer) = self.split_by_buyer(&self.gstin, lines);
                out.seller_gstin = seller;
                out.buyer_gstin = buyer;
            }
            FieldKind::State => {
                let (seller, buyer) = self.split_by_buyer(&self.state, lines);
                out.seller_state = seller;
                out.buyer_state = buyer;
            }
            FieldKind::Currency => out.currency = first_value(&self.currency, lines),
            FieldKind::Quantity => out.total_quantity = first_value(&self.quantity, lines),
            FieldKind::Amounts => out.amounts = self.reconciler.reconcile(lines),
        }
    }

    /// Assign matches to the seller (above the buyer label) and the buyer (below it).
    ///
    /// Without a buyer label the first match goes to the seller and the
    /// second to the buyer.
    fn split_by_buyer<E>(&self, extractor: &E, lines: &[TextLine]) -> (Option<String>, Option<String>)
    where
        E: FieldExtractor<Output = ExtractionMatch<String>>,
    {
        let matches = extractor.extract_all(lines);

        match self.party.find_label(lines) {
            Some(pos) => {
                let label_line = lines[pos].index;
                let seller = matches.iter().find(|m| m.line < label_line);
                let buyer = matches.iter().find(|m| m.line > label_line);
                (seller.map(|m| m.value.clone()), buyer.map(|m| m.value.clone()))
            }
            None => {
                let mut values = matches.into_iter().map(ExtractionMatch::into_value);
                (values.next(), values.next())
            }
        }
    }
}

impl Default for FieldExtractors {
    fn default() -> Self {
        Self::new(&BillexConfig::default())
    }
}

fn first_value<E, T>(extractor: &E, lines: &[TextLine]) -> Option<T>
where
    E: FieldExtractor<Output = ExtractionMatch<T>>,
{
    extractor.extract(lines).map(ExtractionMatch::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn invoice_lines() -> Vec<TextLine> {
        TextLine::from_strs(&[
            "TAX INVOICE",
            "NOVA DISTRIBUTORS PVT LTD",
            "GSTIN/UIN: 29AABCN1234K1Z5",
            "State Name : Kamataka Code : 29",
            "Invoice No. INV/2024/0071 Dated 12-May-2024",
            "Buyer",
            "Sri Ganesh Stores",
            "GSTIN/UIN: 33AAACS5678L1Z2",
            "State Name : Tamil Nadu Code : 33",
            "Widget 1,000.00",
            "CGST 90.00",
            "SGST 90.00",
            "Total 5 Nos Rs. 1,180.00",
        ])
    }

    #[test]
    fn test_extract_tax_invoice_fields() {
        let outputs = FieldExtractors::default().extract(&invoice_lines());

        assert_eq!(outputs.invoice_type.as_deref(), Some("Tax Invoice"));
        assert_eq!(outputs.shop_name.as_deref(), Some("NOVA DISTRIBUTORS PVT LTD"));
        assert_eq!(outputs.bill_number.as_deref(), Some("INV/2024/0071"));
        assert_eq!(outputs.date, NaiveDate::from_ymd_opt(2024, 5, 12));
        assert_eq!(outputs.buyer_name.as_deref(), Some("Sri Ganesh Stores"));
        assert_eq!(outputs.seller_gstin.as_deref(), Some("29AABCN1234K1Z5"));
        assert_eq!(outputs.buyer_gstin.as_deref(), Some("33AAACS5678L1Z2"));
        assert_eq!(outputs.seller_state.as_deref(), Some("Kamataka"));
        assert_eq!(outputs.buyer_state.as_deref(), Some("Tamil Nadu"));
        assert_eq!(outputs.currency.as_deref(), Some("INR"));
        assert_eq!(outputs.total_quantity, Some(Decimal::from(5)));
        assert_eq!(outputs.amounts.final_amount, Some(Decimal::new(118000, 2)));
    }

    #[test]
    fn test_gstins_without_buyer_label() {
        let lines = TextLine::from_strs(&["GSTIN 29AABCN1234K1Z5", "GSTIN 33AAACS5678L1Z2"]);
        let outputs = FieldExtractors::default().extract(&lines);

        assert_eq!(outputs.seller_gstin.as_deref(), Some("29AABCN1234K1Z5"));
        assert_eq!(outputs.buyer_gstin.as_deref(), Some("33AAACS5678L1Z2"));
    }

    #[test]
    fn test_only_buyer_gstin_below_label() {
        let lines = TextLine::from_strs(&["Buyer", "Someone", "GSTIN 33AAACS5678L1Z2"]);
        let outputs = FieldExtractors::default().extract(&lines);

        assert_eq!(outputs.seller_gstin, None);
        assert_eq!(outputs.buyer_gstin.as_deref(), Some("33AAACS5678L1Z2"));
    }

    #[test]
    fn test_evaluation_order_does_not_matter() {
        let extractors = FieldExtractors::default();
        let lines = invoice_lines();

        let mut reversed = FieldKind::ALL;
        reversed.reverse();
        let mut rotated = FieldKind::ALL;
        rotated.rotate_left(5);

        let forward = extractors.extract_in_order(&lines, &FieldKind::ALL);
        assert_eq!(forward, extractors.extract_in_order(&lines, &reversed));
        assert_eq!(forward, extractors.extract_in_order(&lines, &rotated));
    }

    #[test]
    fn test_empty_document() {
        let outputs = FieldExtractors::default().extract(&[]);
        assert_eq!(outputs, ExtractorOutputs::default());
    }
}
