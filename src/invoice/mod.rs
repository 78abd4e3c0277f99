// src/invoice/mod.rs

mod draft;

pub use draft::{DraftField, DraftItem, LineItem, parse_amount};

use crate::error::{AmountField, InvoiceError};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info};

/// Text flow of the form. Picks the rendering endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Directionality {
    #[default]
    Ltr,
    Rtl,
}

/// Header attributes of an invoice, settable one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    BusinessName,
    BusinessNumber,
    IssueDate,
    DeliveryNoteNumber,
    CustomerName,
    CustomerAddress,
    CustomerEmail,
    Logo,
}

impl HeaderField {
    pub const ALL: [HeaderField; 8] = [
        HeaderField::BusinessName,
        HeaderField::BusinessNumber,
        HeaderField::IssueDate,
        HeaderField::DeliveryNoteNumber,
        HeaderField::CustomerName,
        HeaderField::CustomerEmail,
        HeaderField::CustomerAddress,
        HeaderField::Logo,
    ];

    /// Name used in the request body.
    pub fn wire_name(self) -> &'static str {
        match self {
            HeaderField::BusinessName => "businessName",
            HeaderField::BusinessNumber => "businessNumber",
            HeaderField::IssueDate => "issueDate",
            HeaderField::DeliveryNoteNumber => "deliveryNoteNumber",
            HeaderField::CustomerName => "customerName",
            HeaderField::CustomerAddress => "customerAddress",
            HeaderField::CustomerEmail => "customerEmail",
            HeaderField::Logo => "logo",
        }
    }
}

impl FromStr for HeaderField {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "businessName" | "business_name" => HeaderField::BusinessName,
            "businessNumber" | "business_number" => HeaderField::BusinessNumber,
            "issueDate" | "issue_date" => HeaderField::IssueDate,
            "deliveryNoteNumber" | "delivery_note_number" => HeaderField::DeliveryNoteNumber,
            "customerName" | "customer_name" => HeaderField::CustomerName,
            "customerAddress" | "customer_address" => HeaderField::CustomerAddress,
            "customerEmail" | "customer_email" => HeaderField::CustomerEmail,
            "logo" => HeaderField::Logo,
            other => return Err(InvoiceError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

/// The invoice as sent to the renderer. Field order is the wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    business_name: String,
    business_number: String,
    issue_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivery_note_number: Option<String>,
    customer_name: String,
    customer_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<String>,
    #[serde(rename = "goodsDescription")]
    items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<String>,
    #[serde(skip)]
    directionality: Directionality,
}

impl Invoice {
    pub fn set_field(&mut self, field: HeaderField, value: &str) {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match field {
            HeaderField::BusinessName => self.business_name = value.to_string(),
            HeaderField::BusinessNumber => self.business_number = value.to_string(),
            HeaderField::IssueDate => self.issue_date = value.to_string(),
            HeaderField::DeliveryNoteNumber => self.delivery_note_number = optional(value),
            HeaderField::CustomerName => self.customer_name = value.to_string(),
            HeaderField::CustomerAddress => self.customer_address = value.to_string(),
            HeaderField::CustomerEmail => self.customer_email = optional(value),
            HeaderField::Logo => self.logo = optional(value),
        }
    }

    pub fn field(&self, field: HeaderField) -> Option<&str> {
        match field {
            HeaderField::BusinessName => Some(&self.business_name),
            HeaderField::BusinessNumber => Some(&self.business_number),
            HeaderField::IssueDate => Some(&self.issue_date),
            HeaderField::DeliveryNoteNumber => self.delivery_note_number.as_deref(),
            HeaderField::CustomerName => Some(&self.customer_name),
            HeaderField::CustomerAddress => Some(&self.customer_address),
            HeaderField::CustomerEmail => self.customer_email.as_deref(),
            HeaderField::Logo => self.logo.as_deref(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn directionality(&self) -> Directionality {
        self.directionality
    }

    pub fn set_directionality(&mut self, directionality: Directionality) {
        self.directionality = directionality;
    }

    /// JSON request body. Same invoice, same bytes.
    pub fn request_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Σ quantity × unit price, `None` on overflow.
pub fn sum_line_totals(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// An invoice plus the line being composed for it. One per form session.
#[derive(Debug, Clone, Default)]
pub struct InvoiceModel {
    invoice: Invoice,
    draft: DraftItem,
}

impl InvoiceModel {
    pub fn new(invoice: Invoice) -> Self {
        Self {
            invoice,
            draft: DraftItem::default(),
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn draft(&self) -> &DraftItem {
        &self.draft
    }

    pub fn set_directionality(&mut self, directionality: Directionality) {
        self.invoice.set_directionality(directionality);
    }

    /// Set one header attribute. No cross-field checks.
    pub fn update_field(&mut self, field: HeaderField, value: &str) {
        debug!(field = field.wire_name(), "Header field updated");
        self.invoice.set_field(field, value);
    }

    /// Feed raw input into the draft line. Rejected amounts leave the draft as it was.
    pub fn update_draft_item(&mut self, field: DraftField, raw: &str) -> Result<(), InvoiceError> {
        self.draft.set(field, raw)?;
        Ok(())
    }

    /// Append the draft, resum the total over every item and clear the draft.
    pub fn commit_draft_item(&mut self) -> Result<&LineItem, InvoiceError> {
        let item = self.draft.to_line_item();

        let mut items = self.invoice.items.clone();
        items.push(item);
        let total = sum_line_totals(&items).ok_or(InvoiceError::TotalOverflow)?;

        self.invoice.items = items;
        self.invoice.total_amount = total;
        self.draft.reset();

        info!(
            items = self.invoice.items.len(),
            total = %self.invoice.total_amount,
            "Line item added"
        );

        let committed = self.invoice.items.len() - 1;
        Ok(&self.invoice.items[committed])
    }

    /// Manual total. Only accepted while there are no items to sum.
    pub fn override_total(&mut self, raw: &str) -> Result<(), InvoiceError> {
        if !self.invoice.items.is_empty() {
            return Err(InvoiceError::TotalLocked {
                items: self.invoice.items.len(),
            });
        }
        self.invoice.total_amount = parse_amount(AmountField::Total, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::dec;

    fn add_item(model: &mut InvoiceModel, name: &str, qty: &str, price: &str) {
        model.update_draft_item(DraftField::Name, name).unwrap();
        model.update_draft_item(DraftField::Quantity, qty).unwrap();
        model.update_draft_item(DraftField::UnitPrice, price).unwrap();
        model.commit_draft_item().unwrap();
    }

    #[test]
    fn test_widget_and_gadget_total() {
        let mut model = InvoiceModel::default();
        add_item(&mut model, "Widget", "3", "10.00");
        add_item(&mut model, "Gadget", "2", "5.50");

        assert_eq!(model.invoice().total_amount(), dec!(41.00));
        assert_eq!(format!("{:.2}", model.invoice().total_amount()), "41.00");
    }

    #[test]
    fn test_commit_appends_one_and_resets_draft() {
        let mut model = InvoiceModel::default();
        add_item(&mut model, "Widget", "3", "10.00");

        model.update_draft_item(DraftField::Name, "Gadget").unwrap();
        model.update_draft_item(DraftField::Quantity, "2").unwrap();
        let committed = model.commit_draft_item().unwrap().clone();

        assert_eq!(committed.name, "Gadget");
        assert_eq!(model.invoice().items().len(), 2);
        assert_eq!(model.invoice().items()[1], committed);
        assert_eq!(model.draft(), &DraftItem::default());
    }

    #[test]
    fn test_rejected_input_does_not_touch_draft() {
        let mut model = InvoiceModel::default();
        model.update_draft_item(DraftField::UnitPrice, "8.25").unwrap();

        let err = model.update_draft_item(DraftField::UnitPrice, "12.999").unwrap_err();
        assert!(matches!(err, InvoiceError::Rejected(_)));
        assert_eq!(model.draft().unit_price, dec!(8.25));
    }

    #[test]
    fn test_empty_draft_commits_zero_line() {
        let mut model = InvoiceModel::default();
        model.commit_draft_item().unwrap();
        assert_eq!(model.invoice().items().len(), 1);
        assert_eq!(model.invoice().total_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_commit_is_refused() {
        let mut model = InvoiceModel::default();
        let huge = "9".repeat(20);
        model.update_draft_item(DraftField::Quantity, &huge).unwrap();
        model.update_draft_item(DraftField::UnitPrice, &huge).unwrap();

        assert_eq!(model.commit_draft_item().unwrap_err(), InvoiceError::TotalOverflow);
        assert!(model.invoice().items().is_empty());
        assert_eq!(model.draft().quantity.to_string(), huge);
    }

    #[test]
    fn test_total_override_only_without_items() {
        let mut model = InvoiceModel::default();
        model.override_total("99.90").unwrap();
        assert_eq!(model.invoice().total_amount(), dec!(99.90));

        add_item(&mut model, "Widget", "1", "5");
        assert_eq!(model.invoice().total_amount(), dec!(5));
        assert_eq!(
            model.override_total("1.00"),
            Err(InvoiceError::TotalLocked { items: 1 })
        );
        assert_eq!(model.invoice().total_amount(), dec!(5));
    }

    #[test]
    fn test_optional_fields_clear_on_empty() {
        let mut model = InvoiceModel::default();
        model.update_field(HeaderField::DeliveryNoteNumber, "DN-7");
        assert_eq!(model.invoice().field(HeaderField::DeliveryNoteNumber), Some("DN-7"));

        model.update_field(HeaderField::DeliveryNoteNumber, "");
        assert_eq!(model.invoice().field(HeaderField::DeliveryNoteNumber), None);

        model.update_field(HeaderField::BusinessName, "");
        assert_eq!(model.invoice().field(HeaderField::BusinessName), Some(""));
    }

    #[test]
    fn test_header_field_names() {
        for field in HeaderField::ALL {
            assert_eq!(field.wire_name().parse::<HeaderField>(), Ok(field));
        }
        assert_eq!("issue_date".parse::<HeaderField>(), Ok(HeaderField::IssueDate));
        assert!(matches!(
            "vatNumber".parse::<HeaderField>(),
            Err(InvoiceError::UnknownField(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let mut model = InvoiceModel::default();
        model.update_field(HeaderField::BusinessName, "Acme");
        model.update_field(HeaderField::IssueDate, "2024-05-01");
        model.update_field(HeaderField::CustomerEmail, "john@example.com");
        model.set_directionality(Directionality::Rtl);
        add_item(&mut model, "Widget", "3", "10.00");

        let body = String::from_utf8(model.invoice().request_body().unwrap()).unwrap();

        assert_eq!(
            body,
            concat!(
                r#"{"businessName":"Acme","businessNumber":"","issueDate":"2024-05-01","#,
                r#""customerName":"","customerAddress":"","customerEmail":"john@example.com","#,
                r#""goodsDescription":[{"itemName":"Widget","itemAmount":3,"itemPrice":10.00}],"#,
                r#""totalAmount":30.00}"#
            )
        );
    }

    #[test]
    fn test_large_amounts_keep_every_cent_on_the_wire() {
        let mut model = InvoiceModel::default();
        add_item(&mut model, "Yacht", "1", "123456789012345678901234567.89");

        let body = String::from_utf8(model.invoice().request_body().unwrap()).unwrap();
        assert!(body.contains(r#""itemPrice":123456789012345678901234567.89"#), "{body}");
        assert!(body.contains(r#""totalAmount":123456789012345678901234567.89"#), "{body}");

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            parsed["totalAmount"].to_string(),
            "123456789012345678901234567.89"
        );
    }

    #[test]
    fn test_request_body_is_stable() {
        let mut model = InvoiceModel::default();
        model.update_field(HeaderField::CustomerName, "Dana");
        add_item(&mut model, "Gadget", "2", "5.50");

        let first = model.invoice().request_body().unwrap();
        let second = model.invoice().request_body().unwrap();
        assert_eq!(first, second);
    }

    fn arb_amount() -> impl Strategy<Value = (i64, String)> {
        // value in cents and the raw text a user would type for it
        (0i64..10_000_000).prop_map(|cents| (cents, format!("{}.{:02}", cents / 100, cents % 100)))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// The total is the exact sum of quantity × price, whatever the order.
        #[test]
        fn total_matches_exact_sum_in_any_order(
            lines in prop::collection::vec((arb_amount(), arb_amount()), 0..40)
        ) {
            let mut forward = InvoiceModel::default();
            let mut backward = InvoiceModel::default();
            let mut expected: i128 = 0;

            for ((qty_cents, qty), (price_cents, price)) in &lines {
                expected += *qty_cents as i128 * *price_cents as i128;
                forward.update_draft_item(DraftField::Quantity, qty).unwrap();
                forward.update_draft_item(DraftField::UnitPrice, price).unwrap();
                forward.commit_draft_item().unwrap();
            }
            for ((_, qty), (_, price)) in lines.iter().rev() {
                backward.update_draft_item(DraftField::Quantity, qty).unwrap();
                backward.update_draft_item(DraftField::UnitPrice, price).unwrap();
                backward.commit_draft_item().unwrap();
            }

            let expected = Decimal::from_i128_with_scale(expected, 4);
            prop_assert_eq!(forward.invoice().total_amount(), expected);
            prop_assert_eq!(backward.invoice().total_amount(), expected);
            prop_assert_eq!(forward.invoice().items().len(), lines.len());
        }
    }
}
