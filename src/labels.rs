// src/labels.rs

use crate::invoice::{Directionality, HeaderField};
use std::str::FromStr;

/// Display language of the form. Hebrew is right-to-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    pub fn directionality(self) -> Directionality {
        match self {
            Language::En => Directionality::Ltr,
            Language::He => Directionality::Rtl,
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &EN,
            Language::He => &HE,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "he" | "hebrew" => Ok(Language::He),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

pub struct Labels {
    pub title: &'static str,
    pub business_name: &'static str,
    pub business_number: &'static str,
    pub issue_date: &'static str,
    pub delivery_note_number: &'static str,
    pub customer_name: &'static str,
    pub customer_email: &'static str,
    pub customer_address: &'static str,
    pub logo: &'static str,
    pub items: &'static str,
    pub item_name: &'static str,
    pub amount: &'static str,
    pub price: &'static str,
    pub add_item: &'static str,
    pub total_amount: &'static str,
    pub generate_pdf: &'static str,
}

impl Labels {
    pub fn field(&self, field: HeaderField) -> &'static str {
        match field {
            HeaderField::BusinessName => self.business_name,
            HeaderField::BusinessNumber => self.business_number,
            HeaderField::IssueDate => self.issue_date,
            HeaderField::DeliveryNoteNumber => self.delivery_note_number,
            HeaderField::CustomerName => self.customer_name,
            HeaderField::CustomerAddress => self.customer_address,
            HeaderField::CustomerEmail => self.customer_email,
            HeaderField::Logo => self.logo,
        }
    }
}

static EN: Labels = Labels {
    title: "Generate Invoice",
    business_name: "Business Name:",
    business_number: "Business Number:",
    issue_date: "Issue Date:",
    delivery_note_number: "Delivery Note Number:",
    customer_name: "Customer Name:",
    customer_email: "Customer Email:",
    customer_address: "Customer Address:",
    logo: "Logo:",
    items: "Items:",
    item_name: "Item Name",
    amount: "Amount",
    price: "Price",
    add_item: "Add Item",
    total_amount: "Total Amount:",
    generate_pdf: "Generate PDF",
};

static HE: Labels = Labels {
    title: "צור חשבונית",
    business_name: "שם העסק:",
    business_number: "מספר עסק:",
    issue_date: "תאריך הוצאה:",
    delivery_note_number: "מספר תעודת משלוח:",
    customer_name: "שם הלקוח:",
    customer_email: "מייל הלקוח:",
    customer_address: "כתובת הלקוח:",
    logo: "לוגו:",
    items: "פריטים:",
    item_name: "שם הפריט",
    amount: "כמות",
    price: "מחיר",
    add_item: "הוסף פריט",
    total_amount: "סכום כולל:",
    generate_pdf: "צור PDF",
};
