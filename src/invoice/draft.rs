// src/invoice/draft.rs

use crate::error::{AmountField, InvoiceError, ValidationRejection};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

/// ASCII digits, optionally a point and one or two more digits.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("amount pattern is valid"));

/// Parse a raw quantity / price input. Empty input means zero.
pub fn parse_amount(field: AmountField, raw: &str) -> Result<Decimal, ValidationRejection> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if !AMOUNT_RE.is_match(raw) {
        return Err(ValidationRejection::Format {
            field,
            raw: raw.to_string(),
        });
    }
    // exact: a value that would need rounding to fit is refused, not altered
    Decimal::from_str_exact(raw).map_err(|_| ValidationRejection::OutOfRange {
        field,
        raw: raw.to_string(),
    })
}

/// A committed invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    #[serde(rename = "itemName")]
    pub name: String,
    #[serde(rename = "itemAmount", with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
    #[serde(rename = "itemPrice", with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
}

impl LineItem {
    /// `quantity * unit_price`, or `None` if the product leaves the decimal range.
    pub fn line_total(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }
}

/// Inputs of the draft line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Quantity,
    UnitPrice,
}

impl FromStr for DraftField {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" | "itemName" => Ok(DraftField::Name),
            "qty" | "quantity" | "amount" | "itemAmount" => Ok(DraftField::Quantity),
            "price" | "unit_price" | "unitPrice" | "itemPrice" => Ok(DraftField::UnitPrice),
            other => Err(InvoiceError::UnknownItemField(other.to_string())),
        }
    }
}

/// The line currently being composed. Starts out empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl DraftItem {
    /// Apply one raw input. A rejected amount leaves the draft untouched.
    pub fn set(&mut self, field: DraftField, raw: &str) -> Result<(), ValidationRejection> {
        match field {
            DraftField::Name => self.name = raw.to_string(),
            DraftField::Quantity => self.quantity = parse_amount(AmountField::Quantity, raw)?,
            DraftField::UnitPrice => self.unit_price = parse_amount(AmountField::UnitPrice, raw)?,
        }
        Ok(())
    }

    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }

    pub fn reset(&mut self) {
        *self = DraftItem::default();
    }
}
