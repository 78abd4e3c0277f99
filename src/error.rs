// src/error.rs

use std::fmt;
use thiserror::Error;

/// Which amount a raw value was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Quantity,
    UnitPrice,
    Total,
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountField::Quantity => f.write_str("quantity"),
            AmountField::UnitPrice => f.write_str("unit price"),
            AmountField::Total => f.write_str("total amount"),
        }
    }
}

/// A raw draft value was refused. The draft keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationRejection {
    /// Not digits with an optional point and one or two decimals.
    #[error("{field}: {raw:?} is not a non-negative amount with at most 2 decimals")]
    Format { field: AmountField, raw: String },

    /// Well formed but too large for the decimal type.
    #[error("{field}: {raw:?} is out of range")]
    OutOfRange { field: AmountField, raw: String },
}

impl ValidationRejection {
    pub fn field(&self) -> AmountField {
        match self {
            ValidationRejection::Format { field, .. }
            | ValidationRejection::OutOfRange { field, .. } => *field,
        }
    }
}

/// Failures of invoice model operations other than draft validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    #[error("unknown invoice field: {0}")]
    UnknownField(String),

    #[error("unknown draft item field: {0}")]
    UnknownItemField(String),

    /// Manual total edits are refused once the total is derived from items.
    #[error("total is computed from {items} item(s) and cannot be edited")]
    TotalLocked { items: usize },

    #[error("invoice total would overflow")]
    TotalOverflow,

    #[error(transparent)]
    Rejected(#[from] ValidationRejection),
}

/// Everything that can go wrong between pressing submit and having a saved PDF.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("failed to serialize invoice: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("renderer returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to save {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
