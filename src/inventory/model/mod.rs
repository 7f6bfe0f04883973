use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One spreadsheet record, already coerced into its column types.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Units that can be sold right now.
    pub available_stock: u64,
    /// Units held in total. Not checked against `available_stock`.
    pub total_stock: u64,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Identifier of the part in the supplier's own catalogue.
    pub internal_part_number: String,
}

/// Canonical record accepted by the offer import endpoint.
///
/// Field order matters: serialisation must stay byte-stable for equal input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub availability: Availability,
    pub part: PartRef,
    pub prices: Vec<Price>,
    pub supplier: Supplier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    pub available_stock: u64,
    pub total_stock: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartRef {
    pub internal_part_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub unit_price: Money,
}

/// Monetary amount. The amount travels as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Money {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supplier {
    #[serde(rename = "type")]
    pub kind: String,
    pub supplier: String,
}

/// Request body for the import endpoint: a bare offer or an array of offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OfferPayload {
    Single(Offer),
    Batch(Vec<Offer>),
}

impl OfferPayload {
    /// Number of offers carried by the payload.
    pub fn len(&self) -> usize {
        match self {
            OfferPayload::Single(_) => 1,
            OfferPayload::Batch(offers) => offers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Selects how many data rows a cycle reads and how they are shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Every data row becomes an offer; the payload is an array.
    #[default]
    Batch,
    /// Only the first data row is read; the payload is a single object.
    Single,
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadMode::Batch => write!(f, "batch"),
            ReadMode::Single => write!(f, "single"),
        }
    }
}

/// Short-lived bearer credential returned by the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

/// What the import endpoint answered. Any status counts as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReport {
    pub status: u16,
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
