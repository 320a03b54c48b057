//! Invoice line items and VAT rates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// VAT rate applied to an invoice entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vat {
    #[serde(rename = "VAT_0")]
    Vat0,
    #[serde(rename = "VAT_5")]
    Vat5,
    #[serde(rename = "VAT_8")]
    Vat8,
    #[serde(rename = "VAT_23")]
    Vat23,
}

impl Vat {
    /// Rate as a percentage (23 for 23%)
    pub fn rate(&self) -> Decimal {
        match self {
            Vat::Vat0 => Decimal::ZERO,
            Vat::Vat5 => Decimal::from(5),
            Vat::Vat8 => Decimal::from(8),
            Vat::Vat23 => Decimal::from(23),
        }
    }
}

/// A single item on an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntry {
    pub id: Option<u64>,
    pub description: String,
    pub quantity: u64,
    pub price: Decimal,
    pub net_value: Decimal,
    pub gross_value: Decimal,
    pub vat_rate: Vat,
}
