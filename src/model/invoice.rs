//! Invoice record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Company, InvoiceEntry};

/// An invoice as stored, one per line in the backing file
///
/// `id` is `None` until the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Option<u64>,
    pub number: String,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub seller: Company,
    pub buyer: Company,
    #[serde(default)]
    pub entries: Vec<InvoiceEntry>,
}

impl Invoice {
    /// Copy of this invoice carrying the given id
    pub fn with_id(&self, id: u64) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }
}
