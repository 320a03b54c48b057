//! Company (seller / buyer) reference

use serde::{Deserialize, Serialize};

/// A party on an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Option<u64>,
    pub name: String,
    pub address: String,
    pub tax_id: String,
    pub account_number: String,
    pub phone_number: String,
    pub email: String,
}
