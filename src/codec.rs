//! Record codec
//!
//! Maps an `Invoice` to exactly one line of JSON and back.
//!
//! ## Line Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ {"id":7,"number":"...","issuedDate":"2019-07-16",...}    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//! `serde_json` escapes control characters inside strings, so an encoded
//! record never contains a raw line terminator.
//!
//! Decoding is tolerant: a line that does not parse yields `None`, never an
//! error, so bulk scans can step over a torn or hand-edited line.

use crate::error::Result;
use crate::model::Invoice;

/// Bidirectional mapping between invoices and single text lines
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceCodec;

impl InvoiceCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode an invoice as one line of JSON (no terminator)
    pub fn encode(&self, invoice: &Invoice) -> Result<String> {
        Ok(serde_json::to_string(invoice)?)
    }

    /// Decode one line, or `None` if it is blank or malformed
    pub fn decode(&self, line: &str) -> Option<Invoice> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }
}
