//! Tests for InvoiceCodec
//!
//! These tests verify:
//! - Encoded invoices occupy exactly one line
//! - The JSON shape (camelCase fields, ISO dates, VAT names)
//! - Tolerant decode of blank and malformed lines

#[path = "../common/mod.rs"]
mod common;

use common::{date, invoice, invoice_with_id};
use invoicestore::codec::InvoiceCodec;
use invoicestore::model::Vat;
use rust_decimal::Decimal;

// =============================================================================
// Encode Tests
// =============================================================================

#[test]
fn test_encode_is_single_line() {
    let codec = InvoiceCodec::new();
    let mut inv = invoice_with_id(1, "FV/1");
    inv.seller.address = "Line one\nLine two\r\n".to_string();

    let line = codec.encode(&inv).unwrap();

    assert!(!line.contains('\n'));
    assert!(!line.contains('\r'));
}

#[test]
fn test_encode_uses_camel_case_and_iso_dates() {
    let codec = InvoiceCodec::new();

    let line = codec.encode(&invoice_with_id(7, "FV/7")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert_eq!(json["id"], 7);
    assert_eq!(json["number"], "FV/7");
    assert_eq!(json["issuedDate"], "2019-07-16");
    assert_eq!(json["dueDate"], "2019-07-30");
    assert_eq!(json["seller"]["taxId"], "701-041-63-84");
    assert_eq!(json["entries"][0]["vatRate"], "VAT_23");
}

#[test]
fn test_encode_invoice_without_id() {
    let codec = InvoiceCodec::new();

    let line = codec.encode(&invoice("FV/1")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert!(json["id"].is_null());
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_restores_encoded_invoice() {
    let codec = InvoiceCodec::new();
    let original = invoice_with_id(3, "FV/3");

    let decoded = codec.decode(&codec.encode(&original).unwrap()).unwrap();

    assert_eq!(decoded, original);
    assert_eq!(decoded.issued_date, date(2019, 7, 16));
    assert_eq!(decoded.entries[0].gross_value, Decimal::new(2460, 2));
}

#[test]
fn test_decode_blank_line_is_none() {
    let codec = InvoiceCodec::new();

    assert!(codec.decode("").is_none());
    assert!(codec.decode("   ").is_none());
}

#[test]
fn test_decode_malformed_line_is_none() {
    let codec = InvoiceCodec::new();

    assert!(codec.decode("{not json").is_none());
    assert!(codec.decode("[1,2,3]").is_none());
    assert!(codec.decode(r#"{"id":1,"number":"x"}"#).is_none());
}

#[test]
fn test_decode_truncated_line_is_none() {
    let codec = InvoiceCodec::new();
    let line = codec.encode(&invoice_with_id(1, "FV/1")).unwrap();

    assert!(codec.decode(&line[..line.len() / 2]).is_none());
}

#[test]
fn test_decode_missing_entries_defaults_to_empty() {
    let codec = InvoiceCodec::new();
    let mut json: serde_json::Value =
        serde_json::from_str(&codec.encode(&invoice_with_id(1, "FV/1")).unwrap()).unwrap();
    json.as_object_mut().unwrap().remove("entries");

    let decoded = codec.decode(&json.to_string()).unwrap();

    assert!(decoded.entries.is_empty());
}

#[test]
fn test_vat_rates() {
    assert_eq!(Vat::Vat0.rate(), Decimal::ZERO);
    assert_eq!(Vat::Vat5.rate(), Decimal::from(5));
    assert_eq!(Vat::Vat8.rate(), Decimal::from(8));
    assert_eq!(Vat::Vat23.rate(), Decimal::from(23));
}
