//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use invoicestore::model::{Company, Invoice, InvoiceEntry, Vat};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn company(name: &str) -> Company {
    Company {
        id: None,
        name: name.to_string(),
        address: "ul. Bukowinska 24 d/7, 02-703 Warszawa".to_string(),
        tax_id: "701-041-63-84".to_string(),
        account_number: "27 1030 0019 0109 8503 0014 2668".to_string(),
        phone_number: "691 950 343".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

pub fn entry(description: &str) -> InvoiceEntry {
    InvoiceEntry {
        id: None,
        description: description.to_string(),
        quantity: 2,
        price: Decimal::new(1000, 2),
        net_value: Decimal::new(2000, 2),
        gross_value: Decimal::new(2460, 2),
        vat_rate: Vat::Vat23,
    }
}

/// Invoice without an id, issued on the given date
pub fn invoice_issued(number: &str, issued: NaiveDate) -> Invoice {
    Invoice {
        id: None,
        number: number.to_string(),
        issued_date: issued,
        due_date: issued + chrono::Duration::days(14),
        seller: company("Seller"),
        buyer: company("Buyer"),
        entries: vec![entry("Consulting"), entry("Hosting")],
    }
}

/// Invoice without an id, issued 2019-07-16
pub fn invoice(number: &str) -> Invoice {
    invoice_issued(number, date(2019, 7, 16))
}

/// Invoice carrying a caller-supplied id
pub fn invoice_with_id(id: u64, number: &str) -> Invoice {
    invoice(number).with_id(id)
}

/// Temp dir plus a path for a store file that does not exist yet
pub fn temp_file_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("invoices.jsonl");
    (temp_dir, path)
}
