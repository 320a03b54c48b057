//! Invoice Service
//!
//! Caller-facing operations over any [`InvoiceStorage`] backend.
//!
//! Adds the checks a transport layer expects on top of raw storage: `add`
//! refuses to overwrite, `update` refuses to create, and date queries need a
//! well-formed interval. Failures are logged here once, with the operation
//! that hit them.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{Result, StoreError};
use crate::model::Invoice;
use crate::storage::InvoiceStorage;

/// Storage-agnostic invoice service
#[derive(Clone)]
pub struct InvoiceService {
    storage: Arc<dyn InvoiceStorage>,
}

impl InvoiceService {
    pub fn new(storage: Arc<dyn InvoiceStorage>) -> Self {
        Self { storage }
    }

    pub fn get_all_invoices(&self) -> Result<Vec<Invoice>> {
        logged("getting all invoices", self.storage.get_all())
    }

    pub fn get_invoice_by_id(&self, id: u64) -> Result<Option<Invoice>> {
        logged("getting invoice by id", self.storage.get_by_id(id))
    }

    pub fn get_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>> {
        logged("getting invoice by number", self.storage.get_by_number(number))
    }

    /// Store a new invoice. Fails with `InvoiceAlreadyExists` if it carries
    /// an id that is already stored.
    pub fn add_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        if let Some(id) = invoice.id {
            if logged("adding invoice", self.storage.exists(id))? {
                tracing::error!(id, "Attempt to add invoice already existing in database.");
                return Err(StoreError::InvoiceAlreadyExists(id));
            }
        }
        logged("adding invoice", self.storage.save(invoice))
    }

    /// Replace a stored invoice. Fails with `InvalidArgument` if the invoice
    /// has no id and with `InvoiceNotFound` if its id is not stored.
    pub fn update_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        let Some(id) = invoice.id else {
            tracing::error!("Attempt to update invoice without id.");
            return Err(StoreError::invalid_argument("Invoice to update must have an id."));
        };
        if !logged("updating invoice", self.storage.exists(id))? {
            tracing::error!(id, "Attempt to update not existing invoice.");
            return Err(StoreError::InvoiceNotFound(id));
        }
        logged("updating invoice", self.storage.save(invoice))
    }

    pub fn delete_invoice_by_id(&self, id: u64) -> Result<()> {
        logged("deleting invoice", self.storage.delete(id))
    }

    pub fn delete_all_invoices(&self) -> Result<()> {
        logged("deleting all invoices", self.storage.delete_all())
    }

    pub fn invoice_exists(&self, id: u64) -> Result<bool> {
        logged("checking if invoice exists", self.storage.exists(id))
    }

    pub fn invoices_count(&self) -> Result<u64> {
        logged("getting number of invoices", self.storage.count())
    }

    /// Invoices issued in `[start, end]`; both bounds required, `start <= end`
    pub fn get_by_issue_date(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Invoice>> {
        if start > end {
            tracing::error!(%start, %end, "Attempt to get invoices with start date after end date.");
            return Err(StoreError::invalid_argument("Start date cannot be after end date."));
        }
        logged(
            "getting invoices by issue date",
            self.storage.get_by_issue_date(Some(start), Some(end)),
        )
    }
}

/// Log an operational failure with the operation name and pass it on
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(ref e) = result {
        if !e.is_contract_violation() {
            tracing::error!(error = %e, "An error occurred during {}.", operation);
        }
    }
    result
}
