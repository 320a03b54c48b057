//! Storage Module
//!
//! The record-level contract every invoice backend satisfies, plus its two
//! implementations.
//!
//! ## Backends
//! - [`FileStore`]: the line-oriented store. One JSON invoice per line, ids
//!   from an in-process counter, lookups by linear scan.
//! - [`MemoryStore`]: a `BTreeMap` behind a `RwLock`, with the same id and
//!   error semantics. Useful for tests and as a reference for new backends.
//!
//! Callers depend only on [`InvoiceStorage`]; which backend they get is a
//! construction-time decision.

mod file;
mod memory;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use crate::error::{Result, StoreError};
use crate::model::Invoice;

pub use file::{FileStore, ScanReport};
pub use memory::MemoryStore;

/// The storage contract consumed by the service layer
///
/// ## Semantics
/// - `save` inserts when the invoice has no id or its id is not stored yet,
///   and replaces the stored record otherwise.
/// - `delete` of an id that is not stored fails with `InvoiceNotFound`.
/// - Lookups return `Ok(None)` for a miss; errors are reserved for I/O.
pub trait InvoiceStorage: Send + Sync {
    /// Insert or update; returns the stored invoice (with its id on insert)
    fn save(&self, invoice: Invoice) -> Result<Invoice>;

    /// Remove the invoice with this id
    fn delete(&self, id: u64) -> Result<()>;

    /// First invoice with this id
    fn get_by_id(&self, id: u64) -> Result<Option<Invoice>>;

    /// First invoice with this number
    fn get_by_number(&self, number: &str) -> Result<Option<Invoice>>;

    /// Every stored invoice, in backend order
    fn get_all(&self) -> Result<Vec<Invoice>>;

    /// Remove every invoice. Ids already handed out are not reused.
    fn delete_all(&self) -> Result<()>;

    /// Whether an invoice with this id is stored
    fn exists(&self, id: u64) -> Result<bool>;

    /// Number of stored invoices
    fn count(&self) -> Result<u64>;

    /// Invoices whose issued date falls in `[start, end]`; a `None` bound is open
    fn get_by_issue_date(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Invoice>>;
}

/// Inclusive date interval with optional bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `start <= date <= end`, skipping whichever bound is absent
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Advance `counter` by one and return the new id
///
/// Fails with `IdSpaceExhausted` instead of wrapping once the counter sits at
/// `u64::MAX`, which a caller-supplied id can push it to.
pub(crate) fn mint_id(counter: &AtomicU64) -> Result<u64> {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
        .map(|last| last + 1)
        .map_err(StoreError::IdSpaceExhausted)
}
