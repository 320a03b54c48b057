//! Memory Store
//!
//! `BTreeMap`-backed implementation of the storage contract.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::config::IdPolicy;
use crate::error::{Result, StoreError};
use crate::model::Invoice;

use super::{mint_id, DateRange, InvoiceStorage};

/// In-memory invoice store
///
/// ## Concurrency:
/// - `invoices`: protected by RwLock (many concurrent readers, exclusive writer)
/// - `next_id`: only advanced while the write lock is held
///
/// Iteration order is ascending id, not insertion order.
pub struct MemoryStore {
    /// Invoices keyed by id
    invoices: RwLock<BTreeMap<u64, Invoice>>,

    /// Last id handed out
    next_id: AtomicU64,

    /// How caller-supplied ids interact with the counter
    id_policy: IdPolicy,
}

impl MemoryStore {
    /// Create an empty store with the default id policy
    pub fn new() -> Self {
        Self::with_id_policy(IdPolicy::AdvancePastSupplied)
    }

    /// Create an empty store with the given id policy
    pub fn with_id_policy(id_policy: IdPolicy) -> Self {
        Self {
            invoices: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
            id_policy,
        }
    }

    /// Last id handed out by the counter (0 if none yet)
    pub fn last_assigned_id(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceStorage for MemoryStore {
    fn save(&self, invoice: Invoice) -> Result<Invoice> {
        let mut invoices = self.invoices.write();

        if let Some(id) = invoice.id {
            if invoices.contains_key(&id) {
                invoices.insert(id, invoice.clone());
                tracing::debug!(id, "Updated invoice");
                return Ok(invoice);
            }
        }

        let id = match invoice.id {
            None => mint_id(&self.next_id)?,
            Some(id) => {
                if self.id_policy == IdPolicy::AdvancePastSupplied {
                    self.next_id.fetch_max(id, Ordering::SeqCst);
                }
                id
            }
        };

        let inserted = invoice.with_id(id);
        invoices.insert(id, inserted.clone());
        tracing::debug!(id, "Inserted invoice");
        Ok(inserted)
    }

    fn delete(&self, id: u64) -> Result<()> {
        let mut invoices = self.invoices.write();
        if invoices.remove(&id).is_none() {
            tracing::error!(id, "Attempt to delete not existing invoice.");
            return Err(StoreError::InvoiceNotFound(id));
        }
        Ok(())
    }

    fn get_by_id(&self, id: u64) -> Result<Option<Invoice>> {
        Ok(self.invoices.read().get(&id).cloned())
    }

    fn get_by_number(&self, number: &str) -> Result<Option<Invoice>> {
        Ok(self
            .invoices
            .read()
            .values()
            .find(|invoice| invoice.number == number)
            .cloned())
    }

    fn get_all(&self) -> Result<Vec<Invoice>> {
        Ok(self.invoices.read().values().cloned().collect())
    }

    fn delete_all(&self) -> Result<()> {
        self.invoices.write().clear();
        Ok(())
    }

    fn exists(&self, id: u64) -> Result<bool> {
        Ok(self.invoices.read().contains_key(&id))
    }

    fn count(&self) -> Result<u64> {
        Ok(self.invoices.read().len() as u64)
    }

    fn get_by_issue_date(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Invoice>> {
        let range = DateRange::new(start, end);
        Ok(self
            .invoices
            .read()
            .values()
            .filter(|invoice| range.contains(invoice.issued_date))
            .cloned()
            .collect())
    }
}
