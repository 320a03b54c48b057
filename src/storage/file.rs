//! File Store
//!
//! The line-oriented invoice store: CRUD over a newline-delimited JSON file.
//!
//! ## Responsibilities
//! - Allocate ids from an in-process counter seeded from the last line
//! - Locate records by scanning and decoding every line
//! - Serialize every mutation behind one lock, so a position found by a scan
//!   is still valid when the positional write that uses it runs
//! - Count and report lines that fail to decode

use std::fs;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::codec::InvoiceCodec;
use crate::config::{Config, IdPolicy};
use crate::error::{Result, ResultExt, StoreError};
use crate::lines::LineFile;
use crate::model::Invoice;

use super::{mint_id, DateRange, InvoiceStorage};

/// Outcome of a full scan: the decoded records and how many lines were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Records in file order
    pub records: Vec<Invoice>,

    /// Lines that did not decode to an invoice
    pub skipped: u64,
}

/// File-backed invoice store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (save/delete/delete_all): serialized by `write_lock`.
///   The scan that finds a record's position and the `replace_line` /
///   `remove_line` that uses it run under the same guard.
///
/// - **Reads** (lookups, count, scans): take no lock. They may run while a
///   write is in flight; positional rewrites replace the file by rename, so a
///   reader sees either the old or the new contents, and a half-appended last
///   line is skipped like any other malformed line.
///
/// The store assumes it is the only writer of its file in the process.
pub struct FileStore {
    /// Store configuration
    config: Config,

    /// Backing file
    file: LineFile,

    /// Line <-> invoice mapping
    codec: InvoiceCodec,

    /// Last id handed out; the next insert without an id gets `next_id + 1`.
    /// Only advanced while `write_lock` is held.
    next_id: AtomicU64,

    /// Running total of lines dropped by scans since open
    skipped_lines: AtomicU64,

    /// Serializes write operations (save/delete/delete_all)
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the parent directory and an empty file if missing
    /// 2. Read the last line and seed the id counter from its id
    ///    (0 if the file is empty or the line does not decode)
    pub fn open(config: Config) -> Result<Self> {
        let file = LineFile::new(&config.db_path)?.with_sync_strategy(config.sync_strategy);

        if let Some(parent) = file.path().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !file.exists() {
            match file.create() {
                // Lost a race with another opener; the file is there either way
                Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let codec = InvoiceCodec::new();
        let seed = file
            .read_last_line()
            .context(|| "An error occurred during opening the file.".to_string())?
            .and_then(|line| codec.decode(&line))
            .and_then(|invoice| invoice.id)
            .unwrap_or(0);

        tracing::info!(
            path = %file.path().display(),
            next_id = seed + 1,
            "Opened invoice file store"
        );

        Ok(Self {
            config,
            file,
            codec,
            next_id: AtomicU64::new(seed),
            skipped_lines: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().db_path(path).build();
        Self::open(config)
    }

    /// Decode every line, keeping file order and counting what was dropped
    pub fn scan_report(&self) -> Result<ScanReport> {
        let mut records = Vec::new();
        let skipped = self
            .scan(|_, invoice| {
                records.push(invoice);
                ControlFlow::Continue(())
            })
            .context(|| "An error occurred during getting all invoices.".to_string())?;

        Ok(ScanReport { records, skipped })
    }

    // =========================================================================
    // Write Path (called with write lock held)
    // =========================================================================

    fn insert(&self, invoice: Invoice) -> Result<Invoice> {
        let id = match invoice.id {
            None => mint_id(&self.next_id)?,
            Some(id) => {
                if self.config.id_policy == IdPolicy::AdvancePastSupplied {
                    self.next_id.fetch_max(id, Ordering::SeqCst);
                }
                id
            }
        };

        let inserted = invoice.with_id(id);
        let line = self.codec.encode(&inserted)?;
        self.file
            .append_line(&line)
            .context(|| "An error occurred during inserting the invoice.".to_string())?;

        tracing::debug!(id, "Inserted invoice");
        Ok(inserted)
    }

    fn update(&self, invoice: Invoice, position: usize) -> Result<Invoice> {
        let line = self.codec.encode(&invoice)?;
        self.file
            .replace_line(&line, position)
            .context(|| "An error occurred during updating the invoice.".to_string())?;

        tracing::debug!(id = invoice.id, position, "Updated invoice");
        Ok(invoice)
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Walk the file, handing each decoded invoice and its 1-based position
    /// to `visit` until it breaks. Returns the number of lines skipped.
    fn scan<F>(&self, mut visit: F) -> Result<u64>
    where
        F: FnMut(usize, Invoice) -> ControlFlow<()>,
    {
        let mut position = 0;
        let mut skipped = 0;

        for line in self.file.lines()? {
            let line = line?;
            position += 1;

            match self.codec.decode(&line) {
                Some(invoice) => {
                    if visit(position, invoice).is_break() {
                        break;
                    }
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            self.skipped_lines.fetch_add(skipped, Ordering::Relaxed);
            tracing::warn!(
                path = %self.file.path().display(),
                skipped,
                "Skipped lines that do not decode to an invoice"
            );
        }

        Ok(skipped)
    }

    /// Current 1-based position of the record with this id
    fn find_position(&self, id: u64) -> Result<Option<usize>> {
        let mut found = None;
        self.scan(|position, invoice| {
            if invoice.id == Some(id) {
                found = Some(position);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }

    /// First invoice matching `predicate`
    fn find_first<P>(&self, mut predicate: P) -> Result<Option<Invoice>>
    where
        P: FnMut(&Invoice) -> bool,
    {
        let mut found = None;
        self.scan(|_, invoice| {
            if predicate(&invoice) {
                found = Some(invoice);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Last id handed out by the counter (0 if none yet)
    pub fn last_assigned_id(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Lines dropped as undecodable by scans since open
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines.load(Ordering::Relaxed)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl InvoiceStorage for FileStore {
    fn save(&self, invoice: Invoice) -> Result<Invoice> {
        let _write_guard = self.write_lock.lock();

        let position = match invoice.id {
            Some(id) => self
                .find_position(id)
                .context(|| "An error occurred during saving the invoice.".to_string())?,
            None => None,
        };

        match position {
            Some(position) => self.update(invoice, position),
            None => self.insert(invoice),
        }
    }

    fn delete(&self, id: u64) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        let position = self
            .find_position(id)
            .context(|| "An error occurred during deleting the invoice.".to_string())?;

        let Some(position) = position else {
            tracing::error!(id, "Attempt to delete not existing invoice.");
            return Err(StoreError::InvoiceNotFound(id));
        };

        self.file
            .remove_line(position)
            .context(|| "An error occurred during deleting the invoice.".to_string())?;

        tracing::debug!(id, position, "Deleted invoice");
        Ok(())
    }

    fn get_by_id(&self, id: u64) -> Result<Option<Invoice>> {
        self.find_first(|invoice| invoice.id == Some(id))
            .context(|| "An error occurred during getting invoice by id.".to_string())
    }

    fn get_by_number(&self, number: &str) -> Result<Option<Invoice>> {
        self.find_first(|invoice| invoice.number == number)
            .context(|| "An error occurred during getting invoice by number.".to_string())
    }

    fn get_all(&self) -> Result<Vec<Invoice>> {
        Ok(self.scan_report()?.records)
    }

    fn delete_all(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        self.file
            .clear()
            .context(|| "An error occurred during deleting all invoices.".to_string())?;

        tracing::debug!(path = %self.file.path().display(), "Cleared invoice file");
        Ok(())
    }

    fn exists(&self, id: u64) -> Result<bool> {
        Ok(self
            .find_position(id)
            .context(|| "An error occurred during checking if invoice exists.".to_string())?
            .is_some())
    }

    fn count(&self) -> Result<u64> {
        let mut count = 0;
        self.scan(|_, _| {
            count += 1;
            ControlFlow::Continue(())
        })
        .context(|| "An error occurred during counting invoices.".to_string())?;
        Ok(count)
    }

    fn get_by_issue_date(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Invoice>> {
        let range = DateRange::new(start, end);
        if range.is_unbounded() {
            return self.get_all();
        }

        let mut matching = Vec::new();
        self.scan(|_, invoice| {
            if range.contains(invoice.issued_date) {
                matching.push(invoice);
            }
            ControlFlow::Continue(())
        })
        .context(|| "An error occurred during getting invoices by issue date.".to_string())?;
        Ok(matching)
    }
}
