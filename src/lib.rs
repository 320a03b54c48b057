//! # invoicestore
//!
//! A line-oriented, file-backed invoice store with:
//! - One JSON record per line, no database engine
//! - Stable ids from a monotonic counter, never recycled in-process
//! - In-place update and delete-with-compaction by line position
//! - Single-writer/multi-reader concurrency model
//! - Tolerant reads that skip (and count) malformed lines
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     InvoiceService                           │
//! │              (add / update / query checks)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ dyn InvoiceStorage
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  FileStore  │          │ MemoryStore │
//!   │ (write lock)│          │  (RwLock)   │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │InvoiceCodec │─────────▶│  LineFile   │───▶ invoices.jsonl
//!   │ (JSON line) │          │ (line I/O)  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod lines;
pub mod codec;
pub mod storage;
pub mod service;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use storage::{FileStore, InvoiceStorage, MemoryStore};
pub use service::InvoiceService;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of invoicestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
