//! Error types for invoicestore
//!
//! Two classes of failure flow through a single enum:
//! - **Contract violations** (`InvalidArgument`): caller bugs, raised before any I/O.
//! - **Operational failures** (everything else): I/O, serialization, missing records.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for invoicestore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Contract Violations
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Line File Errors
    // -------------------------------------------------------------------------
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Line position {position} out of range (file has {line_count} lines)")]
    OutOfRange { position: usize, line_count: usize },

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("There was no invoice in database with id: {0}")]
    InvoiceNotFound(u64),

    #[error("Invoice already exists in database with id: {0}")]
    InvoiceAlreadyExists(u64),

    #[error("No invoice ids left to assign after {0}")]
    IdSpaceExhausted(u64),

    // -------------------------------------------------------------------------
    // I/O and Serialization Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Store Operation Errors
    // -------------------------------------------------------------------------
    #[error("{message}")]
    Operation {
        message: String,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Shorthand for building an `InvalidArgument` error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument(message.into())
    }

    /// True for caller errors that must not be retried
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, StoreError::InvalidArgument(_))
    }

    /// True when the failure means "the thing asked for is not there",
    /// looking through any `Operation` wrapper.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::InvoiceNotFound(_) | StoreError::FileNotFound(_) => true,
            StoreError::Operation { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Attaches a store-level message to operational failures.
///
/// Contract violations and missing-record errors pass through untouched so
/// callers can still match on them directly.
pub(crate) trait ResultExt<T> {
    fn context<F>(self, message: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<F>(self, message: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| match err {
            StoreError::InvalidArgument(_)
            | StoreError::InvoiceNotFound(_)
            | StoreError::InvoiceAlreadyExists(_)
            | StoreError::Operation { .. } => err,
            other => StoreError::Operation {
                message: message(),
                source: Box::new(other),
            },
        })
    }
}
