//! Configuration for invoicestore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a file-backed invoice store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing file: one JSON invoice per line, no header or footer
    pub db_path: PathBuf,

    /// Sync strategy: whether to fsync after each mutation
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Id Allocation
    // -------------------------------------------------------------------------
    /// How caller-supplied ids interact with the next-id counter
    pub id_policy: IdPolicy,
}

/// File sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Leave flushing to the OS page cache (fastest, weakest)
    OsBuffered,

    /// fsync after every append or rewrite
    EveryWrite,
}

/// Policy for inserts that carry their own id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// A caller-supplied id pushes the counter to at least that value,
    /// so later auto-assigned ids can never collide with it
    AdvancePastSupplied,

    /// Caller-supplied ids are written as-is and never touch the counter.
    /// A later auto-assigned id may equal an id a caller already used.
    Unreserved,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./invoices.jsonl"),
            sync_strategy: SyncStrategy::OsBuffered,
            id_policy: IdPolicy::AdvancePastSupplied,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the id allocation policy
    pub fn id_policy(mut self, policy: IdPolicy) -> Self {
        self.config.id_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
