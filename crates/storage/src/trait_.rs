//! Storage trait definition
//!
//! Abstract interface for log record persistence

use plog_core::{LogEntry, StorageError, StoredRecord};
use std::sync::Arc;

/// Storage trait for log record persistence.
///
/// Every backend keeps records in the order they were persisted and never
/// overwrites an existing store when opened.
pub trait LogStorage: Send + Sync {
    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Create an empty store if none exists; otherwise do nothing
    fn initialize(&self) -> Result<(), StorageError>;

    /// Durably append one record derived from `entry`
    fn persist_one(&self, entry: &LogEntry) -> Result<(), StorageError>;

    /// Every stored record, in storage order
    fn load_all(&self) -> Result<Vec<StoredRecord>, StorageError>;

    /// Map stored records back to entries
    fn reconstitute(&self, records: &[StoredRecord]) -> plog_core::Result<Vec<LogEntry>> {
        records.iter().map(StoredRecord::to_entry).collect()
    }
}

/// Shared storage reference
pub type SharedStorage = Arc<dyn LogStorage>;
