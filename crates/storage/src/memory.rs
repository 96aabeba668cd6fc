//! In-memory storage implementation
//!
//! Keeps stored records for the lifetime of the process

use plog_core::date::format_date;
use plog_core::{LogEntry, StorageError, StoredRecord};
use std::sync::{Arc, Mutex};

use crate::trait_::{LogStorage, SharedStorage};

/// In-memory storage implementation
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStorage for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn initialize(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn persist_one(&self, entry: &LogEntry) -> Result<(), StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;
        records.push(StoredRecord::from_entry(entry, format_date(&entry.timestamp)));
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;
        Ok(records.clone())
    }
}

/// Create a new shared in-memory storage
pub fn create_memory_storage() -> SharedStorage {
    Arc::new(MemoryStorage::new())
}
