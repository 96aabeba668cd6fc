//! SQLite Storage - Persistent log storage using SQLite
//!
//! One table `logs (date TEXT, level TEXT, msg TEXT)` with no key and no
//! indices. Every operation opens its own connection and closes it on return.

use plog_core::date::format_date;
use plog_core::{LogEntry, StorageError, StoredRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::file::ensure_parent;
use crate::trait_::LogStorage;

const CREATE_LOGS_TABLE: &str = "CREATE TABLE IF NOT EXISTS logs (date TEXT, level TEXT, msg TEXT)";

fn db_error(e: rusqlite::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

/// SQLite storage implementation
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    /// Database file path
    path: PathBuf,
}

impl SqliteStorage {
    /// Open the database at `path`, creating the `logs` table if the file is absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage = Self { path: path.into() };
        storage.initialize()?;
        Ok(storage)
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` on a fresh connection that is closed afterwards
    fn with_connection<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T>,
    {
        let conn = rusqlite::Connection::open(&self.path).map_err(db_error)?;
        let result = f(&conn).map_err(db_error)?;
        conn.close().map_err(|(_, e)| db_error(e))?;
        Ok(result)
    }
}

impl LogStorage for SqliteStorage {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn initialize(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }
        ensure_parent(&self.path)?;
        self.with_connection(|conn| conn.execute(CREATE_LOGS_TABLE, []))?;
        info!("SQLite log store initialized at: {:?}", self.path);
        Ok(())
    }

    fn persist_one(&self, entry: &LogEntry) -> Result<(), StorageError> {
        let date = format_date(&entry.timestamp);
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO logs (date, level, msg) VALUES (?1, ?2, ?3)",
                rusqlite::params![date, entry.level, entry.message],
            )
        })?;
        debug!(path = ?self.path, "inserted SQLite log row");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT date, level, msg FROM logs ORDER BY rowid")?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let rows = stmt.query_map([], |row| {
                let mut record = StoredRecord::new();
                for (idx, column) in columns.iter().enumerate() {
                    if let Some(value) = row.get::<_, Option<String>>(idx)? {
                        record.insert(column.as_str(), value);
                    }
                }
                Ok(record)
            })?;

            let mut result = Vec::new();
            for record in rows {
                result.push(record?);
            }
            Ok(result)
        })
    }
}
