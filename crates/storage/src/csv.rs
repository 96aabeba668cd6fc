//! CSV file storage
//!
//! Header row `date,level,msg` followed by one row per record. Like the JSON
//! store, each write rewrites the header and every row.
//!
//! The date column holds the space-separated form (`2021-07-10 16:05:09.123456`,
//! or `2021-07-10 16:05:09` at zero microseconds), not the ISO-8601 form the
//! other backends use.

use plog_core::date::format_date_plain;
use plog_core::{LogEntry, StorageError, StoredRecord, WriteMode, FIELDS};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::file::{ensure_parent, replace_contents};
use crate::trait_::LogStorage;

fn csv_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Csv(e.to_string())
}

/// CSV table file storage
#[derive(Debug, Clone)]
pub struct CsvStorage {
    /// Store file path
    path: PathBuf,

    write_mode: WriteMode,
}

impl CsvStorage {
    /// Open the store at `path`, creating a header-only table if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage = Self {
            path: path.into(),
            write_mode: WriteMode::default(),
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[StoredRecord]) -> Result<(), StorageError> {
        let mut writer = ::csv::WriterBuilder::new()
            .terminator(::csv::Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record(FIELDS).map_err(csv_error)?;
        for record in records {
            let row = FIELDS.iter().map(|field| record.get(field).unwrap_or(""));
            writer.write_record(row).map_err(csv_error)?;
        }

        let buf = writer.into_inner().map_err(csv_error)?;
        replace_contents(&self.path, &buf, self.write_mode)
    }
}

impl LogStorage for CsvStorage {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn initialize(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }
        ensure_parent(&self.path)?;
        self.write_all(&[])?;
        info!("CSV log store created at: {:?}", self.path);
        Ok(())
    }

    fn persist_one(&self, entry: &LogEntry) -> Result<(), StorageError> {
        let mut records = self.load_all()?;
        records.push(StoredRecord::from_entry(entry, format_date_plain(&entry.timestamp)));
        self.write_all(&records)?;
        debug!(path = ?self.path, total = records.len(), "appended CSV log record");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let file = File::open(&self.path)?;
        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let mut records: Vec<StoredRecord> = Vec::new();
        for row in reader.records() {
            let row = row.map_err(csv_error)?;
            records.push(headers.iter().zip(row.iter()).collect());
        }
        Ok(records)
    }
}
