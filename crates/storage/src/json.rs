//! JSON 文件存储实现
//!
//! The store is one JSON array of `{"date", "level", "msg"}` objects. Every write
//! loads the whole array, appends, and rewrites the file.

use plog_core::date::format_date;
use plog_core::{LogEntry, StorageError, StoredRecord, WriteMode};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::file::{ensure_parent, replace_contents};
use crate::trait_::LogStorage;

/// JSON array file storage
#[derive(Debug, Clone)]
pub struct JsonStorage {
    /// Store file path
    path: PathBuf,

    write_mode: WriteMode,
}

impl JsonStorage {
    /// Open the store at `path`, creating an empty array if absent
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
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        records.serialize(&mut ser)?;
        replace_contents(&self.path, &buf, self.write_mode)
    }
}

impl LogStorage for JsonStorage {
    fn name(&self) -> &'static str {
        "json"
    }

    fn initialize(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }
        ensure_parent(&self.path)?;
        self.write_all(&[])?;
        info!("JSON log store created at: {:?}", self.path);
        Ok(())
    }

    fn persist_one(&self, entry: &LogEntry) -> Result<(), StorageError> {
        let mut records = self.load_all()?;
        records.push(StoredRecord::from_entry(entry, format_date(&entry.timestamp)));
        self.write_all(&records)?;
        debug!(path = ?self.path, total = records.len(), "appended JSON log record");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let content = std::fs::read_to_string(&self.path)?;
        let records: Vec<StoredRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }
}

/// Compact JSON with `", "` and `": "` separators. Characters outside printable
/// ASCII are written as `\uXXXX` escapes, split into surrogate pairs above the BMP.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
