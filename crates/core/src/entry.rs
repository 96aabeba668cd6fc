//! Log entry and its stored representation

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::date::parse_date;
use crate::{PlogError, Result};

pub const FIELD_DATE: &str = "date";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_MSG: &str = "msg";

/// Column order shared by every tabular layout
pub const FIELDS: [&str; 3] = [FIELD_DATE, FIELD_LEVEL, FIELD_MSG];

/// One log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    /// Severity name exactly as the caller passed it
    pub level: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: NaiveDateTime, level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level: level.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LogEntry: {}, {}, {}>", self.message, self.level, self.timestamp)
    }
}

/// Untyped on-disk form of a [`LogEntry`]: field name to text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredRecord(BTreeMap<String, String>);

impl StoredRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record, serializing the timestamp as `date`
    pub fn from_entry(entry: &LogEntry, date: String) -> Self {
        let mut record = Self::new();
        record.insert(FIELD_DATE, date);
        record.insert(FIELD_LEVEL, entry.level.clone());
        record.insert(FIELD_MSG, entry.message.clone());
        record
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, field: &'static str) -> Result<&str> {
        self.get(field).ok_or(PlogError::MissingField(field))
    }

    /// Reconstitute the typed entry; every field must be present and the
    /// date must be in a recognized layout
    pub fn to_entry(&self) -> Result<LogEntry> {
        let date = self.require(FIELD_DATE)?;
        let level = self.require(FIELD_LEVEL)?;
        let msg = self.require(FIELD_MSG)?;
        Ok(LogEntry {
            timestamp: parse_date(date)?,
            level: level.to_string(),
            message: msg.to_string(),
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StoredRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
