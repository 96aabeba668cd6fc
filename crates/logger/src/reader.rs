//! LogReader - query engine over a one-time snapshot of a backend
//!
//! Every query takes an optional `[start, end]` window. A missing start means
//! 1970-01-01T00:00:00, a missing end means "now" at call time, and both bounds
//! are exclusive.

use chrono::{Datelike, NaiveDateTime};
use plog_core::{Clock, Level, LogEntry, PlogError, Result, SystemClock};
use plog_storage::LogStorage;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Entries bucketed by key, keys in first-inserted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogGroups<'a> {
    groups: Vec<(String, Vec<&'a LogEntry>)>,
    index: HashMap<String, usize>,
}

impl<'a> LogGroups<'a> {
    fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut groups = Self::default();
        for key in keys {
            groups.bucket(key.into());
        }
        groups
    }

    fn bucket(&mut self, key: String) -> &mut Vec<&'a LogEntry> {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, Vec::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }

    pub fn get(&self, key: &str) -> Option<&[&'a LogEntry]> {
        self.index.get(key).map(|&idx| self.groups[idx].1.as_slice())
    }

    /// Keys in first-inserted order
    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a LogEntry])> {
        self.groups
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Read-only query engine over the entries one backend held at construction
pub struct LogReader {
    entries: Vec<LogEntry>,
    clock: Arc<dyn Clock>,
}

impl LogReader {
    /// Load and reconstitute every record from `storage`
    pub fn new(storage: &dyn LogStorage) -> Result<Self> {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: &dyn LogStorage, clock: Arc<dyn Clock>) -> Result<Self> {
        let records = storage.load_all()?;
        let entries = storage.reconstitute(&records)?;
        debug!(backend = storage.name(), count = entries.len(), "log snapshot loaded");
        Ok(Self { entries, clock })
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the window defaults and reject `start > end`
    fn resolve_range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<(NaiveDateTime, NaiveDateTime)> {
        // NaiveDateTime::default() is the Unix epoch
        let start = start.unwrap_or_default();
        let end = end.unwrap_or_else(|| self.clock.now());
        if start > end {
            return Err(PlogError::Validation { start, end });
        }
        Ok((start, end))
    }

    fn window(&self, start: NaiveDateTime, end: NaiveDateTime) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.timestamp > start && entry.timestamp < end)
    }

    /// Entries strictly between `start` and `end`
    pub fn filter_by_date(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<&LogEntry>> {
        let (start, end) = self.resolve_range(start, end)?;
        Ok(self.window(start, end).collect())
    }

    /// Entries whose message contains `text` (case-sensitive)
    pub fn find_by_text(
        &self,
        text: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<&LogEntry>> {
        let (start, end) = self.resolve_range(start, end)?;
        Ok(self
            .window(start, end)
            .filter(|entry| entry.message.contains(text))
            .collect())
    }

    /// Entries whose message matches `pattern` anywhere
    pub fn find_by_regex(
        &self,
        pattern: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<&LogEntry>> {
        let (start, end) = self.resolve_range(start, end)?;
        let re = Regex::new(pattern).map_err(|e| PlogError::InvalidPattern(e.to_string()))?;
        Ok(self
            .window(start, end)
            .filter(|entry| re.is_match(&entry.message))
            .collect())
    }

    /// Bucket by lowercased level; all five keys are always present
    pub fn group_by_level(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<LogGroups<'_>> {
        let (start, end) = self.resolve_range(start, end)?;
        let mut groups = LogGroups::with_keys(Level::ALL.iter().map(Level::group_key));
        for entry in self.window(start, end) {
            let level = Level::parse(&entry.level)
                .ok_or_else(|| PlogError::UnknownLevel(entry.level.clone()))?;
            groups.bucket(level.group_key().to_string()).push(entry);
        }
        Ok(groups)
    }

    /// Bucket by `"{year}-{month}"`, month not zero-padded (`"2021-7"`)
    pub fn group_by_month(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<LogGroups<'_>> {
        let (start, end) = self.resolve_range(start, end)?;
        let mut groups = LogGroups::default();
        for entry in self.window(start, end) {
            let key = format!("{}-{}", entry.timestamp.year(), entry.timestamp.month());
            groups.bucket(key).push(entry);
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plog_core::MockClock;
    use plog_storage::MemoryStorage;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn reader(entries: &[LogEntry]) -> LogReader {
        let storage = MemoryStorage::new();
        for entry in entries {
            storage.persist_one(entry).unwrap();
        }
        let clock = Arc::new(MockClock::with_time(at(2022, 1, 1, 0)));
        LogReader::with_clock(&storage, clock).unwrap()
    }

    fn messages(entries: &[&LogEntry]) -> Vec<String> {
        entries.iter().map(|e| e.message.clone()).collect()
    }

    fn sample() -> Vec<LogEntry> {
        vec![
            LogEntry::new(at(2021, 6, 30, 9), "DEBUG", "Some debug message"),
            LogEntry::new(at(2021, 7, 10, 9), "INFO", "Some info message"),
            LogEntry::new(at(2021, 7, 12, 9), "WARNING", "Some warning message"),
            LogEntry::new(at(2021, 7, 12, 10), "ERROR", "Some error message"),
            LogEntry::new(at(2021, 10, 1, 9), "CRITICAL", "Some critical message"),
        ]
    }

    #[test]
    fn test_reader_snapshot() {
        let reader = reader(&sample());
        assert_eq!(reader.len(), 5);
        assert!(!reader.is_empty());
        assert_eq!(reader.entries(), sample().as_slice());
    }

    #[test]
    fn test_filter_by_date_bounds_are_exclusive() {
        let reader = reader(&sample());
        let found = reader
            .filter_by_date(Some(at(2021, 7, 10, 9)), Some(at(2021, 7, 12, 10)))
            .unwrap();
        assert_eq!(messages(&found), vec!["Some warning message"]);
    }

    #[test]
    fn test_filter_by_date_defaults() {
        let reader = reader(&sample());
        assert_eq!(reader.filter_by_date(None, None).unwrap().len(), 5);

        // end defaults to the clock, which is before the last entry here
        let storage = MemoryStorage::new();
        storage
            .persist_one(&LogEntry::new(at(2030, 1, 1, 0), "INFO", "future"))
            .unwrap();
        let clock = Arc::new(MockClock::with_time(at(2022, 1, 1, 0)));
        let reader = LogReader::with_clock(&storage, clock).unwrap();
        assert!(reader.filter_by_date(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_text() {
        let reader = reader(&sample());
        let found = reader.find_by_text("info message", None, None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Some info message");
        assert_eq!(found[0].level, "INFO");

        assert!(reader.find_by_text("INFO MESSAGE", None, None).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_text_window() {
        let reader = reader(&sample());
        let found = reader
            .find_by_text("message", Some(at(2021, 7, 11, 0)), Some(at(2021, 7, 13, 0)))
            .unwrap();
        assert_eq!(messages(&found), vec!["Some warning message", "Some error message"]);
    }

    #[test]
    fn test_find_by_regex() {
        let reader = reader(&sample());
        let found = reader.find_by_regex("[gr]{1} message", None, None).unwrap();
        assert_eq!(
            messages(&found),
            vec!["Some debug message", "Some warning message", "Some error message"]
        );
        assert!(!messages(&found).contains(&"Some info message".to_string()));

        let anchored = reader.find_by_regex("^Some (info|critical)", None, None).unwrap();
        assert_eq!(messages(&anchored), vec!["Some info message", "Some critical message"]);
    }

    #[test]
    fn test_find_by_regex_invalid_pattern() {
        let reader = reader(&sample());
        let err = reader.find_by_regex("([unclosed", None, None).unwrap_err();
        assert!(matches!(err, PlogError::InvalidPattern(_)));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let reader = reader(&sample());
        let start = Some(at(2021, 7, 10, 16));
        let end = Some(at(2021, 7, 10, 15));

        assert!(matches!(reader.filter_by_date(start, end), Err(PlogError::Validation { .. })));
        assert!(matches!(reader.find_by_text("x", start, end), Err(PlogError::Validation { .. })));
        assert!(matches!(reader.find_by_regex("x", start, end), Err(PlogError::Validation { .. })));
        assert!(matches!(reader.group_by_level(start, end), Err(PlogError::Validation { .. })));
        assert!(matches!(reader.group_by_month(start, end), Err(PlogError::Validation { .. })));
    }

    #[test]
    fn test_start_after_default_end_is_rejected() {
        let reader = reader(&sample());
        let err = reader.find_by_text("x", Some(at(2023, 1, 1, 0)), None).unwrap_err();
        assert!(matches!(err, PlogError::Validation { .. }));
    }

    #[test]
    fn test_group_by_level() {
        let mut entries = sample();
        entries.push(LogEntry::new(at(2021, 7, 20, 9), "info", "lowercase info"));
        let reader = reader(&entries);

        let groups = reader.group_by_level(None, None).unwrap();
        assert_eq!(
            groups.keys(),
            vec!["debug", "info", "warning", "error", "critical"]
        );
        assert_eq!(
            messages(groups.get("info").unwrap()),
            vec!["Some info message", "lowercase info"]
        );
        assert_eq!(groups.get("error").unwrap().len(), 1);
    }

    #[test]
    fn test_group_by_level_keeps_empty_buckets() {
        let reader = reader(&sample());
        let groups = reader
            .group_by_level(Some(at(2021, 7, 11, 0)), Some(at(2021, 7, 13, 0)))
            .unwrap();
        assert_eq!(groups.len(), 5);
        assert!(groups.get("debug").unwrap().is_empty());
        assert!(groups.get("critical").unwrap().is_empty());
        assert_eq!(groups.get("warning").unwrap().len(), 1);
    }

    #[test]
    fn test_group_by_level_unknown_level() {
        let reader = reader(&[LogEntry::new(at(2021, 7, 10, 9), "VERBOSE", "odd")]);
        let err = reader.group_by_level(None, None).unwrap_err();
        assert!(matches!(err, PlogError::UnknownLevel(level) if level == "VERBOSE"));
    }

    #[test]
    fn test_group_by_month() {
        let reader = reader(&sample());
        let groups = reader.group_by_month(None, None).unwrap();

        assert_eq!(groups.keys(), vec!["2021-6", "2021-7", "2021-10"]);
        assert_eq!(
            messages(groups.get("2021-7").unwrap()),
            vec!["Some info message", "Some warning message", "Some error message"]
        );
        assert!(groups.get("2021-07").is_none());
    }

    #[test]
    fn test_group_by_month_empty_window() {
        let reader = reader(&sample());
        let groups = reader
            .group_by_month(Some(at(2020, 1, 1, 0)), Some(at(2020, 2, 1, 0)))
            .unwrap();
        assert!(groups.is_empty());
        assert_eq!(groups.iter().count(), 0);
    }
}
