// Plog Logger
//
// Severity-gated writer and in-memory query reader over plog storage backends

pub mod reader;
pub mod writer;

pub use reader::{LogGroups, LogReader};
pub use writer::Logger;

pub use plog_core::{Level, LogEntry, PlogError, Result};
pub use plog_storage::{LogStorage, SharedStorage};
