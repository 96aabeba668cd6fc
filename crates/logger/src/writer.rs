//! Logger - severity-gated fan-out to storage backends

use plog_core::date::truncate_to_micros;
use plog_core::{Clock, Level, LogEntry, PlogConfig, Result, SystemClock};
use plog_storage::{open_backend, SharedStorage};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Writes log entries to every registered backend, in registration order
pub struct Logger {
    /// Fan-out targets
    backends: Vec<SharedStorage>,

    /// Cutoff: severities below it are dropped
    min_level: Level,

    clock: Arc<dyn Clock>,
}

impl Logger {
    /// Logger with every severity enabled, stamping entries with the local wall clock
    pub fn new(backends: Vec<SharedStorage>) -> Self {
        Self::with_clock(backends, Arc::new(SystemClock))
    }

    pub fn with_clock(backends: Vec<SharedStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backends,
            min_level: Level::Debug,
            clock,
        }
    }

    /// Open every configured backend and apply the configured cutoff
    pub fn from_config(config: &PlogConfig) -> Result<Self> {
        let backends = config
            .backends
            .iter()
            .map(open_backend)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut logger = Self::new(backends);
        logger.min_level = config.logger.min_level;
        Ok(logger)
    }

    pub fn add_backend(&mut self, backend: SharedStorage) {
        self.backends.push(backend);
    }

    pub fn backends(&self) -> &[SharedStorage] {
        &self.backends
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Set the cutoff by name (case-insensitive). An unknown name leaves the
    /// current cutoff in place.
    pub fn set_min_level(&mut self, name: &str) -> Result<()> {
        self.min_level = name.parse()?;
        debug!(min_level = %self.min_level, "log cutoff changed");
        Ok(())
    }

    fn enabled(&self, level: &str) -> bool {
        Level::parse(level).is_some_and(|level| level >= self.min_level)
    }

    /// Log `message` at `level`.
    ///
    /// Nothing is written unless `level` names one of the five severities at or
    /// above the cutoff. The first backend failure aborts the fan-out.
    pub fn log(&self, message: &str, level: &str) -> Result<()> {
        let entry = LogEntry::new(truncate_to_micros(self.clock.now()), level, message);
        if !self.enabled(level) {
            debug!(requested = level, min_level = %self.min_level, "log entry below cutoff dropped");
            return Ok(());
        }

        for backend in &self.backends {
            if let Err(e) = backend.persist_one(&entry) {
                warn!(backend = backend.name(), error = %e, "log fan-out aborted");
                return Err(e.into());
            }
        }
        Ok(())
    }

    pub fn debug(&self, message: &str) -> Result<()> {
        self.log(message, Level::Debug.as_str())
    }

    pub fn info(&self, message: &str) -> Result<()> {
        self.log(message, Level::Info.as_str())
    }

    pub fn warning(&self, message: &str) -> Result<()> {
        self.log(message, Level::Warning.as_str())
    }

    pub fn error(&self, message: &str) -> Result<()> {
        self.log(message, Level::Error.as_str())
    }

    pub fn critical(&self, message: &str) -> Result<()> {
        self.log(message, Level::Critical.as_str())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backends: Vec<&str> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("Logger")
            .field("backends", &backends)
            .field("min_level", &self.min_level)
            .finish()
    }
}
