//! Wall-clock source for log timestamps and query defaults

use chrono::{Duration, Local, NaiveDateTime};
use std::sync::RwLock;

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock for tests
#[derive(Debug)]
pub struct MockClock {
    now: RwLock<NaiveDateTime>,
}

impl Clock for MockClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.read() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl MockClock {
    pub fn with_time(time: NaiveDateTime) -> Self {
        Self {
            now: RwLock::new(time),
        }
    }

    pub fn advance(&self, duration: Duration) {
        if let Ok(mut now) = self.now.write() {
            *now += duration;
        }
    }

    pub fn set_time(&self, time: NaiveDateTime) {
        if let Ok(mut now) = self.now.write() {
            *now = time;
        }
    }
}
