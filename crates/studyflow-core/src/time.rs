//! Wall-clock access for the orchestrator.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

pub trait TimeSource {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualTime {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualTime {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + Duration::seconds(secs));
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
