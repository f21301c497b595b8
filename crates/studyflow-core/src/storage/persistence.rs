//! Typed load/save of application state on top of a [`KeyValueStore`].
//!
//! Reads never fail: a missing or unreadable value degrades to the empty
//! default and logs a warning.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::StorageError;
use crate::history::FocusHistory;
use crate::session::{BehaviorEvent, SessionOrchestrator};
use crate::task::TaskList;
use crate::timer::{ModeDurations, SessionClock};

pub const TASKS_KEY: &str = "tasks";
pub const DURATIONS_KEY: &str = "mode_durations";
pub const HISTORY_KEY: &str = "focus_history";
pub const CLOCK_KEY: &str = "session_clock";

pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn load_tasks(&self) -> TaskList {
        self.load_or_default(TASKS_KEY)
    }

    pub fn save_tasks(&mut self, tasks: &TaskList) -> Result<(), StorageError> {
        self.save(TASKS_KEY, tasks)
    }

    pub fn load_durations(&self) -> ModeDurations {
        self.load_or_default(DURATIONS_KEY)
    }

    pub fn save_durations(&mut self, durations: &ModeDurations) -> Result<(), StorageError> {
        self.save(DURATIONS_KEY, durations)
    }

    pub fn load_history(&self) -> FocusHistory {
        FocusHistory::from_entries(self.load_or_default::<Vec<BehaviorEvent>>(HISTORY_KEY))
    }

    pub fn save_history(&mut self, history: &FocusHistory) -> Result<(), StorageError> {
        self.save(HISTORY_KEY, &history.to_vec())
    }

    /// The clock left behind by the previous run, if any.
    pub fn load_clock(&self) -> Option<SessionClock> {
        self.load_or_default::<Option<SessionClock>>(CLOCK_KEY)
    }

    pub fn save_clock(&mut self, clock: &SessionClock) -> Result<(), StorageError> {
        self.save(CLOCK_KEY, clock)
    }

    /// Write back everything an orchestrator mutates.
    pub fn save_session(&mut self, session: &SessionOrchestrator) -> Result<(), StorageError> {
        self.save_tasks(&session.store().to_list())?;
        self.save_durations(&session.durations())?;
        self.save_history(session.history())?;
        self.save_clock(session.clock())
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.kv_get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "stored value is corrupt, using defaults");
                T::default()
            }),
            Ok(None) => {
                debug!(key, "no stored value");
                T::default()
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value, using defaults");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.kv_set(key, &raw)
    }
}
