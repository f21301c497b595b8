mod config;
pub mod database;
mod persistence;

pub use config::{Config, NotificationsConfig, PlannerConfig};
pub use database::Database;
pub use persistence::{Persistence, CLOCK_KEY, DURATIONS_KEY, HISTORY_KEY, TASKS_KEY};

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/studyflow[-dev]/` based on STUDYFLOW_ENV.
///
/// Set STUDYFLOW_ENV=dev to use development data directory, or
/// STUDYFLOW_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("STUDYFLOW_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STUDYFLOW_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("studyflow-dev")
            } else {
                base_dir.join("studyflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// String key-value persistence.
pub trait KeyValueStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
