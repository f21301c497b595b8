//! Core error types for studyflow-core.
//!
//! Most core operations are deliberately infallible (unknown ids are no-ops,
//! bad durations are clamped). The errors below cover the places where a
//! caller genuinely needs to know something went wrong: storage, config
//! files, plan requests and the notification collaborator.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// A value could not be encoded for storage
    #[error("Failed to encode value for '{key}': {message}")]
    Encode { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Plan generation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Goal text is too short to analyze
    #[error("Please enter your study goal (at least {min_chars} characters)")]
    GoalTooShort { min_chars: usize },

    /// Another generation request is still in flight
    #[error("A plan is already being generated")]
    InFlight,

    /// Unrecognized session length label
    #[error("Unknown session length '{0}' (expected short, medium or long)")]
    UnknownSessionLength(String),
}

/// Notification collaborator errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The completion signal could not be played
    #[error("Completion signal failed: {0}")]
    PlaybackFailed(String),

    /// IO errors while writing the signal
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}
