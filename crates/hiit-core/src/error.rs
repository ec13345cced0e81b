//! Core error types for hiit-core.
//!
//! The hierarchy follows the three failure classes of a workout session:
//! configuration errors are fatal to starting a session, read errors are
//! recovered where they happen, and write errors are reported but never stop
//! the in-memory flow.

use std::path::PathBuf;
use thiserror::Error;

use crate::streak::StreakRecord;

/// Rejected workout configuration.
///
/// Raised by [`crate::WorkoutConfig::validate`]; values are never clamped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The exercise list is empty
    #[error("exercise list must contain at least one exercise")]
    NoExercises,

    /// Zero rounds requested
    #[error("total rounds must be at least 1")]
    ZeroRounds,

    /// Any other out-of-domain value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors from the key-value persistence capability.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Reading a key failed
    #[error("failed to read '{key}': {message}")]
    Read { key: String, message: String },

    /// Writing a key failed
    #[error("failed to write '{key}': {message}")]
    Write { key: String, message: String },

    /// Query execution failed
    #[error("query failed: {0}")]
    Query(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Query(err.to_string())
    }
}

/// The streak was computed but could not be persisted.
///
/// Carries the in-memory record so the caller can still show it.
#[derive(Error, Debug)]
#[error("streak record not persisted: {source}")]
pub struct StreakWriteError {
    pub record: StreakRecord,
    #[source]
    pub source: StorageError,
}
