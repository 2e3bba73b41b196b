//! Core error types for pomotodo-core.
//!
//! The timer state machines never fail: bad duration input is clamped and
//! completion side effects degrade silently. Errors here cover the ambient
//! pieces around them (configuration, the to-do record store, input parsing).

use std::path::PathBuf;
use thiserror::Error;

/// Umbrella error for callers that touch more than one subsystem.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No record with this id
    #[error("Record not found: {id}")]
    NotFound { id: String },

    /// The store refused the operation (used by remote or fake stores)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Unrecognised session type name
    #[error("Unknown session type '{0}' (expected work, short-break or long-break)")]
    UnknownSessionType(String),

    /// Unrecognised countdown field name
    #[error("Unknown countdown field '{0}' (expected hours, minutes or seconds)")]
    UnknownCountdownField(String),
}

/// Errors raised by completion side effects (notification, audio cue).
///
/// These never reach the timer state machines; `CompletionSignal` logs
/// and drops them.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Audio playback failed: {0}")]
    Playback(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = CoreError::from(StoreError::NotFound { id: "abc".into() });
        assert_eq!(err.to_string(), "Store error: Record not found: abc");
    }

    #[test]
    fn unknown_session_type_lists_the_choices() {
        let err = ValidationError::UnknownSessionType("lunch".into());
        assert!(err.to_string().contains("short-break"));
    }

    #[test]
    fn rusqlite_errors_map_to_query_failed() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }
}
