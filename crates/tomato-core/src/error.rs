//! Core error types for tomato-core.
//!
//! Nothing in the session engine is fatal: lifecycle calls never return
//! errors. These types surface from the collaborators (stores, config,
//! sound) and are logged and swallowed by the manager.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomato-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification sound errors
    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),
}

/// Snapshot store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the state file failed
    #[error("State file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Completion sound errors.
#[derive(Error, Debug)]
pub enum SoundError {
    /// Writing to the audio sink failed
    #[error("Audio output failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_into_core_error() {
        let err: CoreError = StoreError::DataDir("no home".into()).into();
        assert_eq!(err.to_string(), "Store error: Data directory unavailable: no home");
    }

    #[test]
    fn config_error_names_key() {
        let err = ConfigError::InvalidValue {
            key: "timer.poll_interval_ms".into(),
            message: "cannot parse 'fast' as number".into(),
        };
        assert!(err.to_string().contains("timer.poll_interval_ms"));
    }
}
