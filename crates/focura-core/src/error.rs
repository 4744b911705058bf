//! Core error types for focura-core.
//!
//! The timer itself never fails; these cover the fallible edges of the
//! library: configuration files, settings validation, the detection client,
//! relay payloads and the mock detection server.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focura-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Detection client errors
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value outside its permitted range
    #[error("'{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Errors from the HTTP detection client.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// Base URL could not be parsed or joined
    #[error("Invalid detection URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport or body decoding failure
    #[error("Detection request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("{endpoint} detection failed: {status} {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
}

/// Errors decoding messages delivered by a real-time relay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Payload was neither a string nor an object with a string `message`
    #[error("Received data is not in expected format: {0}")]
    UnexpectedPayload(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn read_config(path: &std::path::Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn io_errors_convert_into_core_error() {
        let err = read_config(std::path::Path::new("/nonexistent/focura/config.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
        assert!(err.to_string().starts_with("IO error:"));
    }

    #[test]
    fn validation_error_message_names_field() {
        let err: CoreError = ValidationError::OutOfRange {
            field: "session_length_secs".into(),
            value: 10,
            min: 300,
            max: 5400,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Validation error: 'session_length_secs' must be between 300 and 5400, got 10"
        );
    }
}
