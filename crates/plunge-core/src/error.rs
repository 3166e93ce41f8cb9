//! Core error types for plunge-core.
//!
//! Nothing here ever reaches the timer state machine: invalid transitions are
//! ignored and collaborator failures are logged. These errors cover the
//! configuration layer, goal validation and collaborator reporting.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for plunge-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// External collaborator errors
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

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
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be created
    #[error("Cannot prepare config directory {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value outside the picker range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Failure reported by an external collaborator (health store, shortcuts, ...).
///
/// Only ever logged by the controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{service}: {message}")]
pub struct CollaboratorError {
    pub service: String,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownKey("timer.nope".to_string());
        assert_eq!(err.to_string(), "Unknown configuration key: timer.nope");

        let err = ConfigError::InvalidValue {
            key: "adjustment.haptic_threshold_secs".to_string(),
            message: "expected a number".to_string(),
        };
        assert!(err.to_string().contains("adjustment.haptic_threshold_secs"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::OutOfRange {
            field: "minutes",
            value: 11,
            min: 0,
            max: 10,
        };
        assert_eq!(err.to_string(), "minutes must be between 0 and 10, got 11");
    }

    #[test]
    fn test_core_error_from_collaborator() {
        let core: CoreError = CollaboratorError::new("health", "not authorized").into();
        assert!(matches!(core, CoreError::Collaborator(_)));
        assert_eq!(core.to_string(), "Collaborator error: health: not authorized");
    }
}
