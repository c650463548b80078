//! Error types for the prioritizer crate.

use thiserror::Error;

/// Errors raised while decoding, normalizing or ranking a task batch.
///
/// Only [`PrioritizerError::MalformedField`] and payload errors reject a
/// request; weight corrections, unresolved dependencies and cycles degrade
/// into annotations on otherwise-normal output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrioritizerError {
    // Input errors
    #[error("Task {task}: invalid '{field}': {reason}")]
    MalformedField {
        task: String,
        field: String,
        reason: String,
    },

    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("No tasks provided. Include tasks via ?tasks=[...] or request body.")]
    EmptyBatch,

    #[error("Failed to parse JSON: {reason}")]
    JsonParseError { reason: String },

    // Storage errors
    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl PrioritizerError {
    /// Build a [`PrioritizerError::MalformedField`].
    pub fn malformed(
        task: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            task: task.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedField { .. }
                | Self::InvalidPayload { .. }
                | Self::EmptyBatch
                | Self::JsonParseError { .. }
        )
    }
}

impl From<std::io::Error> for PrioritizerError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PrioritizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for prioritizer operations
pub type PrioritizerResult<T> = Result<T, PrioritizerError>;
