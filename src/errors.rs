//! Error types for ud_chunker
//!
//! This module defines the error types used throughout the library.
//! Configuration errors (bad rule sets, unknown conditions) are raised
//! before any sentence is processed; per-token data anomalies are handled
//! fail-soft inside the chunker and never surface here.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Main error type for ud_chunker
#[derive(Error, Debug, Clone)]
pub enum ChunkerError {
    /// Sentence input violates the token-id contract (duplicate or
    /// non-contiguous ids). Out-of-range heads are NOT rejected here;
    /// they fail soft during chunking.
    #[error("Invalid sentence: {message}")]
    InvalidSentence { message: String },

    /// A rule descriptor names a condition that is not in the registry.
    /// Raised at rule-set compile time, never at match time.
    #[error("Unknown condition '{name}' in rule '{rule_id}'")]
    UnknownCondition { name: String, rule_id: String },

    /// A rule descriptor is structurally invalid (e.g. empty pattern).
    #[error("Invalid rule '{rule_id}': {message}")]
    InvalidRule { rule_id: String, message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ChunkerError {
    /// Create an invalid sentence error
    pub fn invalid_sentence(message: impl Into<String>) -> Self {
        Self::InvalidSentence {
            message: message.into(),
        }
    }

    /// Create an unknown condition error
    pub fn unknown_condition(name: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self::UnknownCondition {
            name: name.into(),
            rule_id: rule_id.into(),
        }
    }

    /// Create an invalid rule error
    pub fn invalid_rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error is a configuration error (bad rule set or
    /// config values) as opposed to bad sentence data.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCondition { .. } | Self::InvalidRule { .. } | Self::InvalidConfig { .. }
        )
    }
}

impl From<serde_json::Error> for ChunkerError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
