//! Error types for the condition builder

use thiserror::Error;

/// Main error type for building, rendering and restoring conditions
#[derive(Error, Debug)]
pub enum ConditionError {
    /// Raised by a `validate` hook while an expression is constructed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A wire record carries neither (or both) `expression` and `condition`
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Index '{index}' not found (condition has {len} slots)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl ConditionError {
    /// Shorthand for validators: `Err(ConditionError::validation("..."))`
    pub fn validation(msg: impl Into<String>) -> Self {
        ConditionError::Validation(msg.into())
    }
}

/// Result type alias for the condition builder
pub type Result<T> = std::result::Result<T, ConditionError>;
