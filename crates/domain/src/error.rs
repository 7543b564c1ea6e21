//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A body field path could not be parsed.
    #[error("invalid field path '{path}': {reason}")]
    InvalidFieldPath {
        /// The offending path as written.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A variable name is empty or malformed.
    #[error("invalid variable name: {0}")]
    InvalidVariableName(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
