//! Error types for sqlforge

use thiserror::Error;

/// Result type alias for sqlforge operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for SQL construction and introspection
#[derive(Debug, Error)]
pub enum SqlError {
    /// Requested engine has no registered implementation.
    ///
    /// Raised synchronously at factory boundaries (builder, type converter,
    /// metadata service), never deferred to first use.
    #[error("Not implemented for engine: {0}")]
    NotImplemented(String),

    /// A constructor or operation received a degenerate argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Statement execution failed in the external executor.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row value decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SqlError {
    /// Create a not-implemented error for an engine identifier
    pub fn not_implemented(engine: impl Into<String>) -> Self {
        Self::NotImplemented(engine.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not-implemented error
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
