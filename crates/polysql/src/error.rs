//! Error types for polysql

use thiserror::Error;

/// Result type alias for polysql operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for building and compiling statements
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Builder state cannot produce the requested statement
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// Driver name or dialect feature without a compile strategy
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// Bad caller input (join type, order direction, ...)
    #[error("Validation error: {0}")]
    Validation(String),
}

impl QueryError {
    /// Create an invalid statement error
    pub fn invalid_statement(message: impl Into<String>) -> Self {
        Self::InvalidStatement(message.into())
    }

    /// Create an unsupported dialect error
    pub fn unsupported_dialect(message: impl Into<String>) -> Self {
        Self::UnsupportedDialect(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is an invalid statement error
    pub fn is_invalid_statement(&self) -> bool {
        matches!(self, Self::InvalidStatement(_))
    }

    /// Check if this is an unsupported dialect error
    pub fn is_unsupported_dialect(&self) -> bool {
        matches!(self, Self::UnsupportedDialect(_))
    }
}
