//! Error types for shelfsql

use thiserror::Error;

/// Result type alias for statement generation
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling a filter tree or building a statement.
///
/// Every variant is a caller-input error: generation is a pure function of its
/// input, so none of these are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The expression tree violates the simple / AND / OR one-of shape
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// Operator and value kind disagree (e.g. `IN` with a scalar)
    #[error("Operator {op} cannot be applied to column '{column}': {reason}")]
    OperatorValueMismatch {
        column: String,
        op: &'static str,
        reason: String,
    },

    /// INSERT or UPDATE without any column
    #[error("No columns given for a write to '{table}'")]
    EmptyRow { table: String },

    /// UPDATE without a filter
    #[error("UPDATE on '{table}' requires a non-empty WHERE expression")]
    MissingWhereClause { table: String },

    /// Identifier failed validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Request fields do not fit the requested statement kind
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl QueryError {
    /// Create a malformed expression error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedExpression(message.into())
    }

    /// Create an operator/value mismatch error for a column
    pub fn mismatch(column: impl Into<String>, op: &'static str, reason: impl Into<String>) -> Self {
        Self::OperatorValueMismatch {
            column: column.into(),
            op,
            reason: reason.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Check if this is a malformed expression error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedExpression(_))
    }

    /// Check if this is an operator/value mismatch error
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::OperatorValueMismatch { .. })
    }

    /// Check if this is an empty row error
    pub fn is_empty_row(&self) -> bool {
        matches!(self, Self::EmptyRow { .. })
    }

    /// Check if this is a missing WHERE error
    pub fn is_missing_where(&self) -> bool {
        matches!(self, Self::MissingWhereClause { .. })
    }
}
