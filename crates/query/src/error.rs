//! Event store error types

/// Errors raised by event stores and predicate construction
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store could not be reached (connection refused, timeout, DNS)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store was reached but the query failed
    #[error("query execution failed: {0}")]
    Execution(String),

    /// Invalid SQL (only SELECT/WITH allowed)
    #[error("invalid SQL: {0}")]
    InvalidSql(String),

    /// Predicate names a field path the event model does not have
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Predicate value does not fit its operator
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    /// Event data could not be decoded
    #[error("invalid event data at line {line}: {message}")]
    InvalidData {
        /// 1-based line number in the source
        line: usize,
        /// Decoder message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether a caller may reasonably retry the same request later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Whether the error was caused by the caller's predicate description
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::UnknownField(_) | Self::InvalidPredicate(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
