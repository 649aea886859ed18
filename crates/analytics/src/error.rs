//! Analytics error types

use thiserror::Error;

use viewstat_query::StoreError;

/// Analytics errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Grouping dimension not supported by the operation
    #[error("invalid grouping dimension: {0}")]
    InvalidDimension(String),

    /// Invalid granularity
    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),

    /// Unknown operator (strict operator policy only)
    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    /// Invalid filter (unknown field, wrong value shape)
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Buckets handed to growth computation out of period order
    #[error("buckets not in ascending period order at index {index}")]
    UnorderedBuckets {
        /// Index of the first bucket not after its predecessor
        index: usize,
    },

    /// Event store error (from viewstat-query)
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AnalyticsError {
    /// Whether the caller's input caused the error
    ///
    /// Client errors map to a 4xx-style response; everything else is a
    /// system fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidDimension(_)
            | Self::InvalidGranularity(_)
            | Self::InvalidOperator(_)
            | Self::InvalidFilter(_) => true,
            Self::Store(e) => e.is_invalid_input(),
            Self::UnorderedBuckets { .. } => false,
        }
    }
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
