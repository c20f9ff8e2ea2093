//! Error types for the ranking engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Every per-record failure aborts the whole run,
//! since later rating updates depend on all earlier ones.

use chrono::NaiveDate;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("Malformed match record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Match record #{index} dated {date} precedes earlier record dated {previous}")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Input error: {message}")]
    InputError { message: String },
}

impl RankingError {
    /// Index of the offending record, when the error is tied to one
    pub fn record_index(&self) -> Option<usize> {
        match self {
            RankingError::MalformedRecord { index, .. } | RankingError::OutOfOrder { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}
