//! History provider error types

use thiserror::Error;

/// Failures reading transaction history
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Backing store answered but cannot serve the request
    #[error("History unavailable: {0}")]
    Unavailable(String),

    /// History file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSONL record did not parse as a transaction
    #[error("Malformed transaction on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A parsed record failed validation
    #[error("Invalid transaction on line {line}: {source}")]
    Invalid {
        line: usize,
        #[source]
        source: amlwatch_core::TransactionError,
    },
}
