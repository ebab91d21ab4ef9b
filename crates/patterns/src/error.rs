//! Pattern detection errors

use amlwatch_core::TransactionError;
use thiserror::Error;

/// Errors from pattern detection
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid batch: {0}")]
    InvalidInput(#[from] TransactionError),

    /// An analyzer could not produce a meaningful result
    #[error("{analyzer} analyzer failed: {reason}")]
    Analyzer {
        analyzer: &'static str,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl PatternError {
    pub fn analyzer(analyzer: &'static str, reason: impl Into<String>) -> Self {
        PatternError::Analyzer {
            analyzer,
            reason: reason.into(),
        }
    }
}

/// Result type for pattern detection
pub type PatternResult<T> = Result<T, PatternError>;
