//! Scoring errors

use amlwatch_core::TransactionError;
use amlwatch_history::HistoryError;
use thiserror::Error;

/// Errors from the risk scorer
///
/// Only `InvalidInput` and `TaskFailed` ever reach the caller of
/// [`crate::RiskScorer`]; history failures are turned into the fallback
/// score and reported inside the assessment.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid transaction: {0}")]
    InvalidInput(#[from] TransactionError),

    #[error("History lookup failed: {0}")]
    History(#[from] HistoryError),

    #[error("History lookup timeout after {0}ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scoring task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ScoringError {
    /// True for failures that are recovered with the fallback score
    pub fn is_data_access(&self) -> bool {
        matches!(self, ScoringError::History(_) | ScoringError::Timeout(_))
    }
}

/// Result type for scoring operations
pub type ScoringResult<T> = Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_data_access() {
        let err = ScoringError::Timeout(2000);
        assert!(err.is_data_access());
        assert!(err.to_string().contains("2000ms"));
    }

    #[test]
    fn test_invalid_input_is_not_data_access() {
        let err = ScoringError::from(TransactionError::MissingId);
        assert!(!err.is_data_access());
        assert!(err.to_string().contains("Transaction id is empty"));
    }
}
