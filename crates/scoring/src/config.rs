//! Scoring configuration
//!
//! Every threshold, weight and deadline used by the scorer lives here so
//! it can be tuned from a JSON file without recompiling. Defaults
//! reproduce the reference scoring model.

use amlwatch_core::OffHours;
use amlwatch_history::DEFAULT_ACCOUNT_HISTORY_LIMIT;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ScoringError, ScoringResult};

/// Longest recent-activity window accepted (ten years)
pub const MAX_WINDOW_HOURS: i64 = 24 * 366 * 10;

/// Configuration for the risk scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    // === Amount tiers ===
    /// Amounts above this add the largest size penalty (+40)
    #[serde(default = "default_very_large_amount")]
    pub very_large_amount: Decimal,

    /// Amounts above this add +25
    #[serde(default = "default_large_amount")]
    pub large_amount: Decimal,

    /// Amounts above this add +10
    #[serde(default = "default_elevated_amount")]
    pub elevated_amount: Decimal,

    /// AmountRisk used when the sending account has no history
    #[serde(default = "default_new_account_risk")]
    pub new_account_risk: u8,

    // === Structuring ===
    /// Currency reporting threshold; the structuring band ends just below it
    #[serde(default = "default_reporting_threshold")]
    pub reporting_threshold: Decimal,

    /// Lower bound of the sub-threshold structuring band
    #[serde(default = "default_structuring_band_floor")]
    pub structuring_band_floor: Decimal,

    /// Unit for round-number detection
    #[serde(default = "default_round_amount_unit")]
    pub round_amount_unit: Decimal,

    // === History ===
    /// Most recent transactions fetched per account
    #[serde(default = "default_account_history_limit")]
    pub account_history_limit: usize,

    /// Size of the recent-activity window (in hours)
    #[serde(default = "default_recent_window_hours")]
    pub recent_window_hours: i64,

    /// Deadline for all history lookups of one scoring call
    #[serde(default = "default_history_timeout_ms")]
    pub history_timeout_ms: u64,

    /// Score returned when history cannot be read
    #[serde(default = "default_fallback_score")]
    pub fallback_score: u8,

    // === Classification ===
    /// Scores at or above this mark the transaction suspicious
    #[serde(default = "default_suspicious_threshold")]
    pub suspicious_threshold: u8,

    // === Time of day ===
    #[serde(default)]
    pub off_hours: OffHours,

    // === Weights ===
    #[serde(default)]
    pub weights: ScoreWeights,

    // === Batch ===
    /// Transactions scored concurrently by `score_batch`
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

/// Weights applied to the four sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub amount: f64,
    pub frequency: f64,
    pub pattern: f64,
    pub time: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            amount: 0.30,
            frequency: 0.25,
            pattern: 0.25,
            time: 0.20,
        }
    }
}

fn default_very_large_amount() -> Decimal {
    Decimal::new(100_000, 0)
}

fn default_large_amount() -> Decimal {
    Decimal::new(50_000, 0)
}

fn default_elevated_amount() -> Decimal {
    Decimal::new(10_000, 0)
}

fn default_new_account_risk() -> u8 {
    70
}

fn default_reporting_threshold() -> Decimal {
    Decimal::new(10_000, 0)
}

fn default_structuring_band_floor() -> Decimal {
    Decimal::new(9_000, 0)
}

fn default_round_amount_unit() -> Decimal {
    Decimal::new(1_000, 0)
}

fn default_account_history_limit() -> usize {
    DEFAULT_ACCOUNT_HISTORY_LIMIT
}

fn default_recent_window_hours() -> i64 {
    24
}

fn default_history_timeout_ms() -> u64 {
    2_000
}

fn default_fallback_score() -> u8 {
    50
}

fn default_suspicious_threshold() -> u8 {
    80
}

fn default_batch_concurrency() -> usize {
    100
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            very_large_amount: default_very_large_amount(),
            large_amount: default_large_amount(),
            elevated_amount: default_elevated_amount(),
            new_account_risk: default_new_account_risk(),
            reporting_threshold: default_reporting_threshold(),
            structuring_band_floor: default_structuring_band_floor(),
            round_amount_unit: default_round_amount_unit(),
            account_history_limit: default_account_history_limit(),
            recent_window_hours: default_recent_window_hours(),
            history_timeout_ms: default_history_timeout_ms(),
            fallback_score: default_fallback_score(),
            suspicious_threshold: default_suspicious_threshold(),
            off_hours: OffHours::default(),
            weights: ScoreWeights::default(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl ScoringConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> ScoringResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the scorer cannot honour
    pub fn validate(&self) -> ScoringResult<()> {
        if self.fallback_score > 100 || self.new_account_risk > 100 {
            return Err(ScoringError::Config(
                "fallback_score and new_account_risk must be within 0..=100".to_string(),
            ));
        }
        if self.structuring_band_floor > self.reporting_threshold {
            return Err(ScoringError::Config(format!(
                "structuring_band_floor {} exceeds reporting_threshold {}",
                self.structuring_band_floor, self.reporting_threshold
            )));
        }
        let w = &self.weights;
        if [w.amount, w.frequency, w.pattern, w.time]
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(ScoringError::Config(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        self.recent_window()?;
        Ok(())
    }

    /// Get history deadline as Duration
    pub fn history_timeout(&self) -> Duration {
        Duration::from_millis(self.history_timeout_ms)
    }

    /// Get recent-activity window as chrono Duration
    pub fn recent_window(&self) -> ScoringResult<chrono::Duration> {
        if !(1..=MAX_WINDOW_HOURS).contains(&self.recent_window_hours) {
            return Err(ScoringError::Config(format!(
                "recent_window_hours must be within 1..={MAX_WINDOW_HOURS}, got {}",
                self.recent_window_hours
            )));
        }
        chrono::TimeDelta::try_hours(self.recent_window_hours).ok_or_else(|| {
            ScoringError::Config(format!(
                "recent_window_hours out of range: {}",
                self.recent_window_hours
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.very_large_amount, Decimal::new(100_000, 0));
        assert_eq!(config.large_amount, Decimal::new(50_000, 0));
        assert_eq!(config.elevated_amount, Decimal::new(10_000, 0));
        assert_eq!(config.new_account_risk, 70);
        assert_eq!(config.reporting_threshold, Decimal::new(10_000, 0));
        assert_eq!(config.structuring_band_floor, Decimal::new(9_000, 0));
        assert_eq!(config.account_history_limit, 100);
        assert_eq!(config.fallback_score, 50);
        assert_eq!(config.suspicious_threshold, 80);
        assert_eq!(config.weights, ScoreWeights::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "reporting_threshold": "15000", "off_hours": { "utc_offset_minutes": 420 } }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.reporting_threshold, Decimal::new(15_000, 0));
        assert_eq!(config.structuring_band_floor, Decimal::new(9_000, 0));
        assert_eq!(config.off_hours.utc_offset_minutes, 420);
        assert_eq!(config.off_hours.before_hour, 6);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut config = ScoringConfig::default();
        config.weights.time = -0.2;
        assert!(matches!(config.validate(), Err(ScoringError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "history_timeout_ms": 250, "fallback_score": 60 }}"#).unwrap();

        let config = ScoringConfig::from_file(file.path()).unwrap();
        assert_eq!(config.history_timeout(), Duration::from_millis(250));
        assert_eq!(config.fallback_score, 60);
        assert_eq!(config.recent_window().unwrap(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_from_file_rejects_out_of_range_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "fallback_score": 150 }}"#).unwrap();

        assert!(matches!(
            ScoringConfig::from_file(file.path()),
            Err(ScoringError::Config(_))
        ));
    }

    #[test]
    fn test_recent_window_bounds() {
        for hours in [0, -24, i64::MAX, 1_000_000_000_000] {
            let config = ScoringConfig {
                recent_window_hours: hours,
                ..ScoringConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ScoringError::Config(_))),
                "hours {hours}"
            );
        }
    }

    #[test]
    fn test_from_file_rejects_oversized_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "recent_window_hours": 1000000000000 }}"#).unwrap();

        assert!(matches!(
            ScoringConfig::from_file(file.path()),
            Err(ScoringError::Config(_))
        ));
    }
}
