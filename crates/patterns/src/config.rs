//! Detection configuration
//!
//! One section per analyzer. Missing fields fall back to the defaults, so
//! a config file only has to name what it changes.

use amlwatch_core::OffHours;
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, PatternResult};

/// Longest smurfing window accepted (ten years)
pub const MAX_WINDOW_HOURS: i64 = 24 * 366 * 10;

/// Configuration for the pattern detector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub smurfing: SmurfingConfig,

    #[serde(default)]
    pub layering: LayeringConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub anomaly: AnomalyConfig,
}

/// Repeated similar transfers between one pair of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmurfingConfig {
    /// Smallest group of same-pair transfers considered
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,

    /// Maximum span between first and last transfer of a group
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,

    /// Group is uniform when variance < ratio * mean
    #[serde(default = "default_variance_ratio")]
    pub variance_ratio: f64,

    /// Confidence contributed by each flagged group
    #[serde(default = "default_group_confidence")]
    pub group_confidence: u8,
}

/// Fan-out chains through intermediary accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeringConfig {
    /// Distinct destinations a source needs before its chains are traced
    #[serde(default = "default_min_fan_out")]
    pub min_fan_out: usize,

    /// Longest path traced, in nodes
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Multiplier applied to length * branching per chain
    #[serde(default = "default_chain_multiplier")]
    pub chain_multiplier: u32,
}

/// Accounts with unusually many transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Hub when degree > mean + sigma * std
    #[serde(default = "default_sigma")]
    pub hub_sigma: f64,
}

/// Outlying amounts and off-hours activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Anomalous when |amount - mean| > sigma * std
    #[serde(default = "default_sigma")]
    pub amount_sigma: f64,

    #[serde(default)]
    pub off_hours: OffHours,
}

fn default_min_group_size() -> usize {
    3
}

fn default_window_hours() -> i64 {
    24
}

fn default_variance_ratio() -> f64 {
    0.1
}

fn default_group_confidence() -> u8 {
    70
}

fn default_min_fan_out() -> usize {
    2
}

fn default_max_depth() -> usize {
    5
}

fn default_chain_multiplier() -> u32 {
    10
}

fn default_sigma() -> f64 {
    2.0
}

impl Default for SmurfingConfig {
    fn default() -> Self {
        Self {
            min_group_size: default_min_group_size(),
            window_hours: default_window_hours(),
            variance_ratio: default_variance_ratio(),
            group_confidence: default_group_confidence(),
        }
    }
}

impl SmurfingConfig {
    /// Group span limit; `None` when `window_hours` is outside
    /// `1..=MAX_WINDOW_HOURS`
    pub fn window(&self) -> Option<chrono::Duration> {
        if !(1..=MAX_WINDOW_HOURS).contains(&self.window_hours) {
            return None;
        }
        chrono::TimeDelta::try_hours(self.window_hours)
    }
}

impl Default for LayeringConfig {
    fn default() -> Self {
        Self {
            min_fan_out: default_min_fan_out(),
            max_depth: default_max_depth(),
            chain_multiplier: default_chain_multiplier(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hub_sigma: default_sigma(),
        }
    }
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            amount_sigma: default_sigma(),
            off_hours: OffHours::default(),
        }
    }
}

impl DetectionConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> PatternResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PatternResult<()> {
        if self.smurfing.min_group_size < 2 {
            return Err(PatternError::Config(
                "smurfing.min_group_size must be at least 2".to_string(),
            ));
        }
        if self.smurfing.window().is_none() {
            return Err(PatternError::Config(format!(
                "smurfing.window_hours must be within 1..={MAX_WINDOW_HOURS}, got {}",
                self.smurfing.window_hours
            )));
        }
        if self.smurfing.group_confidence > 100 {
            return Err(PatternError::Config(
                "smurfing.group_confidence must be within 0..=100".to_string(),
            ));
        }
        if self.layering.min_fan_out == 0 || self.layering.max_depth == 0 {
            return Err(PatternError::Config(
                "layering.min_fan_out and layering.max_depth must be positive".to_string(),
            ));
        }
        let ratios = [
            self.smurfing.variance_ratio,
            self.network.hub_sigma,
            self.anomaly.amount_sigma,
        ];
        if ratios.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(PatternError::Config(
                "variance ratio and sigma multipliers must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
