//! Smurfing: many similar transfers between one pair of accounts
//!
//! Transfers are grouped by ordered `(from, to)` pair. A group is flagged
//! when it is large enough, falls within the time window and its amounts
//! are nearly uniform.

use std::collections::BTreeMap;

use amlwatch_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::SmurfingConfig;
use crate::error::{PatternError, PatternResult};
use crate::stats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmurfingFindings {
    pub confidence: u8,
    pub pattern_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SmurfingDetector {
    config: SmurfingConfig,
}

impl SmurfingDetector {
    pub fn new(config: SmurfingConfig) -> Self {
        Self { config }
    }

    fn is_flagged(&self, group: &[&Transaction]) -> PatternResult<bool> {
        if group.len() < self.config.min_group_size {
            return Ok(false);
        }

        let first = group.iter().map(|tx| tx.created_at).min();
        let last = group.iter().map(|tx| tx.created_at).max();
        let span = match (first, last) {
            (Some(first), Some(last)) => last - first,
            _ => return Ok(false),
        };
        let window = self.config.window().ok_or_else(|| {
            PatternError::analyzer(
                Self::NAME,
                format!("window_hours out of range: {}", self.config.window_hours),
            )
        })?;
        if span > window {
            return Ok(false);
        }

        let amounts: Vec<f64> = group.iter().map(|tx| tx.amount.as_f64()).collect();
        let (Some(mean), Some(variance)) = (stats::mean(&amounts), stats::variance(&amounts)) else {
            return Ok(false);
        };
        let mean = stats::finite(Self::NAME, "group mean", mean)?;
        let variance = stats::finite(Self::NAME, "group variance", variance)?;

        Ok(variance < self.config.variance_ratio * mean)
    }
}

impl Analyzer for SmurfingDetector {
    type Output = SmurfingFindings;
    const NAME: &'static str = "smurfing";

    fn analyze(&self, batch: &[Transaction]) -> PatternResult<SmurfingFindings> {
        let mut groups: BTreeMap<(&str, &str), Vec<&Transaction>> = BTreeMap::new();
        for tx in batch {
            groups
                .entry((tx.from_account_id.as_str(), tx.to_account_id.as_str()))
                .or_default()
                .push(tx);
        }

        let mut pattern_count = 0usize;
        for group in groups.values() {
            if self.is_flagged(group)? {
                pattern_count += 1;
            }
        }

        let confidence = if pattern_count == 0 {
            0
        } else {
            // Every flagged group contributes the same confidence, so the
            // average is that value.
            let total = pattern_count as f64 * f64::from(self.config.group_confidence);
            stats::capped(total / pattern_count as f64)
        };

        Ok(SmurfingFindings {
            confidence,
            pattern_count,
        })
    }
}
