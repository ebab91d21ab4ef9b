//! Statistical anomalies: outlying amounts and off-hours activity

use std::collections::BTreeSet;

use amlwatch_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::AnomalyConfig;
use crate::error::PatternResult;
use crate::stats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFindings {
    pub score: u8,
    pub anomalous_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// Ids of anomalous transactions; a transaction that is both an amount
    /// outlier and off-hours appears once.
    pub fn anomalous_ids<'b>(&self, batch: &'b [Transaction]) -> PatternResult<BTreeSet<&'b str>> {
        let amounts: Vec<f64> = batch.iter().map(|tx| tx.amount.as_f64()).collect();
        let (Some(mean), Some(std)) = (stats::mean(&amounts), stats::std_dev(&amounts)) else {
            return Ok(BTreeSet::new());
        };
        let mean = stats::finite(Self::NAME, "amount mean", mean)?;
        let std = stats::finite(Self::NAME, "amount deviation", std)?;
        let limit = self.config.amount_sigma * std;

        let mut ids = BTreeSet::new();
        for (tx, amount) in batch.iter().zip(&amounts) {
            let outlier = (amount - mean).abs() > limit;
            if outlier || self.config.off_hours.is_off_hours(tx.created_at) {
                ids.insert(tx.id.as_str());
            }
        }
        Ok(ids)
    }
}

impl Analyzer for AnomalyDetector {
    type Output = AnomalyFindings;
    const NAME: &'static str = "anomaly";

    fn analyze(&self, batch: &[Transaction]) -> PatternResult<AnomalyFindings> {
        let anomalous_count = self.anomalous_ids(batch)?.len();

        Ok(AnomalyFindings {
            score: stats::percentage(anomalous_count, batch.len()),
            anomalous_count,
        })
    }
}
