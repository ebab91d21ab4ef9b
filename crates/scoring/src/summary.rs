//! Aggregate view over a set of assessments

use std::collections::{BTreeMap, HashMap};

use amlwatch_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::assessment::{RiskAssessment, Severity};

/// Accounts listed by [`RiskSummary::top_suspicious_accounts`] by default
pub const TOP_SUSPICIOUS_ACCOUNTS: usize = 5;

/// Number of assessments per severity band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// Totals for a scored batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total: usize,
    pub suspicious: usize,
    pub normal: usize,
    /// Mean score, rounded; 0 for an empty set
    pub average_score: u8,
    pub by_severity: SeverityCounts,
    /// Assessments that used the fallback score
    pub fallbacks: usize,
}

impl RiskSummary {
    pub fn from_assessments(assessments: &[RiskAssessment]) -> Self {
        let mut summary = Self {
            total: assessments.len(),
            ..Self::default()
        };
        if assessments.is_empty() {
            return summary;
        }

        let mut score_sum = 0u64;
        for assessment in assessments {
            score_sum += u64::from(assessment.score.value());
            summary.by_severity.record(assessment.severity);
            if assessment.is_suspicious {
                summary.suspicious += 1;
            }
            if assessment.is_fallback() {
                summary.fallbacks += 1;
            }
        }

        summary.normal = summary.total - summary.suspicious;
        let average = score_sum as f64 / summary.total as f64;
        summary.average_score = average.round().min(100.0) as u8;
        summary
    }
}

/// Sending account with suspicious transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousAccount {
    pub account_id: String,
    pub suspicious_count: usize,
    /// Mean score of its suspicious transactions, rounded
    pub average_score: u8,
}

impl RiskSummary {
    /// Sending accounts with the most suspicious transactions, at most
    /// `limit` of them.
    ///
    /// Assessments are matched to `batch` by transaction id; assessments
    /// without a matching transaction are skipped. Ties are broken by
    /// account id.
    pub fn top_suspicious_accounts(
        batch: &[Transaction],
        assessments: &[RiskAssessment],
        limit: usize,
    ) -> Vec<SuspiciousAccount> {
        let senders: HashMap<&str, &str> = batch
            .iter()
            .map(|tx| (tx.id.as_str(), tx.from_account_id.as_str()))
            .collect();

        let mut by_account: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
        for assessment in assessments.iter().filter(|a| a.is_suspicious) {
            let Some(account) = senders.get(assessment.transaction_id.as_str()) else {
                continue;
            };
            let entry = by_account.entry(*account).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += u64::from(assessment.score.value());
        }

        let mut accounts: Vec<SuspiciousAccount> = by_account
            .into_iter()
            .map(|(account, (count, score_sum))| SuspiciousAccount {
                account_id: account.to_string(),
                suspicious_count: count,
                average_score: (score_sum as f64 / count as f64).round().min(100.0) as u8,
            })
            .collect();
        // Stable sort keeps the account-id order among equal counts.
        accounts.sort_by(|a, b| b.suspicious_count.cmp(&a.suspicious_count));
        accounts.truncate(limit);
        accounts
    }
}
