//! Risk scorer
//!
//! Fetches the history a transaction is scored against, bounded by a
//! deadline, and degrades to the fallback score when history is missing.

use std::sync::Arc;

use amlwatch_core::{validate_batch, Transaction};
use amlwatch_history::HistoryProvider;
use chrono::{DateTime, Utc};
use tokio::task::JoinSet;

use crate::assessment::{RiskAssessment, RiskScore};
use crate::config::ScoringConfig;
use crate::error::{ScoringError, ScoringResult};
use crate::factors::{score_transaction, ScoringInputs};

/// Multi-factor transaction risk scorer
///
/// Cheap to clone; clones share the provider and config.
#[derive(Clone)]
pub struct RiskScorer {
    history: Arc<dyn HistoryProvider>,
    config: Arc<ScoringConfig>,
}

impl RiskScorer {
    pub fn new(history: Arc<dyn HistoryProvider>, config: ScoringConfig) -> Self {
        Self {
            history,
            config: Arc::new(config),
        }
    }

    /// Scorer with the default thresholds and weights
    pub fn with_defaults(history: Arc<dyn HistoryProvider>) -> Self {
        Self::new(history, ScoringConfig::default())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a transaction as of the current time.
    pub async fn compute_risk_score(&self, tx: &Transaction) -> ScoringResult<RiskAssessment> {
        self.compute_risk_score_at(tx, Utc::now()).await
    }

    /// Score a transaction as of `now`.
    ///
    /// Only malformed input is returned as an error. History failures and
    /// timeouts produce the fallback assessment.
    pub async fn compute_risk_score_at(
        &self,
        tx: &Transaction,
        now: DateTime<Utc>,
    ) -> ScoringResult<RiskAssessment> {
        tx.validate()?;

        let inputs = match self.fetch_inputs(tx).await {
            Ok(inputs) => inputs,
            Err(e) => {
                if e.is_data_access() {
                    tracing::warn!(
                        transaction_id = %tx.id,
                        error = %e,
                        fallback_score = self.config.fallback_score,
                        "History unavailable, using fallback risk score"
                    );
                } else {
                    tracing::error!(
                        transaction_id = %tx.id,
                        error = %e,
                        fallback_score = self.config.fallback_score,
                        "Scoring config unusable, using fallback risk score"
                    );
                }
                return Ok(RiskAssessment::fallback(
                    tx.id.clone(),
                    RiskScore::new(u32::from(self.config.fallback_score)),
                    e.to_string(),
                    self.config.suspicious_threshold,
                    now,
                ));
            }
        };

        let breakdown = score_transaction(tx, &inputs, now, &self.config);

        tracing::debug!(
            transaction_id = %tx.id,
            score = breakdown.score.value(),
            amount_risk = breakdown.amount_risk,
            frequency_risk = breakdown.frequency_risk,
            pattern_risk = breakdown.pattern_risk,
            time_risk = breakdown.time_risk,
            "Transaction scored"
        );

        Ok(RiskAssessment::scored(
            tx.id.clone(),
            breakdown,
            self.config.suspicious_threshold,
            now,
        ))
    }

    /// Score many transactions, at most `batch_concurrency` at a time.
    ///
    /// Results are in input order. The batch is validated up front, so a
    /// malformed or duplicated transaction fails the whole call.
    pub async fn score_batch(&self, batch: Vec<Transaction>) -> ScoringResult<Vec<RiskAssessment>> {
        self.score_batch_at(batch, Utc::now()).await
    }

    pub async fn score_batch_at(
        &self,
        batch: Vec<Transaction>,
        now: DateTime<Utc>,
    ) -> ScoringResult<Vec<RiskAssessment>> {
        validate_batch(&batch)?;

        let total = batch.len();
        let chunk_size = self.config.batch_concurrency.max(1);
        let mut results: Vec<Option<RiskAssessment>> = vec![None; total];
        let mut pending = batch.into_iter().enumerate().peekable();

        while pending.peek().is_some() {
            let mut tasks = JoinSet::new();
            for (index, tx) in pending.by_ref().take(chunk_size) {
                let scorer = self.clone();
                tasks.spawn(async move { (index, scorer.compute_risk_score_at(&tx, now).await) });
            }

            while let Some(joined) = tasks.join_next().await {
                let (index, assessment) = joined.map_err(|e| {
                    tracing::error!(error = %e, "Scoring task failed");
                    ScoringError::TaskFailed(e.to_string())
                })?;
                results[index] = Some(assessment?);
            }
        }

        let assessments: Vec<RiskAssessment> = results.into_iter().flatten().collect();
        if assessments.len() != total {
            return Err(ScoringError::TaskFailed(format!(
                "{} of {} assessments missing",
                total - assessments.len(),
                total
            )));
        }

        tracing::debug!(count = total, "Batch scored");
        Ok(assessments)
    }

    async fn fetch_inputs(&self, tx: &Transaction) -> ScoringResult<ScoringInputs> {
        let limit = self.config.account_history_limit;
        let window = self.config.recent_window()?;
        let deadline = self.config.history_timeout();

        let fetch = async {
            tokio::join!(
                self.history.recent_for_account(&tx.from_account_id, limit),
                self.history.recent_for_account(&tx.to_account_id, limit),
                self.history.recent_in_window(window),
            )
        };

        let (from_history, to_history, recent_window) = tokio::time::timeout(deadline, fetch)
            .await
            .map_err(|_| ScoringError::Timeout(self.config.history_timeout_ms))?;

        Ok(ScoringInputs {
            from_history: from_history?,
            to_history: to_history?,
            recent_window: recent_window?,
        })
    }
}
