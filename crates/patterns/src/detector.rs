//! Pattern detector - runs the four analyzers over one batch
//!
//! The batch is validated once; after that a failing analyzer is logged
//! and contributes its zero output, so a run always produces a result.

use std::sync::Arc;

use amlwatch_core::{validate_batch, Transaction};
use amlwatch_history::HistoryProvider;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::analyzer::Analyzer;
use crate::anomaly::AnomalyDetector;
use crate::config::DetectionConfig;
use crate::error::PatternResult;
use crate::layering::LayeringDetector;
use crate::network::NetworkAnalyzer;
use crate::result::PatternAnalysisResult;
use crate::smurfing::SmurfingDetector;

/// Orchestrates smurfing, layering, network and anomaly analysis
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    smurfing: SmurfingDetector,
    layering: LayeringDetector,
    network: NetworkAnalyzer,
    anomaly: AnomalyDetector,
}

impl PatternDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            smurfing: SmurfingDetector::new(config.smurfing),
            layering: LayeringDetector::new(config.layering),
            network: NetworkAnalyzer::new(config.network),
            anomaly: AnomalyDetector::new(config.anomaly),
        }
    }

    pub fn detect_patterns(&self, batch: &[Transaction]) -> PatternResult<PatternAnalysisResult> {
        self.detect_patterns_at(batch, Utc::now())
    }

    /// Run every analyzer in turn, stamping the result with `now`.
    pub fn detect_patterns_at(
        &self,
        batch: &[Transaction],
        now: DateTime<Utc>,
    ) -> PatternResult<PatternAnalysisResult> {
        validate_batch(batch)?;

        let result = PatternAnalysisResult::from_findings(
            run(&self.smurfing, batch),
            run(&self.layering, batch),
            run(&self.network, batch),
            run(&self.anomaly, batch),
            now,
        );

        tracing::debug!(transactions = batch.len(), clean = result.is_clean(), "Pattern analysis complete");
        Ok(result)
    }

    pub async fn detect_patterns_parallel(
        &self,
        batch: Arc<[Transaction]>,
    ) -> PatternResult<PatternAnalysisResult> {
        self.detect_patterns_parallel_at(batch, Utc::now()).await
    }

    /// Run the analyzers as blocking tasks over a shared batch.
    ///
    /// A panicked task degrades to that analyzer's zero output.
    pub async fn detect_patterns_parallel_at(
        &self,
        batch: Arc<[Transaction]>,
        now: DateTime<Utc>,
    ) -> PatternResult<PatternAnalysisResult> {
        validate_batch(&batch)?;

        let (smurfing, layering, network, anomaly) = tokio::join!(
            join(spawn(self.smurfing.clone(), batch.clone())),
            join(spawn(self.layering.clone(), batch.clone())),
            join(spawn(self.network.clone(), batch.clone())),
            join(spawn(self.anomaly.clone(), batch.clone())),
        );

        let result = PatternAnalysisResult::from_findings(smurfing, layering, network, anomaly, now);
        tracing::debug!(transactions = batch.len(), clean = result.is_clean(), "Pattern analysis complete");
        Ok(result)
    }

    pub async fn analyze_window(
        &self,
        history: &dyn HistoryProvider,
        window: chrono::Duration,
    ) -> PatternResult<PatternAnalysisResult> {
        self.analyze_window_at(history, window, Utc::now()).await
    }

    /// Analyze everything `history` holds for the last `window`, stamping
    /// the result with `now`.
    ///
    /// A provider failure yields the all-zero result.
    pub async fn analyze_window_at(
        &self,
        history: &dyn HistoryProvider,
        window: chrono::Duration,
        now: DateTime<Utc>,
    ) -> PatternResult<PatternAnalysisResult> {
        let batch = match history.recent_in_window(window).await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(
                    window_hours = window.num_hours(),
                    error = %e,
                    "History unavailable, returning empty pattern analysis"
                );
                return Ok(PatternAnalysisResult::empty(now));
            }
        };

        self.detect_patterns_parallel_at(Arc::from(batch), now).await
    }
}

fn run<A: Analyzer>(analyzer: &A, batch: &[Transaction]) -> A::Output {
    match analyzer.analyze(batch) {
        Ok(output) => {
            tracing::debug!(analyzer = A::NAME, ?output, "Analyzer finished");
            output
        }
        Err(e) => {
            tracing::warn!(analyzer = A::NAME, error = %e, "Analyzer failed, using zero output");
            A::Output::default()
        }
    }
}

fn spawn<A: Analyzer>(analyzer: A, batch: Arc<[Transaction]>) -> (&'static str, JoinHandle<A::Output>) {
    (A::NAME, tokio::task::spawn_blocking(move || run(&analyzer, &batch)))
}

async fn join<T: Default>((name, handle): (&'static str, JoinHandle<T>)) -> T {
    match handle.await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(analyzer = name, error = %e, "Analyzer task panicked, using zero output");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatternError;
    use amlwatch_core::TransactionError;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_batch_is_all_zero() {
        let result = PatternDetector::default().detect_patterns_at(&[], noon()).unwrap();
        assert_eq!(result, PatternAnalysisResult::empty(noon()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let batch = vec![
            Transaction::new("A", "B", dec!(1), noon()).unwrap().with_id("T1"),
            Transaction::new("A", "C", dec!(2), noon()).unwrap().with_id("T1"),
        ];
        let err = PatternDetector::default().detect_patterns_at(&batch, noon()).unwrap_err();
        assert!(matches!(err, PatternError::InvalidInput(TransactionError::DuplicateId(_))));
    }

    #[derive(Clone)]
    struct Broken;

    impl Analyzer for Broken {
        type Output = crate::SmurfingFindings;
        const NAME: &'static str = "broken";

        fn analyze(&self, _batch: &[Transaction]) -> PatternResult<Self::Output> {
            Err(PatternError::analyzer(Self::NAME, "statistics overflowed"))
        }
    }

    #[derive(Clone)]
    struct Panicking;

    impl Analyzer for Panicking {
        type Output = crate::AnomalyFindings;
        const NAME: &'static str = "panicking";

        fn analyze(&self, _batch: &[Transaction]) -> PatternResult<Self::Output> {
            panic!("analyzer bug")
        }
    }

    #[test]
    fn test_failed_analyzer_gives_zero_output() {
        assert_eq!(run(&Broken, &[]), crate::SmurfingFindings::default());
    }

    #[tokio::test]
    async fn test_panicked_task_gives_zero_output() {
        let batch: Arc<[Transaction]> = Arc::from(Vec::new());
        let output = join(spawn(Panicking, batch)).await;
        assert_eq!(output, crate::AnomalyFindings::default());
    }
}
