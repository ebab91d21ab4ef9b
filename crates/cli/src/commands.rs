//! CLI commands
//!
//! Every command reads transactions from JSON / JSONL files and returns a
//! serializable report; printing is left to the binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use amlwatch_core::Transaction;
use amlwatch_history::InMemoryHistory;
use amlwatch_patterns::{DetectionConfig, PatternAnalysisResult, PatternDetector};
use amlwatch_scoring::{
    RiskAssessment, RiskScorer, RiskSummary, ScoringConfig, SuspiciousAccount,
    TOP_SUSPICIOUS_ACCOUNTS,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Config files and reference time shared by all commands
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub scoring_config: Option<PathBuf>,
    pub detection_config: Option<PathBuf>,
    /// Reference "now"; wall clock when unset
    pub as_of: Option<DateTime<Utc>>,
}

impl Settings {
    fn now(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }

    fn scoring(&self) -> anyhow::Result<ScoringConfig> {
        match &self.scoring_config {
            Some(path) => ScoringConfig::from_file(path)
                .with_context(|| format!("loading scoring config {}", path.display())),
            None => Ok(ScoringConfig::default()),
        }
    }

    fn detection(&self) -> anyhow::Result<DetectionConfig> {
        match &self.detection_config {
            Some(path) => DetectionConfig::from_file(path)
                .with_context(|| format!("loading detection config {}", path.display())),
            None => Ok(DetectionConfig::default()),
        }
    }

    fn history(&self, path: &Path) -> anyhow::Result<InMemoryHistory> {
        let history = InMemoryHistory::from_jsonl(path)
            .with_context(|| format!("loading history {}", path.display()))?;
        Ok(history.as_of(self.now()))
    }
}

/// Scored batch with its aggregate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub summary: RiskSummary,
    pub top_accounts: Vec<SuspiciousAccount>,
    pub assessments: Vec<RiskAssessment>,
}

/// Read a single JSON transaction
pub fn read_transaction(path: &Path) -> anyhow::Result<Transaction> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading transaction {}", path.display()))?;
    let tx: Transaction = serde_json::from_str(&content)
        .with_context(|| format!("parsing transaction {}", path.display()))?;
    Ok(tx)
}

/// Read a JSONL batch
pub fn read_batch(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    let history = InMemoryHistory::from_jsonl(path)
        .with_context(|| format!("loading batch {}", path.display()))?;
    Ok(history.snapshot())
}

/// Score one transaction against a history file
pub async fn score(
    settings: &Settings,
    history_path: &Path,
    transaction_path: &Path,
) -> anyhow::Result<RiskAssessment> {
    let history = settings.history(history_path)?;
    let scorer = RiskScorer::new(Arc::new(history), settings.scoring()?);
    let tx = read_transaction(transaction_path)?;

    let assessment = scorer.compute_risk_score_at(&tx, settings.now()).await?;
    tracing::info!(
        transaction_id = %assessment.transaction_id,
        score = assessment.score.value(),
        severity = %assessment.severity,
        "Transaction scored"
    );
    Ok(assessment)
}

/// Score every transaction of a batch file against a history file
pub async fn score_batch(
    settings: &Settings,
    history_path: &Path,
    batch_path: &Path,
) -> anyhow::Result<BatchReport> {
    let history = settings.history(history_path)?;
    let scorer = RiskScorer::new(Arc::new(history), settings.scoring()?);
    let batch = read_batch(batch_path)?;

    let assessments = scorer.score_batch_at(batch.clone(), settings.now()).await?;
    let summary = RiskSummary::from_assessments(&assessments);
    let top_accounts =
        RiskSummary::top_suspicious_accounts(&batch, &assessments, TOP_SUSPICIOUS_ACCOUNTS);
    tracing::info!(
        total = summary.total,
        suspicious = summary.suspicious,
        fallbacks = summary.fallbacks,
        "Batch scored"
    );
    Ok(BatchReport {
        summary,
        top_accounts,
        assessments,
    })
}

/// Run pattern detection over a batch file
pub async fn patterns(settings: &Settings, batch_path: &Path) -> anyhow::Result<PatternAnalysisResult> {
    let detector = PatternDetector::new(settings.detection()?);
    let batch = read_batch(batch_path)?;

    let result = detector
        .detect_patterns_parallel_at(Arc::from(batch), settings.now())
        .await?;
    Ok(result)
}

/// Run pattern detection over the last `hours` of a history file
pub async fn window(
    settings: &Settings,
    history_path: &Path,
    hours: i64,
) -> anyhow::Result<PatternAnalysisResult> {
    let window = chrono::TimeDelta::try_hours(hours)
        .filter(|window| *window > chrono::TimeDelta::zero())
        .with_context(|| format!("window of {hours} hours is out of range"))?;
    let detector = PatternDetector::new(settings.detection()?);
    let history = settings.history(history_path)?;

    let result = detector
        .analyze_window_at(&history, window, settings.now())
        .await?;
    Ok(result)
}
