//! Commands against files on disk

use std::io::Write;
use std::path::Path;

use amlwatch_cli::{commands, Settings};
use amlwatch_core::Transaction;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap()
}

fn write_jsonl(dir: &Path, name: &str, txs: &[Transaction]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for tx in txs {
        writeln!(file, "{}", serde_json::to_string(tx).unwrap()).unwrap();
    }
    path
}

fn settings() -> Settings {
    Settings {
        as_of: Some(now()),
        ..Settings::default()
    }
}

fn structuring_history() -> Vec<Transaction> {
    (0..3)
        .map(|i| {
            Transaction::new("ACC-1", "ACC-2", dec!(4000), now() - Duration::hours(3 - i))
                .unwrap()
                .with_id(format!("H{i}"))
        })
        .collect()
}

#[tokio::test]
async fn test_score_command() {
    let dir = TempDir::new().unwrap();
    let history = write_jsonl(dir.path(), "history.jsonl", &structuring_history());

    let tx = Transaction::new("ACC-1", "ACC-2", dec!(4100), now())
        .unwrap()
        .with_id("NEW");
    let tx_path = dir.path().join("tx.json");
    std::fs::write(&tx_path, serde_json::to_string(&tx).unwrap()).unwrap();

    let assessment = commands::score(&settings(), &history, &tx_path).await.unwrap();
    assert_eq!(assessment.transaction_id, "NEW");
    assert!(!assessment.is_fallback());
    let breakdown = assessment.breakdown.unwrap();
    // Known counterparty, in line with history
    assert_eq!(breakdown.amount_risk, 0);
    assert_eq!(breakdown.pattern_risk, 0);
}

#[tokio::test]
async fn test_score_batch_command() {
    let dir = TempDir::new().unwrap();
    let history = write_jsonl(dir.path(), "history.jsonl", &structuring_history());
    let batch = write_jsonl(
        dir.path(),
        "batch.jsonl",
        &[
            Transaction::new("ACC-1", "ACC-2", dec!(4000), now()).unwrap().with_id("B1"),
            Transaction::new("ACC-9", "ACC-8", dec!(9000), now()).unwrap().with_id("B2"),
        ],
    );

    let report = commands::score_batch(&settings(), &history, &batch).await.unwrap();
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.assessments[0].transaction_id, "B1");
    assert_eq!(report.assessments[1].transaction_id, "B2");
    // Each suspicious transaction has its own sender
    assert_eq!(report.top_accounts.len(), report.summary.suspicious);
    for account in &report.top_accounts {
        assert_eq!(account.suspicious_count, 1);
    }
}

#[tokio::test]
async fn test_patterns_and_window_commands() {
    let dir = TempDir::new().unwrap();
    let path = write_jsonl(dir.path(), "batch.jsonl", &structuring_history());

    let result = commands::patterns(&settings(), &path).await.unwrap();
    assert_eq!(result.smurfing_patterns, 1);
    assert_eq!(result.analysis_timestamp, now());

    let result = commands::window(&settings(), &path, 2).await.unwrap();
    // Only the last two transfers fall in the window
    assert_eq!(result.smurfing_patterns, 0);
    assert_eq!(result.analysis_timestamp, now());

    let result = commands::window(&settings(), &path, 24).await.unwrap();
    assert_eq!(result.smurfing_patterns, 1);
    assert_eq!(result.analysis_timestamp, now());
}

#[tokio::test]
async fn test_window_rejects_out_of_range_hours() {
    let dir = TempDir::new().unwrap();
    let path = write_jsonl(dir.path(), "history.jsonl", &structuring_history());

    for hours in [i64::MAX, 0, -5] {
        let err = commands::window(&settings(), &path, hours).await.unwrap_err();
        assert!(format!("{err:#}").contains("out of range"), "hours {hours}");
    }
}

#[tokio::test]
async fn test_missing_file_reports_path() {
    let err = commands::patterns(&settings(), Path::new("/nonexistent/batch.jsonl"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/batch.jsonl"));
}
