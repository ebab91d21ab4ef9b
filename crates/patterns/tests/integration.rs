//! End-to-end detection scenarios

use std::sync::Arc;

use amlwatch_core::Transaction;
use amlwatch_history::{HistoryError, HistoryProvider, InMemoryHistory};
use amlwatch_patterns::{DetectionConfig, LayeringConfig, PatternAnalysisResult, PatternDetector, PatternError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn monday(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
}

fn tx(id: &str, from: &str, to: &str, amount: Decimal, at: DateTime<Utc>) -> Transaction {
    Transaction::new(from, to, amount, at).unwrap().with_id(id)
}

#[test]
fn test_structuring_between_two_accounts() {
    let batch: Vec<Transaction> = (0..5)
        .map(|i| tx(&format!("S{i}"), "ACC-1", "ACC-2", dec!(9500) + Decimal::from(i), monday(9) + Duration::hours(i)))
        .collect();

    let result = PatternDetector::default().detect_patterns_at(&batch, monday(18)).unwrap();

    assert_eq!(result.smurfing_patterns, 1);
    assert_eq!(result.smurfing_confidence, 70);
    assert_eq!(result.layering_chains, 0);
    assert_eq!(result.anomalous_transactions, 0);
    assert_eq!(result.analysis_timestamp, monday(18));
}

#[test]
fn test_layering_chain() {
    let batch = vec![
        tx("L1", "A", "B", dec!(50000), monday(10)),
        tx("L2", "B", "C", dec!(49000), monday(11)),
    ];

    // Plain hop: no account fans out
    let result = PatternDetector::default().detect_patterns_at(&batch, monday(12)).unwrap();
    assert_eq!(result.layering_chains, 0);

    let detector = PatternDetector::new(DetectionConfig {
        layering: LayeringConfig {
            min_fan_out: 1,
            ..LayeringConfig::default()
        },
        ..DetectionConfig::default()
    });
    let result = detector.detect_patterns_at(&batch, monday(12)).unwrap();
    assert_eq!(result.layering_chains, 1);
    assert!(result.layering_complexity > 0);

    // Same hop behind a fan-out under the default config
    let mut fanned = batch.clone();
    fanned.push(tx("L3", "A", "D", dec!(1000), monday(10)));
    let result = PatternDetector::default().detect_patterns_at(&fanned, monday(12)).unwrap();
    assert_eq!(result.layering_chains, 1);
    assert_eq!(result.layering_complexity, 20);
}

#[test]
fn test_single_outlier_amount() {
    let mut batch: Vec<Transaction> = (0..100)
        .map(|i| tx(&format!("N{i}"), &format!("P{i}"), "SHOP", dec!(1000), monday(9) + Duration::minutes(i)))
        .collect();
    batch.push(tx("OUT", "P0", "SHOP", dec!(50000), monday(14)));

    let result = PatternDetector::default().detect_patterns_at(&batch, monday(18)).unwrap();
    assert_eq!(result.anomalous_transactions, 1);
    assert_eq!(result.anomaly_score, 1);
}

#[test]
fn test_star_network_hub() {
    let batch: Vec<Transaction> = (0..10)
        .map(|i| tx(&format!("H{i}"), "HUB", &format!("LEAF-{i}"), dec!(700), monday(10)))
        .collect();

    let result = PatternDetector::default().detect_patterns_at(&batch, monday(12)).unwrap();
    assert_eq!(result.suspicious_nodes, 1);
    assert_eq!(result.network_hub_score, 9);
}

#[test]
fn test_empty_batch() {
    let result = PatternDetector::default().detect_patterns_at(&[], monday(12)).unwrap();
    assert_eq!(result, PatternAnalysisResult::empty(monday(12)));
    assert!(result.is_clean());
}

#[test]
fn test_invalid_batch() {
    let batch = vec![tx("", "A", "B", dec!(10), monday(12))];
    let err = PatternDetector::default().detect_patterns_at(&batch, monday(12)).unwrap_err();
    assert!(matches!(err, PatternError::InvalidInput(_)));
}

#[tokio::test]
async fn test_parallel_matches_sequential() {
    let mut batch: Vec<Transaction> = (0..10)
        .map(|i| tx(&format!("H{i}"), "HUB", &format!("LEAF-{i}"), dec!(700), monday(10)))
        .collect();
    batch.extend((0..4).map(|i| tx(&format!("S{i}"), "ACC-1", "ACC-2", dec!(9800), monday(1) + Duration::hours(i))));
    batch.push(tx("X1", "LEAF-1", "ACC-9", dec!(120000), monday(23)));

    let detector = PatternDetector::default();
    let sequential = detector.detect_patterns_at(&batch, monday(23)).unwrap();
    let parallel = detector
        .detect_patterns_parallel_at(Arc::from(batch), monday(23))
        .await
        .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.smurfing_patterns, 1);
    assert!(sequential.anomalous_transactions >= 4);
}

struct OfflineHistory;

#[async_trait]
impl HistoryProvider for OfflineHistory {
    async fn recent_for_account(&self, _account_id: &str, _limit: usize) -> Result<Vec<Transaction>, HistoryError> {
        Err(HistoryError::Unavailable("ledger offline".to_string()))
    }

    async fn recent_in_window(&self, _window: Duration) -> Result<Vec<Transaction>, HistoryError> {
        Err(HistoryError::Unavailable("ledger offline".to_string()))
    }
}

#[tokio::test]
async fn test_window_analysis() {
    let now = monday(18);
    let mut history: Vec<Transaction> = (0..3)
        .map(|i| tx(&format!("S{i}"), "ACC-1", "ACC-2", dec!(4000), now - Duration::hours(3 - i)))
        .collect();
    // Outside the window
    history.push(tx("OLD", "ACC-7", "ACC-8", dec!(10), now - Duration::days(3)));
    let provider = InMemoryHistory::with_transactions(history).as_of(now);

    let result = PatternDetector::default()
        .analyze_window_at(&provider, Duration::hours(24), now)
        .await
        .unwrap();
    assert_eq!(result.smurfing_patterns, 1);
    assert_eq!(result.analysis_timestamp, now);
    assert_eq!(result.anomalous_transactions, 0);
}

#[tokio::test]
async fn test_window_analysis_with_offline_history() {
    let result = PatternDetector::default()
        .analyze_window_at(&OfflineHistory, Duration::hours(24), monday(18))
        .await
        .unwrap();
    assert!(result.is_clean());
    assert_eq!(result, PatternAnalysisResult::empty(monday(18)));
    assert_eq!(result.smurfing_confidence, 0);
}
