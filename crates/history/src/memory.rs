//! In-memory history snapshot
//!
//! Holds a fixed set of transactions and answers history queries from it.
//! Can be filled programmatically or loaded from a JSONL export (one
//! transaction per line).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use amlwatch_core::Transaction;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::HistoryError;
use crate::provider::HistoryProvider;

/// Snapshot-backed history provider
pub struct InMemoryHistory {
    transactions: RwLock<Vec<Transaction>>,
    /// Fixed "now" for window queries; wall clock when unset
    as_of: Option<DateTime<Utc>>,
}

impl InMemoryHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(Vec::new()),
            as_of: None,
        }
    }

    /// Create a history holding `transactions`
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
            as_of: None,
        }
    }

    /// Pin the reference time used by [`HistoryProvider::recent_in_window`].
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.as_of = Some(now);
        self
    }

    /// Load a JSONL export. Blank lines are skipped; every other line must
    /// be a valid transaction.
    pub fn from_jsonl(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut transactions = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let tx: Transaction = serde_json::from_str(&line)
                .map_err(|source| HistoryError::Parse { line: line_no, source })?;
            tx.validate()
                .map_err(|source| HistoryError::Invalid { line: line_no, source })?;
            transactions.push(tx);
        }

        tracing::debug!(
            path = %path.as_ref().display(),
            count = transactions.len(),
            "Loaded transaction history"
        );

        Ok(Self::with_transactions(transactions))
    }

    /// Add a transaction to the snapshot
    pub fn insert(&self, tx: Transaction) {
        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
    }

    /// Number of transactions held
    pub fn len(&self) -> usize {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no transaction is held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every held transaction
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn now(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryProvider for InMemoryHistory {
    async fn recent_for_account(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, HistoryError> {
        let transactions = self
            .transactions
            .read()
            .map_err(|_| HistoryError::Unavailable("history lock poisoned".to_string()))?;

        let mut matching: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| tx.involves(account_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn recent_in_window(&self, window: Duration) -> Result<Vec<Transaction>, HistoryError> {
        // A window reaching past the representable range covers everything.
        let cutoff = self
            .now()
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let transactions = self
            .transactions
            .read()
            .map_err(|_| HistoryError::Unavailable("history lock poisoned".to_string()))?;

        Ok(transactions
            .iter()
            .filter(|tx| tx.created_at >= cutoff)
            .cloned()
            .collect())
    }
}
