//! History provider trait

use amlwatch_core::Transaction;
use async_trait::async_trait;
use chrono::Duration;

use crate::HistoryError;

/// Most-recent transactions fetched per account when scoring
pub const DEFAULT_ACCOUNT_HISTORY_LIMIT: usize = 100;

/// Read-only source of past transactions.
///
/// Implementations must give each call a consistent view (snapshot or
/// read-committed); the engine issues several reads per scoring call and
/// assumes none of them observes a half-applied write.
///
/// Implementations can be:
/// - InMemoryHistory: a fixed snapshot (tests, CLI, replay)
/// - a database-backed provider owned by the surrounding application
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Up to `limit` most recent transactions (by `created_at`) where
    /// `account_id` is the source or the destination.
    async fn recent_for_account(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, HistoryError>;

    /// Every transaction created within `window` of the provider's notion
    /// of now.
    async fn recent_in_window(&self, window: Duration) -> Result<Vec<Transaction>, HistoryError>;
}
