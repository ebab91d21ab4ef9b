//! amlwatch Risk Scoring
//!
//! Scores a single transaction from 0 to 100 using four weighted
//! sub-scores computed against the account's recent history:
//!
//! ```text
//!   Transaction ──► HistoryProvider (from / to / last 24h, bounded by deadline)
//!                        │
//!          ┌─────────────┼─────────────┬─────────────┐
//!          ▼             ▼             ▼             ▼
//!     AmountRisk   FrequencyRisk  PatternRisk    TimeRisk
//!       × 0.30        × 0.25        × 0.25        × 0.20
//!          └─────────────┴──────┬──────┴─────────────┘
//!                               ▼
//!                    RiskScore (rounded, clamped 0..=100)
//! ```
//!
//! A history failure or timeout never fails the call: the documented
//! fallback score is returned and the reason is attached to the result.
//!
//! ## Key Components
//!
//! - [`config::ScoringConfig`] - Thresholds, weights and deadlines
//! - [`factors::score_transaction`] - Pure scoring over fetched history
//! - [`scorer::RiskScorer`] - History fetching, fallback and batch scoring
//! - [`assessment::RiskAssessment`] - Score, severity and suspicion flag
//! - [`summary::RiskSummary`] - Aggregate view over many assessments

pub mod assessment;
pub mod config;
pub mod error;
pub mod factors;
pub mod scorer;
pub mod summary;

pub use assessment::{RiskAssessment, RiskScore, Severity};
pub use config::{ScoreWeights, ScoringConfig};
pub use error::{ScoringError, ScoringResult};
pub use factors::{score_transaction, RiskBreakdown, ScoringInputs};
pub use scorer::RiskScorer;
pub use summary::{RiskSummary, SeverityCounts, SuspiciousAccount, TOP_SUSPICIOUS_ACCOUNTS};
