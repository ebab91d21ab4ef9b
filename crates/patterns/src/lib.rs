//! amlwatch Pattern Detection
//!
//! Batch analysis of a window of transactions for laundering shapes:
//!
//! ```text
//!                    batch (e.g. last 24h)
//!                            │
//!      ┌──────────────┬──────┴───────┬──────────────┐
//!      ▼              ▼              ▼              ▼
//!  Smurfing       Layering        Network        Anomaly
//!  (pair groups)  (fan-out DFS)   (degree hubs)  (σ / off-hours)
//!      └──────────────┴──────┬───────┴──────────────┘
//!                            ▼
//!                  PatternAnalysisResult
//! ```
//!
//! Analyzers are pure over an immutable batch. A failing analyzer
//! contributes zeros; it never fails the run.
//!
//! ## Key Components
//!
//! - [`config::DetectionConfig`] - Per-analyzer thresholds
//! - [`graph::TransactionGraph`] - Account graph built per run
//! - [`detector::PatternDetector`] - Orchestrator (sequential or parallel)
//! - [`result::PatternAnalysisResult`] - Flat result record

pub mod analyzer;
pub mod anomaly;
pub mod config;
pub mod detector;
pub mod error;
pub mod graph;
pub mod layering;
pub mod network;
pub mod result;
pub mod smurfing;
mod stats;

pub use analyzer::Analyzer;
pub use anomaly::{AnomalyDetector, AnomalyFindings};
pub use config::{AnomalyConfig, DetectionConfig, LayeringConfig, NetworkConfig, SmurfingConfig};
pub use detector::PatternDetector;
pub use error::{PatternError, PatternResult};
pub use graph::{EdgeStats, TransactionGraph};
pub use layering::{LayeringChain, LayeringDetector, LayeringFindings};
pub use network::{NetworkAnalyzer, NetworkFindings};
pub use result::PatternAnalysisResult;
pub use smurfing::{SmurfingDetector, SmurfingFindings};
