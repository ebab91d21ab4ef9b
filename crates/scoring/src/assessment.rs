//! Risk score, severity bands and the per-transaction assessment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

use crate::factors::RiskBreakdown;

/// Composite risk score.
///
/// # Invariant
/// Always within `0..=100`; every constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Clamp an integer score into range
    pub fn new(value: u32) -> Self {
        Self(value.min(100) as u8)
    }

    /// Round a weighted sum half away from zero, then clamp.
    ///
    /// Non-finite input maps to 0.
    pub fn from_weighted(value: f64) -> Self {
        if !value.is_finite() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alert severity band for a risk score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Critical >= 90, High >= 80, Medium >= 60, otherwise Low
    pub fn from_score(score: RiskScore) -> Self {
        match score.value() {
            90..=u8::MAX => Severity::Critical,
            80..=89 => Severity::High,
            60..=79 => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// Outcome of scoring one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub transaction_id: String,
    pub score: RiskScore,
    pub severity: Severity,
    pub is_suspicious: bool,
    /// Sub-scores; absent when the fallback score was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<RiskBreakdown>,
    /// Why the fallback score was used, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    /// Assessment computed from history
    pub fn scored(
        transaction_id: impl Into<String>,
        breakdown: RiskBreakdown,
        suspicious_threshold: u8,
        assessed_at: DateTime<Utc>,
    ) -> Self {
        let score = breakdown.score;
        Self {
            transaction_id: transaction_id.into(),
            score,
            severity: Severity::from_score(score),
            is_suspicious: score.value() >= suspicious_threshold,
            breakdown: Some(breakdown),
            fallback_reason: None,
            assessed_at,
        }
    }

    /// Assessment carrying the fallback score
    pub fn fallback(
        transaction_id: impl Into<String>,
        score: RiskScore,
        reason: impl Into<String>,
        suspicious_threshold: u8,
        assessed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            score,
            severity: Severity::from_score(score),
            is_suspicious: score.value() >= suspicious_threshold,
            breakdown: None,
            fallback_reason: Some(reason.into()),
            assessed_at,
        }
    }

    /// True when history was unavailable and the fallback score was used
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}
