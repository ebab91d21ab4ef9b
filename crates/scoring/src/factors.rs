//! Risk factors
//!
//! Pure functions over a transaction and the history already fetched for
//! it. Each sub-score is clamped to `0..=100` before weighting; the
//! triggered rule codes are collected for explanation.

use amlwatch_core::{OffHours, Transaction};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::RiskScore;
use crate::config::ScoringConfig;

/// History fetched for one scoring call
#[derive(Debug, Clone, Default)]
pub struct ScoringInputs {
    /// Recent transactions touching the sending account
    pub from_history: Vec<Transaction>,
    /// Recent transactions touching the receiving account.
    ///
    /// Fetched as part of the scoring contract; no current factor reads it.
    pub to_history: Vec<Transaction>,
    /// Every transaction in the recent-activity window
    pub recent_window: Vec<Transaction>,
}

/// Sub-scores and final score of one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    pub amount_risk: u8,
    pub frequency_risk: u8,
    pub pattern_risk: u8,
    pub time_risk: u8,
    pub score: RiskScore,
    pub rules_triggered: Vec<String>,
}

/// Score `tx` against `inputs` as of `now`.
pub fn score_transaction(
    tx: &Transaction,
    inputs: &ScoringInputs,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> RiskBreakdown {
    let mut rules = Vec::new();

    let amount_risk = amount_risk(tx, &inputs.from_history, config, &mut rules);
    let frequency_risk = frequency_risk(tx, &inputs.recent_window, now, &mut rules);
    let pattern_risk = pattern_risk(tx, &inputs.from_history, config, &mut rules);
    let time_risk = time_risk(tx.timestamp, &config.off_hours, &mut rules);

    let w = &config.weights;
    let weighted = f64::from(amount_risk) * w.amount
        + f64::from(frequency_risk) * w.frequency
        + f64::from(pattern_risk) * w.pattern
        + f64::from(time_risk) * w.time;

    RiskBreakdown {
        amount_risk,
        frequency_risk,
        pattern_risk,
        time_risk,
        score: RiskScore::from_weighted(weighted),
        rules_triggered: rules,
    }
}

fn clamp(risk: u32) -> u8 {
    risk.min(100) as u8
}

/// `|value - base| / base`, with a zero base treated as infinitely far
/// from any non-zero value.
fn relative_deviation(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        if value == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (value - base).abs() / base
    }
}

/// Size of the amount and its distance from the sender's usual amounts
pub fn amount_risk(
    tx: &Transaction,
    from_history: &[Transaction],
    config: &ScoringConfig,
    rules: &mut Vec<String>,
) -> u8 {
    if from_history.is_empty() {
        rules.push("NEW_ACCOUNT".to_string());
        return config.new_account_risk.min(100);
    }

    let amount = tx.amount.value();
    let value = tx.amount.as_f64();
    let count = from_history.len() as f64;
    let average = from_history.iter().map(|h| h.amount.as_f64()).sum::<f64>() / count;
    let maximum = from_history
        .iter()
        .map(|h| h.amount.as_f64())
        .fold(f64::MIN, f64::max);

    let mut risk = 0u32;

    if amount > config.very_large_amount {
        rules.push("VERY_LARGE_AMOUNT".to_string());
        risk += 40;
    } else if amount > config.large_amount {
        rules.push("LARGE_AMOUNT".to_string());
        risk += 25;
    } else if amount > config.elevated_amount {
        rules.push("ELEVATED_AMOUNT".to_string());
        risk += 10;
    }

    let from_average = relative_deviation(value, average);
    if from_average > 5.0 {
        rules.push("EXTREME_DEVIATION_FROM_AVERAGE".to_string());
        risk += 30;
    } else if from_average > 2.0 {
        rules.push("DEVIATION_FROM_AVERAGE".to_string());
        risk += 15;
    }

    let above_maximum = if value > maximum {
        relative_deviation(value, maximum)
    } else {
        0.0
    };
    if above_maximum > 2.0 {
        rules.push("EXCEEDS_HISTORICAL_MAXIMUM".to_string());
        risk += 25;
    }

    clamp(risk)
}

/// Activity of the sending account in the last hour and day
pub fn frequency_risk(
    tx: &Transaction,
    recent_window: &[Transaction],
    now: DateTime<Utc>,
    rules: &mut Vec<String>,
) -> u8 {
    let hour_ago = now - Duration::hours(1);
    let day_ago = now - Duration::hours(24);

    let mut hourly = 0usize;
    let mut daily = 0usize;
    for other in recent_window
        .iter()
        .filter(|other| other.involves(&tx.from_account_id))
    {
        if other.created_at > hour_ago {
            hourly += 1;
        }
        if other.created_at >= day_ago {
            daily += 1;
        }
    }

    let mut risk = 0u32;

    if hourly > 10 {
        rules.push("HOURLY_VELOCITY_HIGH".to_string());
        risk += 50;
    } else if hourly > 5 {
        rules.push("HOURLY_VELOCITY".to_string());
        risk += 25;
    }

    if daily > 50 {
        rules.push("DAILY_VELOCITY_HIGH".to_string());
        risk += 40;
    } else if daily > 20 {
        rules.push("DAILY_VELOCITY".to_string());
        risk += 20;
    }

    clamp(risk)
}

/// Structuring shapes and relationship signals
pub fn pattern_risk(
    tx: &Transaction,
    from_history: &[Transaction],
    config: &ScoringConfig,
    rules: &mut Vec<String>,
) -> u8 {
    let amount = tx.amount.value();
    let mut risk = 0u32;

    // Round-number and sub-threshold bands overlap (e.g. 9000); both apply.
    if tx.amount.is_multiple_of(config.round_amount_unit) && amount < config.reporting_threshold {
        rules.push("ROUND_AMOUNT".to_string());
        risk += 20;
    }

    if amount >= config.structuring_band_floor && amount < config.reporting_threshold {
        rules.push("BELOW_REPORTING_THRESHOLD".to_string());
        risk += 30;
    }

    let back_and_forth = from_history.iter().any(|h| {
        h.to_account_id == tx.to_account_id
            && (h.created_at - tx.timestamp).abs() < Duration::hours(1)
    });
    if back_and_forth {
        rules.push("RAPID_REPEAT_TRANSFER".to_string());
        risk += 35;
    }

    let known_counterparty = from_history
        .iter()
        .any(|h| h.to_account_id == tx.to_account_id || h.from_account_id == tx.to_account_id);
    if !known_counterparty {
        rules.push("NEW_RELATIONSHIP".to_string());
        risk += 15;
    }

    clamp(risk)
}

/// Late-night and weekend activity in local time
pub fn time_risk(timestamp: DateTime<Utc>, off_hours: &OffHours, rules: &mut Vec<String>) -> u8 {
    let mut risk = 0u32;

    if off_hours.is_off_hours(timestamp) {
        rules.push("OFF_HOURS".to_string());
        risk += 15;
    }

    if off_hours.is_weekend(timestamp) {
        rules.push("WEEKEND".to_string());
        risk += 10;
    }

    clamp(risk)
}
