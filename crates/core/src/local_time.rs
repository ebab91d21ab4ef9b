//! Local-time helpers for time-of-day risk
//!
//! Timestamps are stored in UTC; "late night" and "weekend" are judged in
//! the institution's local time, expressed as a fixed UTC offset.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Off-hours window in local time.
///
/// An hour `h` is off-hours when `h < before_hour` or `h > after_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffHours {
    #[serde(default = "default_before_hour")]
    pub before_hour: u32,

    #[serde(default = "default_after_hour")]
    pub after_hour: u32,

    /// Local offset from UTC, in minutes (e.g. 420 for UTC+7)
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_before_hour() -> u32 {
    6
}

fn default_after_hour() -> u32 {
    22
}

impl Default for OffHours {
    fn default() -> Self {
        Self {
            before_hour: default_before_hour(),
            after_hour: default_after_hour(),
            utc_offset_minutes: 0,
        }
    }
}

impl OffHours {
    /// Local offset; an out-of-range offset falls back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// `timestamp` converted to local time
    pub fn local(&self, timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
        timestamp.with_timezone(&self.offset())
    }

    /// True when the local hour is outside business hours
    pub fn is_off_hours(&self, timestamp: DateTime<Utc>) -> bool {
        let hour = self.local(timestamp).hour();
        hour < self.before_hour || hour > self.after_hour
    }

    /// True when the local day is Saturday or Sunday
    pub fn is_weekend(&self, timestamp: DateTime<Utc>) -> bool {
        matches!(self.local(timestamp).weekday(), Weekday::Sat | Weekday::Sun)
    }
}
