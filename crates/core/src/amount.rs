//! Amount - Non-negative decimal wrapper for transaction amounts
//!
//! A negative amount is malformed input for every analyzer, so the
//! invariant is enforced once, at construction and deserialization.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when working with amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),
}

/// A non-negative decimal amount.
///
/// # Invariant
/// The inner value is always >= 0. This is enforced by the constructor.
///
/// # Example
/// ```
/// use amlwatch_core::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::new(Decimal::new(9500, 0)).unwrap();
/// assert_eq!(amount.as_f64(), 9500.0);
///
/// // Negative amounts are rejected
/// assert!(Amount::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Amount from a Decimal.
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            Err(AmountError::NegativeAmount(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Get the inner Decimal value
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Lossy conversion for statistics (means, variances, z-scores).
    ///
    /// Every non-negative `Decimal` fits in an `f64` range-wise, so this
    /// only loses precision, never the value.
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::MAX)
    }

    /// True when the amount is an exact multiple of `unit` (e.g. 1000).
    ///
    /// A zero unit never divides anything.
    pub fn is_multiple_of(&self, unit: Decimal) -> bool {
        if unit.is_zero() {
            return false;
        }
        (self.0 % unit).is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(100)).unwrap();
        assert_eq!(amount.value(), dec!(100));
        assert!(!amount.is_zero());
    }

    #[test]
    fn test_amount_negative_rejected() {
        let result = Amount::new(dec!(-100));
        assert!(matches!(result, Err(AmountError::NegativeAmount(_))));
    }

    #[test]
    fn test_multiple_of_thousand() {
        assert!(Amount::new(dec!(9000)).unwrap().is_multiple_of(dec!(1000)));
        assert!(Amount::new(dec!(0)).unwrap().is_multiple_of(dec!(1000)));
        assert!(!Amount::new(dec!(9500)).unwrap().is_multiple_of(dec!(1000)));
        assert!(!Amount::new(dec!(9000.50)).unwrap().is_multiple_of(dec!(1000)));
    }

    #[test]
    fn test_multiple_of_zero_unit() {
        assert!(!Amount::new(dec!(1000)).unwrap().is_multiple_of(Decimal::ZERO));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Amount::new(dec!(123.25)).unwrap().as_f64(), 123.25);
    }

    #[test]
    fn test_negative_rejected_on_deserialize() {
        let parsed: Result<Amount, _> = serde_json::from_str("\"-5\"");
        assert!(parsed.is_err());

        let parsed: Amount = serde_json::from_str("\"5000\"").unwrap();
        assert_eq!(parsed.value(), dec!(5000));
    }
}
