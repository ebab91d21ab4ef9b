//! Currency - Validated ISO-style currency codes
//!
//! Transactions arrive from the reporting ledger with free-form codes.
//! Common codes get their own variant; anything else that is well-formed
//! is kept as `Other`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing currencies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("Empty currency code")]
    EmptyCode,

    #[error("Currency code too long (max 10 chars): {0}")]
    TooLong(String),

    #[error("Invalid currency code format: {0}")]
    InvalidFormat(String),
}

/// Currency codes
///
/// # Examples
/// ```
/// use amlwatch_core::Currency;
///
/// let idr: Currency = "idr".parse().unwrap();
/// assert_eq!(idr, Currency::Idr);
/// assert_eq!(Currency::Usd.to_string(), "USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// Indonesian Rupiah
    #[default]
    Idr,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Malaysian Ringgit
    Myr,
    /// Japanese Yen
    Jpy,
    /// British Pound
    Gbp,
    /// Any other well-formed code
    Other(String),
}

impl Currency {
    /// Returns the currency code as a string slice
    pub fn code(&self) -> &str {
        match self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Sgd => "SGD",
            Currency::Myr => "MYR",
            Currency::Jpy => "JPY",
            Currency::Gbp => "GBP",
            Currency::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(CurrencyError::EmptyCode);
        }

        if s.len() > 10 {
            return Err(CurrencyError::TooLong(s));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CurrencyError::InvalidFormat(s));
        }

        Ok(match s.as_str() {
            "IDR" => Currency::Idr,
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            "SGD" => Currency::Sgd,
            "MYR" => Currency::Myr,
            "JPY" => Currency::Jpy,
            "GBP" => Currency::Gbp,
            _ => Currency::Other(s),
        })
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}
