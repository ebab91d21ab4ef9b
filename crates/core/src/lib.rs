//! amlwatch Core - Domain types
//!
//! This crate contains the value types shared by every analyzer:
//! - `Amount`: Non-negative decimal wrapper for transaction amounts
//! - `Currency`: Validated currency codes
//! - `Transaction`: The strict, validated transaction record
//! - `OffHours`: Local-time window shared by time-of-day checks

pub mod amount;
pub mod currency;
pub mod local_time;
pub mod transaction;

pub use amount::{Amount, AmountError};
pub use currency::{Currency, CurrencyError};
pub use local_time::OffHours;
pub use transaction::{validate_batch, Transaction, TransactionError, TransactionType};
