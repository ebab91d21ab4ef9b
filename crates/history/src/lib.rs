//! amlwatch History Providers
//!
//! The detection engine never owns storage. Everything it knows about
//! past transactions comes through [`HistoryProvider`], passed explicitly
//! into each call. [`InMemoryHistory`] serves tests, the CLI and callers
//! that already hold a snapshot.

mod error;
mod memory;
mod provider;

pub use error::HistoryError;
pub use memory::InMemoryHistory;
pub use provider::{HistoryProvider, DEFAULT_ACCOUNT_HISTORY_LIMIT};
