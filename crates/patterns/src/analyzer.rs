//! Common shape of the batch analyzers

use std::fmt::Debug;

use amlwatch_core::Transaction;

use crate::error::PatternResult;

/// A pure analysis over a validated batch.
///
/// `Output::default()` is the zero result used when the analyzer fails.
pub trait Analyzer: Clone + Send + Sync + 'static {
    type Output: Debug + Default + Send + 'static;

    /// Name used in logs and errors
    const NAME: &'static str;

    fn analyze(&self, batch: &[Transaction]) -> PatternResult<Self::Output>;
}
