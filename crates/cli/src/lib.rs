//! amlwatch CLI library
//!
//! Command implementations shared by the `amlwatch` binary and its tests.

pub mod commands;

pub use commands::{BatchReport, Settings};
