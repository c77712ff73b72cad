//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Record what they were asked to do
//! - Can be told to fail on demand
//! - Hold no real state beyond that record
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;

pub use ledger::{LedgerCall, NullLedger};
