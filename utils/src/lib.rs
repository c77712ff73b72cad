//! Shared utilities for the quorum governance workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
