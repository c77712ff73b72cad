//! Hashing primitives for the quorum governance workspace.
//!
//! - **Blake2b-256** for request identifiers

pub mod hash;

pub use hash::{blake2b_256_multi, derive_request_id};
