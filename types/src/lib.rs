//! Fundamental types for the quorum governance workspace.
//!
//! This crate defines the types shared across every other crate:
//! account identifiers, token amounts and request identifiers.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;

pub use address::AccountId;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use hash::RequestId;
