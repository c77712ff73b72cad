//! Errors for malformed primitive values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("account identifier must not be empty")]
    EmptyAccount,

    #[error("invalid account identifier: {0:?}")]
    InvalidAccount(String),
}
