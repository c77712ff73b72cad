//! Ledger-side errors, surfaced unchanged through the governance engine.

use quorum_types::AccountId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("caller {caller} is not the ledger owner")]
    NotOwner { caller: AccountId },

    #[error("account {0} is not blacklisted")]
    NotBlacklisted(AccountId),

    #[error("ledger is already paused")]
    AlreadyPaused,

    #[error("ledger is not paused")]
    NotPaused,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("arithmetic overflow in ledger bookkeeping")]
    Overflow,
}
