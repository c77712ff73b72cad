use quorum_token::LedgerError;
use quorum_types::{AccountId, RequestId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("{0} is not a voting account")]
    NotAVoter(AccountId),

    #[error("request {0} not found")]
    UnknownRequest(RequestId),

    #[error("request {0} already completed")]
    AlreadyCompleted(RequestId),

    #[error(
        "request {id} invalidated after voters list change \
         (created at version {created_at_version}, registry at {current_version})"
    )]
    Invalidated {
        id: RequestId,
        created_at_version: u64,
        current_version: u64,
    },

    #[error("request {id} already approved by {voter}")]
    AlreadyApproved { id: RequestId, voter: AccountId },

    #[error("not enough voting accounts will remain: {remaining} < {minimum}")]
    InsufficientVoters { remaining: usize, minimum: usize },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("membership change adds and removes nobody")]
    EmptyMembershipChange,

    #[error("membership change both adds and removes {0}")]
    ConflictingMembershipChange(AccountId),

    #[error("request id {0} already allocated")]
    IdCollision(RequestId),

    #[error("counter overflow")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}
