//! Quorum-gated governance for a managed token ledger.
//!
//! Privileged ledger actions (issue, redeem, pause, blacklist, destroying
//! blacklisted funds, ownership transfer) and changes to the voter set itself
//! all go through the same lifecycle: a voter proposes, other voters approve,
//! and the action executes the moment a strict majority of the current voter
//! set has approved.
//!
//! Every executed membership change bumps the registry version. Requests
//! remember the version they were created under and can no longer be
//! approved once it moves on. Invalidation is detected lazily on the next
//! access; nothing sweeps the request table.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod registry;
pub mod request;
pub mod shared;

pub use config::GovernanceConfig;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use event::{EventBus, GovernanceEvent};
pub use ledger::{ApprovalOutcome, LedgerSnapshot, RequestLedger};
pub use registry::{VoterRegistry, MIN_VOTERS};
pub use request::{Request, RequestKind, RequestPayload, RequestStatus};
pub use shared::SharedGovernance;
