//! Governance requests and their lifecycle states.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::GovernanceError;
use quorum_types::{AccountId, RequestId, TokenAmount};
use serde::{Deserialize, Serialize};

/// The privileged action a request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Issue,
    Redeem,
    Pause,
    Unpause,
    Blacklist,
    Unblacklist,
    DestroyBlackFunds,
    OwnerChange,
    MembershipChange,
}

impl RequestKind {
    pub const ALL: [RequestKind; 9] = [
        Self::Issue,
        Self::Redeem,
        Self::Pause,
        Self::Unpause,
        Self::Blacklist,
        Self::Unblacklist,
        Self::DestroyBlackFunds,
        Self::OwnerChange,
        Self::MembershipChange,
    ];

    /// Stable tag used in identifiers, logs and scripts.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Redeem => "redeem",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::Blacklist => "blacklist",
            Self::Unblacklist => "unblacklist",
            Self::DestroyBlackFunds => "destroy_black_funds",
            Self::OwnerChange => "owner_change",
            Self::MembershipChange => "membership_change",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kind-specific data carried by a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPayload {
    Issue {
        amount: TokenAmount,
        recipient: AccountId,
    },
    Redeem {
        amount: TokenAmount,
    },
    Pause,
    Unpause,
    Blacklist {
        account: AccountId,
    },
    Unblacklist {
        account: AccountId,
    },
    DestroyBlackFunds {
        account: AccountId,
    },
    OwnerChange {
        new_owner: AccountId,
    },
    MembershipChange {
        add: BTreeSet<AccountId>,
        remove: BTreeSet<AccountId>,
    },
}

impl RequestPayload {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Issue { .. } => RequestKind::Issue,
            Self::Redeem { .. } => RequestKind::Redeem,
            Self::Pause => RequestKind::Pause,
            Self::Unpause => RequestKind::Unpause,
            Self::Blacklist { .. } => RequestKind::Blacklist,
            Self::Unblacklist { .. } => RequestKind::Unblacklist,
            Self::DestroyBlackFunds { .. } => RequestKind::DestroyBlackFunds,
            Self::OwnerChange { .. } => RequestKind::OwnerChange,
            Self::MembershipChange { .. } => RequestKind::MembershipChange,
        }
    }

    /// Proposal-time checks. The resulting voter count of a membership
    /// change is checked on execution, not here.
    pub(crate) fn validate(&self) -> Result<(), GovernanceError> {
        match self {
            Self::Issue { amount, .. } | Self::Redeem { amount } if amount.is_zero() => {
                Err(GovernanceError::ZeroAmount)
            }
            Self::MembershipChange { add, remove } => {
                if add.is_empty() && remove.is_empty() {
                    return Err(GovernanceError::EmptyMembershipChange);
                }
                if let Some(both) = add.intersection(remove).next() {
                    return Err(GovernanceError::ConflictingMembershipChange(both.clone()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Lifecycle state of a request.
///
/// Only `Pending` and `Executed` are ever stored. `Invalidated` is derived
/// by comparing the creation version against the live registry version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Executed,
    Invalidated,
}

/// A proposed privileged action and its approval record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    /// Creation order within the ledger, starting at 0.
    pub sequence: u64,
    pub proposer: AccountId,
    pub payload: RequestPayload,
    /// Approving voters in the order they approved; the proposer is first.
    pub approvals: Vec<AccountId>,
    /// Registry version at creation.
    pub created_at_version: u64,
    pub(crate) executed: bool,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        self.payload.kind()
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn has_approved(&self, voter: &AccountId) -> bool {
        self.approvals.contains(voter)
    }

    /// Effective status against the given registry version.
    pub fn status(&self, current_version: u64) -> RequestStatus {
        if self.executed {
            RequestStatus::Executed
        } else if self.created_at_version != current_version {
            RequestStatus::Invalidated
        } else {
            RequestStatus::Pending
        }
    }
}
