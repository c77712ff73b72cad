//! The voter set and its quorum rule.

use std::collections::BTreeSet;

use crate::error::GovernanceError;
use quorum_types::AccountId;
use serde::{Deserialize, Serialize};

/// Smallest voter set the registry will ever hold.
pub const MIN_VOTERS: usize = 3;

/// The authorized voter set plus a version stamp.
///
/// `version` starts at 0 and advances by exactly one per executed membership
/// change. Requests remember the version they were created under; any
/// mismatch makes them unexecutable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRegistry {
    members: BTreeSet<AccountId>,
    version: u64,
}

impl VoterRegistry {
    /// Build a registry at version 0. Duplicates collapse into one member.
    pub fn new(voters: impl IntoIterator<Item = AccountId>) -> Result<Self, GovernanceError> {
        let members: BTreeSet<AccountId> = voters.into_iter().collect();
        if members.len() < MIN_VOTERS {
            return Err(GovernanceError::InsufficientVoters {
                remaining: members.len(),
                minimum: MIN_VOTERS,
            });
        }
        Ok(Self {
            members,
            version: 0,
        })
    }

    pub fn is_voter(&self, account: &AccountId) -> bool {
        self.members.contains(account)
    }

    /// Strict majority of the current membership: `floor(n / 2) + 1`.
    pub fn quorum(&self) -> usize {
        self.members.len() / 2 + 1
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending identifier order.
    pub fn members(&self) -> impl Iterator<Item = &AccountId> {
        self.members.iter()
    }

    /// The membership that `apply(add, remove)` would produce.
    pub fn preview(
        &self,
        add: &BTreeSet<AccountId>,
        remove: &BTreeSet<AccountId>,
    ) -> BTreeSet<AccountId> {
        self.members
            .union(add)
            .filter(|a| !remove.contains(*a))
            .cloned()
            .collect()
    }

    /// Replace the membership with `members ∪ add \ remove` and bump the
    /// version. Leaves the registry untouched on failure.
    pub(crate) fn apply(
        &mut self,
        add: &BTreeSet<AccountId>,
        remove: &BTreeSet<AccountId>,
    ) -> Result<(), GovernanceError> {
        let next = self.preview(add, remove);
        if next.len() < MIN_VOTERS {
            return Err(GovernanceError::InsufficientVoters {
                remaining: next.len(),
                minimum: MIN_VOTERS,
            });
        }
        let version = self.version.checked_add(1).ok_or(GovernanceError::Overflow)?;
        self.members = next;
        self.version = version;
        Ok(())
    }

    /// Snapshots bypass `new`, so restored registries are re-checked.
    pub(crate) fn validate(&self) -> Result<(), GovernanceError> {
        if self.members.len() < MIN_VOTERS {
            return Err(GovernanceError::InsufficientVoters {
                remaining: self.members.len(),
                minimum: MIN_VOTERS,
            });
        }
        Ok(())
    }

    /// Adds a member without advancing the version. Only for tests that
    /// need membership and version to diverge.
    #[cfg(test)]
    pub(crate) fn insert_unversioned(&mut self, account: AccountId) {
        self.members.insert(account);
    }
}
