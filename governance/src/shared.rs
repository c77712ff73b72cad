//! A cloneable, thread-safe handle to one governance engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::ledger::ApprovalOutcome;
use crate::request::{RequestKind, RequestPayload};
use quorum_token::ManagedLedger;
use quorum_types::{AccountId, RequestId};

/// Serializes concurrent callers onto a single engine.
///
/// One mutex guards the whole engine (registry, requests and managed
/// ledger), so a membership change and the invalidation it causes are
/// observed atomically by every other caller.
pub struct SharedGovernance<L> {
    inner: Arc<Mutex<GovernanceEngine<L>>>,
}

impl<L> Clone for SharedGovernance<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: ManagedLedger> SharedGovernance<L> {
    pub fn new(engine: GovernanceEngine<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn propose(
        &self,
        proposer: &AccountId,
        payload: RequestPayload,
    ) -> Result<RequestId, GovernanceError> {
        self.lock().propose(proposer, payload)
    }

    pub fn approve(
        &self,
        voter: &AccountId,
        kind: RequestKind,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.lock().approve(voter, kind, id)
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut GovernanceEngine<L>) -> R) -> R {
        f(&mut self.lock())
    }

    // A panicking listener can poison the lock, but every engine call
    // validates before it writes, so the guarded state is still consistent.
    fn lock(&self) -> MutexGuard<'_, GovernanceEngine<L>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
