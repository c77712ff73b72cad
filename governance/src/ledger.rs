//! The request ledger: every request ever proposed, and the voter registry
//! that decides who may propose, approve and execute them.
//!
//! The registry lives inside the ledger so that a membership change and the
//! invalidation it causes are one mutation of one value.

use std::collections::HashMap;

use crate::error::GovernanceError;
use crate::registry::VoterRegistry;
use crate::request::{Request, RequestKind, RequestPayload, RequestStatus};
use quorum_crypto::derive_request_id;
use quorum_types::{AccountId, RequestId};
use serde::{Deserialize, Serialize};

/// Result of a successful approval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Recorded; the request still needs more approvals.
    Pending { approvals: usize, quorum: usize },
    /// Quorum reached and the request's effect was applied.
    Executed,
}

pub struct RequestLedger {
    registry: VoterRegistry,
    requests: HashMap<RequestId, Request>,
    /// Creation order, for history queries.
    order: Vec<RequestId>,
    /// Next allocation counter; never reused.
    nonce: u64,
}

impl RequestLedger {
    pub fn new(registry: VoterRegistry) -> Self {
        Self {
            registry,
            requests: HashMap::new(),
            order: Vec::new(),
            nonce: 0,
        }
    }

    pub fn registry(&self) -> &VoterRegistry {
        &self.registry
    }

    pub fn get(&self, id: &RequestId) -> Option<&Request> {
        self.requests.get(id)
    }

    /// Effective status of a request, `None` if the id is unknown.
    pub fn status(&self, id: &RequestId) -> Option<RequestStatus> {
        self.requests
            .get(id)
            .map(|r| r.status(self.registry.version()))
    }

    /// Every request in creation order.
    pub fn history(&self) -> impl Iterator<Item = &Request> {
        self.order.iter().filter_map(|id| self.requests.get(id))
    }

    /// Requests that can still be approved.
    pub fn pending(&self) -> impl Iterator<Item = &Request> {
        let version = self.registry.version();
        self.history()
            .filter(move |r| r.status(version) == RequestStatus::Pending)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Store a new request with the proposer as its first approval.
    ///
    /// Quorum is at least 2 for any valid registry, so creation alone never
    /// executes a request.
    pub fn create(
        &mut self,
        payload: RequestPayload,
        proposer: &AccountId,
    ) -> Result<RequestId, GovernanceError> {
        if !self.registry.is_voter(proposer) {
            return Err(GovernanceError::NotAVoter(proposer.clone()));
        }
        payload.validate()?;

        let next_nonce = self.nonce.checked_add(1).ok_or(GovernanceError::Overflow)?;
        let id = derive_request_id(self.nonce, payload.kind().tag(), proposer);
        if self.requests.contains_key(&id) {
            return Err(GovernanceError::IdCollision(id));
        }

        let request = Request {
            id,
            sequence: self.nonce,
            proposer: proposer.clone(),
            payload,
            approvals: vec![proposer.clone()],
            created_at_version: self.registry.version(),
            executed: false,
        };
        self.nonce = next_nonce;
        self.requests.insert(id, request);
        self.order.push(id);
        Ok(id)
    }

    /// Record `voter`'s approval of request `id`, expected to be of `kind`.
    ///
    /// Checks run in a fixed order and all precede any write. When the
    /// approval would reach the live quorum, `execute` runs first; if it
    /// fails the approval is not recorded and the request stays pending.
    /// `execute` receives the registry mutably so a membership change can
    /// bump the version in the same step that marks the request executed.
    pub fn approve<F>(
        &mut self,
        id: &RequestId,
        kind: RequestKind,
        voter: &AccountId,
        execute: F,
    ) -> Result<ApprovalOutcome, GovernanceError>
    where
        F: FnOnce(&RequestPayload, &mut VoterRegistry) -> Result<(), GovernanceError>,
    {
        let Self {
            registry, requests, ..
        } = self;

        let request = requests
            .get_mut(id)
            .filter(|r| r.kind() == kind)
            .ok_or(GovernanceError::UnknownRequest(*id))?;
        if !registry.is_voter(voter) {
            return Err(GovernanceError::NotAVoter(voter.clone()));
        }
        if request.executed {
            return Err(GovernanceError::AlreadyCompleted(*id));
        }
        if request.created_at_version != registry.version() {
            return Err(GovernanceError::Invalidated {
                id: *id,
                created_at_version: request.created_at_version,
                current_version: registry.version(),
            });
        }
        if request.has_approved(voter) {
            return Err(GovernanceError::AlreadyApproved {
                id: *id,
                voter: voter.clone(),
            });
        }

        let approvals = request.approvals.len() + 1;
        let quorum = registry.quorum();
        if approvals < quorum {
            request.approvals.push(voter.clone());
            return Ok(ApprovalOutcome::Pending { approvals, quorum });
        }

        execute(&request.payload, registry)?;
        request.approvals.push(voter.clone());
        request.executed = true;
        Ok(ApprovalOutcome::Executed)
    }
}

/// Serializable image of a [`RequestLedger`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub registry: VoterRegistry,
    /// In creation order.
    pub requests: Vec<Request>,
    pub nonce: u64,
}

impl RequestLedger {
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            registry: self.registry.clone(),
            requests: self.history().cloned().collect(),
            nonce: self.nonce,
        }
    }

    /// Rebuild a ledger from a snapshot, re-checking what deserialization
    /// alone cannot guarantee.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, GovernanceError> {
        snapshot.registry.validate()?;
        let mut requests = HashMap::with_capacity(snapshot.requests.len());
        let mut order = Vec::with_capacity(snapshot.requests.len());
        for request in snapshot.requests {
            if request.sequence >= snapshot.nonce {
                return Err(GovernanceError::Snapshot(format!(
                    "request {} has sequence {} beyond nonce {}",
                    request.id, request.sequence, snapshot.nonce
                )));
            }
            if request.created_at_version > snapshot.registry.version() {
                return Err(GovernanceError::Snapshot(format!(
                    "request {} created at future version {}",
                    request.id, request.created_at_version
                )));
            }
            let id = request.id;
            if requests.insert(id, request).is_some() {
                return Err(GovernanceError::Snapshot(format!("duplicate request {id}")));
            }
            order.push(id);
        }
        Ok(Self {
            registry: snapshot.registry,
            requests,
            order,
            nonce: snapshot.nonce,
        })
    }

    /// Serialize the ledger to bytes.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(&self.snapshot()).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Restore a ledger from bytes produced by [`RequestLedger::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: LedgerSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }
}
