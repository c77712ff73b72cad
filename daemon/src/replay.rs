//! Serial replay of a script against a governance engine.

use std::sync::{Arc, Mutex, PoisonError};

use quorum_governance::{
    ApprovalOutcome, GovernanceEngine, GovernanceEvent, RequestKind, RequestStatus,
};
use quorum_token::ManagedLedger;
use quorum_types::{AccountId, RequestId};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::DaemonError;
use crate::script::{Call, Script};

/// Applies script calls one at a time, keeping the creation order of every
/// request it sees announced so approvals can refer to them by ordinal.
pub struct Replayer {
    created: Arc<Mutex<Vec<RequestId>>>,
}

#[derive(Debug, Default, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub executed: usize,
    pub failures: Vec<Failure>,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    /// Position of the call in the script.
    pub call: usize,
    pub error: String,
}

impl Replayer {
    /// Subscribe to `engine`'s creation notifications.
    pub fn attach<L: ManagedLedger>(engine: &mut GovernanceEngine<L>) -> Self {
        let created = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&created);
        engine.subscribe(Box::new(move |event| {
            if !matches!(event, GovernanceEvent::Requested { .. }) {
                return;
            }
            if let Some(id) = event.request_id() {
                sink.lock().unwrap_or_else(PoisonError::into_inner).push(id);
            }
        }));
        Self { created }
    }

    fn resolve(&self, ordinal: usize) -> Result<RequestId, DaemonError> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ordinal)
            .copied()
            .ok_or(DaemonError::UnknownOrdinal(ordinal))
    }

    /// Apply every call in order. A failed call is logged and skipped.
    pub fn run<L: ManagedLedger>(
        &self,
        engine: &mut GovernanceEngine<L>,
        script: &Script,
    ) -> ReplayReport {
        let mut report = ReplayReport::default();
        for (index, call) in script.calls.iter().enumerate() {
            match self.apply(engine, call) {
                Ok(executed) => {
                    report.applied += 1;
                    if executed {
                        report.executed += 1;
                    }
                }
                Err(e) => {
                    warn!(call = index, error = %e, "call failed");
                    report.failures.push(Failure {
                        call: index,
                        error: e.to_string(),
                    });
                }
            }
        }
        info!(
            applied = report.applied,
            executed = report.executed,
            failed = report.failures.len(),
            "replay finished"
        );
        report
    }

    /// Returns whether the call executed a request.
    fn apply<L: ManagedLedger>(
        &self,
        engine: &mut GovernanceEngine<L>,
        call: &Call,
    ) -> Result<bool, DaemonError> {
        match call {
            Call::Request(call) => {
                engine.propose(&call.proposer, call.payload()?)?;
                Ok(false)
            }
            Call::Approve(call) => {
                let id = self.resolve(call.request)?;
                let outcome = engine.approve(&call.voter, call.kind, &id)?;
                Ok(outcome == ApprovalOutcome::Executed)
            }
        }
    }
}

/// End-of-replay state, printed as JSON.
#[derive(Serialize)]
pub struct Summary<'a, L> {
    pub version: u64,
    pub quorum: usize,
    pub voters: Vec<AccountId>,
    pub requests: Vec<RequestSummary>,
    pub token: &'a L,
    pub replay: &'a ReplayReport,
}

#[derive(Debug, Serialize)]
pub struct RequestSummary {
    pub ordinal: u64,
    pub id: String,
    pub kind: RequestKind,
    pub proposer: AccountId,
    pub approvals: Vec<AccountId>,
    pub status: RequestStatus,
}

impl<'a, L: ManagedLedger + Serialize> Summary<'a, L> {
    pub fn new(engine: &'a GovernanceEngine<L>, replay: &'a ReplayReport) -> Self {
        let version = engine.version();
        let requests = engine
            .history()
            .map(|r| RequestSummary {
                ordinal: r.sequence,
                id: r.id.to_string(),
                kind: r.kind(),
                proposer: r.proposer.clone(),
                approvals: r.approvals.clone(),
                status: r.status(version),
            })
            .collect();
        Self {
            version,
            quorum: engine.quorum(),
            voters: engine.voters(),
            requests,
            token: engine.ledger(),
            replay,
        }
    }
}
