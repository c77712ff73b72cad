//! Governance engine: one propose/approve pair per request kind, all driven
//! through the shared request lifecycle.

use std::collections::BTreeSet;

use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::ledger::{ApprovalOutcome, RequestLedger};
use crate::registry::VoterRegistry;
use crate::request::{Request, RequestKind, RequestPayload, RequestStatus};
use quorum_token::ManagedLedger;
use quorum_types::{AccountId, RequestId, TokenAmount};
use tracing::{debug, info, warn};

/// The façade voters talk to.
///
/// Each call runs to completion, including any ledger effect it triggers,
/// before returning. The engine owns the request ledger (and through it the
/// voter registry) and the managed ledger it acts on.
pub struct GovernanceEngine<L> {
    account: AccountId,
    requests: RequestLedger,
    ledger: L,
    events: EventBus,
}

impl<L: ManagedLedger> GovernanceEngine<L> {
    /// Create an engine acting as `account` on `ledger`.
    pub fn new(
        account: AccountId,
        voters: impl IntoIterator<Item = AccountId>,
        ledger: L,
    ) -> Result<Self, GovernanceError> {
        let registry = VoterRegistry::new(voters)?;
        info!(
            %account,
            voters = registry.len(),
            quorum = registry.quorum(),
            "governance engine initialised"
        );
        Ok(Self {
            account,
            requests: RequestLedger::new(registry),
            ledger,
            events: EventBus::new(),
        })
    }

    pub fn from_config(config: &GovernanceConfig, ledger: L) -> Result<Self, GovernanceError> {
        Self::new(
            config.engine_account.clone(),
            config.voters.iter().cloned(),
            ledger,
        )
    }

    /// Resume from bytes produced by [`GovernanceEngine::save_state`].
    pub fn restore(account: AccountId, state: &[u8], ledger: L) -> Result<Self, GovernanceError> {
        let requests = RequestLedger::load_state(state)?;
        info!(
            %account,
            version = requests.registry().version(),
            requests = requests.len(),
            "governance engine restored"
        );
        Ok(Self {
            account,
            requests,
            ledger,
            events: EventBus::new(),
        })
    }

    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        self.requests.save_state()
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct access to the managed ledger, e.g. for an owner that took over
    /// through an executed owner change.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn registry(&self) -> &VoterRegistry {
        self.requests.registry()
    }

    /// Minimum number of approvals needed to execute a request right now.
    pub fn quorum(&self) -> usize {
        self.registry().quorum()
    }

    pub fn is_voter(&self, account: &AccountId) -> bool {
        self.registry().is_voter(account)
    }

    pub fn voters(&self) -> Vec<AccountId> {
        self.registry().members().cloned().collect()
    }

    pub fn version(&self) -> u64 {
        self.registry().version()
    }

    pub fn request(&self, id: &RequestId) -> Option<&Request> {
        self.requests.get(id)
    }

    pub fn status(&self, id: &RequestId) -> Option<RequestStatus> {
        self.requests.status(id)
    }

    pub fn history(&self) -> impl Iterator<Item = &Request> {
        self.requests.history()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Request> {
        self.requests.pending()
    }

    // ── Generic lifecycle ──────────────────────────────────────────────

    /// Create a request. The proposer's approval is recorded with it.
    pub fn propose(
        &mut self,
        proposer: &AccountId,
        payload: RequestPayload,
    ) -> Result<RequestId, GovernanceError> {
        let kind = payload.kind();
        let id = self.requests.create(payload, proposer)?;
        info!(%kind, %id, %proposer, version = self.version(), "request created");
        self.events.emit(&GovernanceEvent::Requested {
            kind,
            id,
            proposer: proposer.clone(),
        });
        Ok(id)
    }

    /// Approve request `id` of `kind`, executing it if quorum is reached.
    pub fn approve(
        &mut self,
        voter: &AccountId,
        kind: RequestKind,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        let Self {
            account,
            requests,
            ledger,
            events,
        } = self;

        let outcome = requests
            .approve(id, kind, voter, |payload, registry| {
                apply_effect(account, ledger, payload, registry)
            })
            .map_err(|e| {
                if is_execution_failure(&e) {
                    warn!(%kind, %id, %voter, error = %e, "request execution failed");
                } else {
                    debug!(%kind, %id, %voter, error = %e, "approval rejected");
                }
                e
            })?;

        match outcome {
            ApprovalOutcome::Pending { approvals, quorum } => {
                debug!(%kind, %id, %voter, approvals, quorum, "approval recorded");
                events.emit(&GovernanceEvent::Approved {
                    kind,
                    id: *id,
                    voter: voter.clone(),
                    approvals,
                    quorum,
                });
            }
            ApprovalOutcome::Executed => {
                info!(%kind, %id, %voter, "request executed");
                events.emit(&GovernanceEvent::Executed { kind, id: *id });
                if kind == RequestKind::MembershipChange {
                    let registry = requests.registry();
                    info!(
                        version = registry.version(),
                        voters = registry.len(),
                        quorum = registry.quorum(),
                        "voters list changed; older requests invalidated"
                    );
                    events.emit(&GovernanceEvent::VotersChanged {
                        version: registry.version(),
                        members: registry.members().cloned().collect(),
                    });
                }
            }
        }
        Ok(outcome)
    }

    // ── Per-kind surface ───────────────────────────────────────────────

    pub fn request_issue(
        &mut self,
        proposer: &AccountId,
        amount: TokenAmount,
        recipient: &AccountId,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(
            proposer,
            RequestPayload::Issue {
                amount,
                recipient: recipient.clone(),
            },
        )
    }

    pub fn approve_issue(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::Issue, id)
    }

    pub fn request_redeem(
        &mut self,
        proposer: &AccountId,
        amount: TokenAmount,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(proposer, RequestPayload::Redeem { amount })
    }

    pub fn approve_redeem(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::Redeem, id)
    }

    pub fn request_pause(&mut self, proposer: &AccountId) -> Result<RequestId, GovernanceError> {
        self.propose(proposer, RequestPayload::Pause)
    }

    pub fn approve_pause(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::Pause, id)
    }

    pub fn request_unpause(&mut self, proposer: &AccountId) -> Result<RequestId, GovernanceError> {
        self.propose(proposer, RequestPayload::Unpause)
    }

    pub fn approve_unpause(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::Unpause, id)
    }

    pub fn request_blacklist(
        &mut self,
        proposer: &AccountId,
        account: &AccountId,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(
            proposer,
            RequestPayload::Blacklist {
                account: account.clone(),
            },
        )
    }

    pub fn approve_blacklist(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::Blacklist, id)
    }

    pub fn request_unblacklist(
        &mut self,
        proposer: &AccountId,
        account: &AccountId,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(
            proposer,
            RequestPayload::Unblacklist {
                account: account.clone(),
            },
        )
    }

    pub fn approve_unblacklist(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::Unblacklist, id)
    }

    pub fn request_destroy_black_funds(
        &mut self,
        proposer: &AccountId,
        account: &AccountId,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(
            proposer,
            RequestPayload::DestroyBlackFunds {
                account: account.clone(),
            },
        )
    }

    pub fn approve_destroy_black_funds(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::DestroyBlackFunds, id)
    }

    pub fn request_owner_change(
        &mut self,
        proposer: &AccountId,
        new_owner: &AccountId,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(
            proposer,
            RequestPayload::OwnerChange {
                new_owner: new_owner.clone(),
            },
        )
    }

    pub fn approve_owner_change(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::OwnerChange, id)
    }

    pub fn request_membership_change(
        &mut self,
        proposer: &AccountId,
        add: BTreeSet<AccountId>,
        remove: BTreeSet<AccountId>,
    ) -> Result<RequestId, GovernanceError> {
        self.propose(proposer, RequestPayload::MembershipChange { add, remove })
    }

    pub fn approve_membership_change(
        &mut self,
        voter: &AccountId,
        id: &RequestId,
    ) -> Result<ApprovalOutcome, GovernanceError> {
        self.approve(voter, RequestKind::MembershipChange, id)
    }
}

/// Errors that can only come out of the execution step itself.
fn is_execution_failure(e: &GovernanceError) -> bool {
    matches!(
        e,
        GovernanceError::Ledger(_)
            | GovernanceError::InsufficientVoters { .. }
            | GovernanceError::Overflow
    )
}

/// Perform a request's effect. Ledger calls are made as the engine account.
fn apply_effect<L: ManagedLedger>(
    account: &AccountId,
    ledger: &mut L,
    payload: &RequestPayload,
    registry: &mut VoterRegistry,
) -> Result<(), GovernanceError> {
    match payload {
        RequestPayload::Issue { amount, recipient } => ledger.issue(account, *amount, recipient)?,
        RequestPayload::Redeem { amount } => ledger.redeem(account, *amount)?,
        RequestPayload::Pause => ledger.pause(account)?,
        RequestPayload::Unpause => ledger.unpause(account)?,
        RequestPayload::Blacklist { account: target } => ledger.add_black_list(account, target)?,
        RequestPayload::Unblacklist { account: target } => {
            ledger.remove_black_list(account, target)?
        }
        RequestPayload::DestroyBlackFunds { account: target } => {
            ledger.destroy_black_funds(account, target)?
        }
        RequestPayload::OwnerChange { new_owner } => ledger.transfer_ownership(account, new_owner)?,
        RequestPayload::MembershipChange { add, remove } => registry.apply(add, remove)?,
    }
    Ok(())
}
