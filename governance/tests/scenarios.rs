//! End-to-end scenarios against the reference token ledger.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use quorum_governance::{
    ApprovalOutcome, GovernanceEngine, GovernanceError, GovernanceEvent, RequestKind,
    RequestStatus,
};
use quorum_token::{LedgerError, ManagedLedger, TokenConfig, TokenLedger};
use quorum_types::{AccountId, RequestId, TokenAmount};

struct Fixture {
    engine: GovernanceEngine<TokenLedger>,
    voters: [AccountId; 3],
    supplier: AccountId,
    requested: Arc<Mutex<Vec<(RequestKind, RequestId)>>>,
}

impl Fixture {
    /// Id of the most recent creation notification of `kind`.
    fn last_request_id(&self, kind: RequestKind) -> RequestId {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .expect("no request of that kind was announced")
    }
}

fn account(name: &str) -> AccountId {
    AccountId::new(name)
}

fn amount(raw: u128) -> TokenAmount {
    TokenAmount::new(raw)
}

fn set(accounts: &[&AccountId]) -> BTreeSet<AccountId> {
    accounts.iter().map(|a| (*a).clone()).collect()
}

fn deploy() -> Fixture {
    let engine_account = account("multisig");
    let supplier = account("supplier");
    let config = TokenConfig {
        name: "Test token".to_string(),
        symbol: "TTK".to_string(),
        decimals: 2,
        initial_supply: 1000,
        supplier: supplier.clone(),
    };
    let token = TokenLedger::new(engine_account.clone(), &config);
    let voters = [account("voter1"), account("voter2"), account("voter3")];
    let mut engine = GovernanceEngine::new(engine_account, voters.clone(), token).unwrap();

    let requested = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&requested);
    engine.subscribe(Box::new(move |event| {
        if let GovernanceEvent::Requested { kind, id, .. } = event {
            sink.lock().unwrap().push((*kind, *id));
        }
    }));

    Fixture {
        engine,
        voters,
        supplier,
        requested,
    }
}

// ── Quorum ───────────────────────────────────────────────────────────────

#[test]
fn quorum_is_two_with_three_voters() {
    let f = deploy();
    assert_eq!(f.engine.quorum(), 2);
}

#[test]
fn quorum_is_three_after_fourth_voter_joins() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine
        .request_membership_change(&f.voters[0], set(&[&a1]), BTreeSet::new())
        .unwrap();
    let id = f.last_request_id(RequestKind::MembershipChange);
    f.engine.approve_membership_change(&f.voters[1], &id).unwrap();
    assert_eq!(f.engine.quorum(), 3);
    assert_eq!(f.engine.version(), 1);
}

// ── Issue ────────────────────────────────────────────────────────────────

#[test]
fn issue_executes_when_quorum_agrees() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_issue(&f.voters[1], amount(100), &a1).unwrap();
    let id = f.last_request_id(RequestKind::Issue);

    assert_eq!(f.engine.ledger().balance_of(&a1), TokenAmount::ZERO);
    let outcome = f.engine.approve_issue(&f.voters[2], &id).unwrap();
    assert_eq!(outcome, ApprovalOutcome::Executed);
    assert_eq!(f.engine.ledger().balance_of(&a1), amount(100));
    assert_eq!(f.engine.ledger().total_supply(), amount(1100));
}

#[test]
fn no_approvals_after_execution() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_issue(&f.voters[1], amount(100), &a1).unwrap();
    let id = f.last_request_id(RequestKind::Issue);
    f.engine.approve_issue(&f.voters[2], &id).unwrap();

    let err = f.engine.approve_issue(&f.voters[0], &id).unwrap_err();
    assert_eq!(err, GovernanceError::AlreadyCompleted(id));
    assert_eq!(err.to_string(), format!("request {id} already completed"));
    assert_eq!(f.engine.ledger().balance_of(&a1), amount(100));
}

#[test]
fn no_double_approval() {
    let mut f = deploy();
    f.engine
        .request_issue(&f.voters[2], amount(100), &account("a1"))
        .unwrap();
    let id = f.last_request_id(RequestKind::Issue);
    let err = f.engine.approve_issue(&f.voters[2], &id).unwrap_err();
    assert!(err.to_string().contains("already approved by"));
}

#[test]
fn non_voters_cannot_propose() {
    let mut f = deploy();
    let err = f
        .engine
        .request_issue(&account("a1"), amount(100), &account("a2"))
        .unwrap_err();
    assert_eq!(err, GovernanceError::NotAVoter(account("a1")));
    assert!(err.to_string().contains("not a voting account"));
}

#[test]
fn non_voters_cannot_approve() {
    let mut f = deploy();
    f.engine
        .request_issue(&f.voters[1], amount(100), &account("a2"))
        .unwrap();
    let id = f.last_request_id(RequestKind::Issue);
    let err = f.engine.approve_issue(&account("a1"), &id).unwrap_err();
    assert_eq!(err, GovernanceError::NotAVoter(account("a1")));
    assert_eq!(f.engine.status(&id), Some(RequestStatus::Pending));
}

// ── Redeem ───────────────────────────────────────────────────────────────

#[test]
fn redeem_burns_from_engine_balance() {
    let mut f = deploy();
    let engine_account = f.engine.account().clone();
    f.engine
        .request_issue(&f.voters[0], amount(100), &engine_account)
        .unwrap();
    let id = f.last_request_id(RequestKind::Issue);
    f.engine.approve_issue(&f.voters[1], &id).unwrap();

    f.engine.request_redeem(&f.voters[0], amount(50)).unwrap();
    let id = f.last_request_id(RequestKind::Redeem);
    f.engine.approve_redeem(&f.voters[1], &id).unwrap();

    assert_eq!(f.engine.ledger().balance_of(&engine_account), amount(50));
    assert_eq!(f.engine.ledger().total_supply(), amount(1050));
}

#[test]
fn redeem_beyond_balance_surfaces_ledger_error() {
    let mut f = deploy();
    f.engine.request_redeem(&f.voters[0], amount(50)).unwrap();
    let id = f.last_request_id(RequestKind::Redeem);
    let err = f.engine.approve_redeem(&f.voters[1], &id).unwrap_err();
    assert_eq!(
        err,
        GovernanceError::Ledger(LedgerError::InsufficientBalance {
            needed: 50,
            available: 0
        })
    );
    assert_eq!(f.engine.status(&id), Some(RequestStatus::Pending));
}

// ── Voters list change ───────────────────────────────────────────────────

#[test]
fn replacing_a_voter() {
    let mut f = deploy();
    let a1 = account("a1");
    let removed = f.voters[1].clone();
    f.engine
        .request_membership_change(&f.voters[0], set(&[&a1]), set(&[&removed]))
        .unwrap();
    let id = f.last_request_id(RequestKind::MembershipChange);
    f.engine.approve_membership_change(&removed, &id).unwrap();

    let err = f.engine.request_issue(&removed, amount(1000), &a1).unwrap_err();
    assert_eq!(err, GovernanceError::NotAVoter(removed));
    assert!(f.engine.request_issue(&a1, amount(200), &a1).is_ok());
    assert_eq!(f.engine.quorum(), 2);
}

#[test]
fn voters_list_change_invalidates_previous_requests() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_issue(&f.voters[0], amount(200), &a1).unwrap();
    let issue = f.last_request_id(RequestKind::Issue);
    f.engine
        .request_membership_change(&f.voters[0], set(&[&a1]), BTreeSet::new())
        .unwrap();
    let change = f.last_request_id(RequestKind::MembershipChange);
    f.engine.approve_membership_change(&f.voters[1], &change).unwrap();

    let err = f.engine.approve_issue(&f.voters[1], &issue).unwrap_err();
    assert!(matches!(err, GovernanceError::Invalidated { .. }));
    assert!(err
        .to_string()
        .contains("invalidated after voters list change"));
    assert_eq!(f.engine.status(&issue), Some(RequestStatus::Invalidated));
    assert_eq!(f.engine.ledger().balance_of(&a1), TokenAmount::ZERO);
}

#[test]
fn invalidation_applies_to_untouched_approvers_and_newcomers() {
    let mut f = deploy();
    let d = account("d");
    f.engine.request_redeem(&f.voters[2], amount(10)).unwrap();
    let redeem = f.last_request_id(RequestKind::Redeem);
    f.engine
        .request_membership_change(&f.voters[0], set(&[&d]), BTreeSet::new())
        .unwrap();
    let change = f.last_request_id(RequestKind::MembershipChange);
    f.engine.approve_membership_change(&f.voters[1], &change).unwrap();

    for voter in [&f.voters[0], &f.voters[1], &d] {
        let err = f.engine.approve_redeem(voter, &redeem).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::Invalidated {
                id: redeem,
                created_at_version: 0,
                current_version: 1
            }
        );
    }
}

#[test]
fn cannot_drop_below_three_voters() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine
        .request_membership_change(&f.voters[0], set(&[&a1]), set(&[&f.voters[1], &f.voters[2]]))
        .unwrap();
    let id = f.last_request_id(RequestKind::MembershipChange);
    let err = f.engine.approve_membership_change(&f.voters[1], &id).unwrap_err();
    assert_eq!(
        err,
        GovernanceError::InsufficientVoters {
            remaining: 2,
            minimum: 3
        }
    );
    assert!(err.to_string().contains("not enough voting accounts will remain"));
    assert_eq!(f.engine.version(), 0);
    assert_eq!(f.engine.voters().len(), 3);
}

#[test]
fn removing_two_of_three_fails_even_with_every_approval() {
    let mut f = deploy();
    f.engine
        .request_membership_change(
            &f.voters[0],
            BTreeSet::new(),
            set(&[&f.voters[1], &f.voters[2]]),
        )
        .unwrap();
    let id = f.last_request_id(RequestKind::MembershipChange);
    for voter in [&f.voters[1], &f.voters[2]] {
        let err = f.engine.approve_membership_change(voter, &id).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InsufficientVoters { remaining: 1, .. }
        ));
    }
    assert_eq!(f.engine.status(&id), Some(RequestStatus::Pending));
}

// ── Owner change ─────────────────────────────────────────────────────────

#[test]
fn owner_change_hands_over_the_token() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_owner_change(&f.voters[0], &a1).unwrap();
    let id = f.last_request_id(RequestKind::OwnerChange);
    f.engine.approve_owner_change(&f.voters[1], &id).unwrap();

    assert_eq!(f.engine.ledger().owner(), &a1);
    f.engine.ledger_mut().pause(&a1).unwrap();
    assert!(f.engine.ledger().paused());

    // the engine no longer owns the token, so its requests fail upstream
    f.engine.request_unpause(&f.voters[0]).unwrap();
    let id = f.last_request_id(RequestKind::Unpause);
    let err = f.engine.approve_unpause(&f.voters[1], &id).unwrap_err();
    assert_eq!(
        err,
        GovernanceError::Ledger(LedgerError::NotOwner {
            caller: account("multisig")
        })
    );
}

// ── Pause / unpause ──────────────────────────────────────────────────────

#[test]
fn pause_and_unpause_the_token() {
    let mut f = deploy();
    f.engine.request_pause(&f.voters[0]).unwrap();
    let id = f.last_request_id(RequestKind::Pause);
    f.engine.approve_pause(&f.voters[1], &id).unwrap();
    assert!(f.engine.ledger().paused());

    f.engine.request_unpause(&f.voters[1]).unwrap();
    let id = f.last_request_id(RequestKind::Unpause);
    f.engine.approve_unpause(&f.voters[2], &id).unwrap();
    assert!(!f.engine.ledger().paused());
}

// ── Blacklist ────────────────────────────────────────────────────────────

#[test]
fn blacklist_and_unblacklist() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_blacklist(&f.voters[1], &a1).unwrap();
    let id = f.last_request_id(RequestKind::Blacklist);
    f.engine.approve_blacklist(&f.voters[0], &id).unwrap();
    assert!(f.engine.ledger().is_black_listed(&a1));

    f.engine.request_unblacklist(&f.voters[2], &a1).unwrap();
    let id = f.last_request_id(RequestKind::Unblacklist);
    f.engine.approve_unblacklist(&f.voters[1], &id).unwrap();
    assert!(!f.engine.ledger().is_black_listed(&a1));
}

#[test]
fn destroy_funds_of_blacklisted_account() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_issue(&f.voters[0], amount(100), &a1).unwrap();
    let id = f.last_request_id(RequestKind::Issue);
    f.engine.approve_issue(&f.voters[1], &id).unwrap();

    f.engine.request_blacklist(&f.voters[0], &a1).unwrap();
    let id = f.last_request_id(RequestKind::Blacklist);
    f.engine.approve_blacklist(&f.voters[1], &id).unwrap();

    f.engine
        .request_destroy_black_funds(&f.voters[0], &a1)
        .unwrap();
    let id = f.last_request_id(RequestKind::DestroyBlackFunds);
    f.engine.approve_destroy_black_funds(&f.voters[1], &id).unwrap();

    assert_eq!(f.engine.ledger().balance_of(&a1), TokenAmount::ZERO);
    assert_eq!(f.engine.ledger().total_supply(), amount(1000));
    assert_eq!(
        f.engine.ledger().balance_of(&f.supplier),
        amount(1000)
    );
}

#[test]
fn destroy_funds_of_clean_account_fails_until_blacklisted() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine
        .request_destroy_black_funds(&f.voters[0], &a1)
        .unwrap();
    let destroy = f.last_request_id(RequestKind::DestroyBlackFunds);
    let err = f
        .engine
        .approve_destroy_black_funds(&f.voters[1], &destroy)
        .unwrap_err();
    assert_eq!(err, GovernanceError::Ledger(LedgerError::NotBlacklisted(a1.clone())));

    f.engine.request_blacklist(&f.voters[2], &a1).unwrap();
    let id = f.last_request_id(RequestKind::Blacklist);
    f.engine.approve_blacklist(&f.voters[0], &id).unwrap();

    // the failed approval was never recorded, so voter2 may approve again
    assert_eq!(
        f.engine
            .approve_destroy_black_funds(&f.voters[1], &destroy)
            .unwrap(),
        ApprovalOutcome::Executed
    );
}

// ── Audit trail ──────────────────────────────────────────────────────────

#[test]
fn history_keeps_every_request_in_creation_order() {
    let mut f = deploy();
    let a1 = account("a1");
    f.engine.request_pause(&f.voters[0]).unwrap();
    let pause = f.last_request_id(RequestKind::Pause);
    f.engine.approve_pause(&f.voters[1], &pause).unwrap();
    f.engine.request_blacklist(&f.voters[1], &a1).unwrap();
    let blacklist = f.last_request_id(RequestKind::Blacklist);
    f.engine
        .request_membership_change(&f.voters[2], set(&[&a1]), BTreeSet::new())
        .unwrap();
    let change = f.last_request_id(RequestKind::MembershipChange);
    f.engine.approve_membership_change(&f.voters[0], &change).unwrap();

    let trail: Vec<(RequestId, RequestStatus)> = f
        .engine
        .history()
        .map(|r| (r.id, r.status(f.engine.version())))
        .collect();
    assert_eq!(
        trail,
        vec![
            (pause, RequestStatus::Executed),
            (blacklist, RequestStatus::Invalidated),
            (change, RequestStatus::Executed),
        ]
    );
    assert_eq!(f.engine.pending().count(), 0);
}

#[test]
fn failed_membership_change_keeps_other_requests_valid() {
    let mut f = deploy();
    f.engine.request_pause(&f.voters[2]).unwrap();
    let pause = f.last_request_id(RequestKind::Pause);
    f.engine
        .request_membership_change(&f.voters[0], BTreeSet::new(), set(&[&f.voters[1]]))
        .unwrap();
    let shrink = f.last_request_id(RequestKind::MembershipChange);

    let err = f.engine.approve_membership_change(&f.voters[1], &shrink).unwrap_err();
    assert!(matches!(err, GovernanceError::InsufficientVoters { .. }));
    assert_eq!(f.engine.version(), 0);

    assert_eq!(
        f.engine.approve_pause(&f.voters[0], &pause).unwrap(),
        ApprovalOutcome::Executed
    );
    assert!(f.engine.ledger().paused());

    let err = f.engine.approve_membership_change(&f.voters[1], &shrink).unwrap_err();
    assert!(matches!(err, GovernanceError::InsufficientVoters { remaining: 2, .. }));
}
