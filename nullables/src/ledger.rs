//! Nullable managed ledger that records privileged calls instead of keeping books.

use std::collections::VecDeque;

use quorum_token::{LedgerError, ManagedLedger};
use quorum_types::{AccountId, TokenAmount};

/// One privileged call accepted by a [`NullLedger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    Issue {
        caller: AccountId,
        amount: TokenAmount,
        to: AccountId,
    },
    Redeem {
        caller: AccountId,
        amount: TokenAmount,
    },
    Pause {
        caller: AccountId,
    },
    Unpause {
        caller: AccountId,
    },
    AddBlackList {
        caller: AccountId,
        account: AccountId,
    },
    RemoveBlackList {
        caller: AccountId,
        account: AccountId,
    },
    DestroyBlackFunds {
        caller: AccountId,
        account: AccountId,
    },
    TransferOwnership {
        caller: AccountId,
        new_owner: AccountId,
    },
}

/// A managed ledger for testing.
///
/// Accepts every call from every caller and records it, unless a failure has
/// been queued with [`NullLedger::fail_next`]. A failed call is not recorded.
#[derive(Default)]
pub struct NullLedger {
    calls: Vec<LedgerCall>,
    failures: VecDeque<LedgerError>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls accepted so far, in order.
    pub fn calls(&self) -> &[LedgerCall] {
        &self.calls
    }

    /// Make the next call fail with `error`. Queued failures are consumed in
    /// order, one per call.
    pub fn fail_next(&mut self, error: LedgerError) {
        self.failures.push_back(error);
    }

    fn record(&mut self, call: LedgerCall) -> Result<(), LedgerError> {
        if let Some(error) = self.failures.pop_front() {
            return Err(error);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl ManagedLedger for NullLedger {
    fn issue(
        &mut self,
        caller: &AccountId,
        amount: TokenAmount,
        to: &AccountId,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::Issue {
            caller: caller.clone(),
            amount,
            to: to.clone(),
        })
    }

    fn redeem(&mut self, caller: &AccountId, amount: TokenAmount) -> Result<(), LedgerError> {
        self.record(LedgerCall::Redeem {
            caller: caller.clone(),
            amount,
        })
    }

    fn pause(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        self.record(LedgerCall::Pause {
            caller: caller.clone(),
        })
    }

    fn unpause(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        self.record(LedgerCall::Unpause {
            caller: caller.clone(),
        })
    }

    fn add_black_list(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::AddBlackList {
            caller: caller.clone(),
            account: account.clone(),
        })
    }

    fn remove_black_list(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::RemoveBlackList {
            caller: caller.clone(),
            account: account.clone(),
        })
    }

    fn destroy_black_funds(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::DestroyBlackFunds {
            caller: caller.clone(),
            account: account.clone(),
        })
    }

    fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::TransferOwnership {
            caller: caller.clone(),
            new_owner: new_owner.clone(),
        })
    }
}
