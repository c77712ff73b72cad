//! The privileged operation surface the governance engine depends on.

use crate::error::LedgerError;
use quorum_types::{AccountId, TokenAmount};

/// Privileged operations of a managed fungible-asset ledger.
///
/// Implementations must reject every caller that is not the current owner
/// and must either apply an operation fully or fail without any effect.
pub trait ManagedLedger {
    /// Mint `amount` new units to `to`, raising total supply.
    fn issue(
        &mut self,
        caller: &AccountId,
        amount: TokenAmount,
        to: &AccountId,
    ) -> Result<(), LedgerError>;

    /// Burn `amount` units from the owner's own balance.
    fn redeem(&mut self, caller: &AccountId, amount: TokenAmount) -> Result<(), LedgerError>;

    fn pause(&mut self, caller: &AccountId) -> Result<(), LedgerError>;

    fn unpause(&mut self, caller: &AccountId) -> Result<(), LedgerError>;

    fn add_black_list(&mut self, caller: &AccountId, account: &AccountId)
        -> Result<(), LedgerError>;

    fn remove_black_list(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError>;

    /// Zero the balance of a blacklisted account.
    ///
    /// Fails with [`LedgerError::NotBlacklisted`] if `account` is not
    /// currently blacklisted.
    fn destroy_black_funds(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError>;

    fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<(), LedgerError>;
}
