//! In-memory reference ledger.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::TokenConfig;
use crate::error::LedgerError;
use crate::managed::ManagedLedger;
use quorum_types::{AccountId, TokenAmount};
use serde::Serialize;
use tracing::{debug, info};

/// A single-owner fungible token ledger.
///
/// Only the privileged surface is implemented here; holder-initiated
/// transfers belong to whatever system embeds the ledger.
#[derive(Clone, Debug, Serialize)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    decimals: u8,
    owner: AccountId,
    total_supply: TokenAmount,
    paused: bool,
    balances: BTreeMap<AccountId, TokenAmount>,
    black_list: BTreeSet<AccountId>,
}

impl TokenLedger {
    /// Create a ledger owned by `owner`, crediting the initial supply to the
    /// configured supplier.
    pub fn new(owner: AccountId, config: &TokenConfig) -> Self {
        let mut balances = BTreeMap::new();
        let initial = TokenAmount::from(config.initial_supply);
        if !initial.is_zero() {
            balances.insert(config.supplier.clone(), initial);
        }
        Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            owner,
            total_supply: initial,
            paused: false,
            balances,
            black_list: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.balances.get(account).copied().unwrap_or(TokenAmount::ZERO)
    }

    pub fn is_black_listed(&self, account: &AccountId) -> bool {
        self.black_list.contains(account)
    }

    fn ensure_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.owner {
            return Err(LedgerError::NotOwner {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn set_balance(&mut self, account: &AccountId, amount: TokenAmount) {
        if amount.is_zero() {
            self.balances.remove(account);
        } else {
            self.balances.insert(account.clone(), amount);
        }
    }
}

impl ManagedLedger for TokenLedger {
    fn issue(
        &mut self,
        caller: &AccountId,
        amount: TokenAmount,
        to: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        info!(%to, %amount, supply = %self.total_supply, "issued");
        Ok(())
    }

    fn redeem(&mut self, caller: &AccountId, amount: TokenAmount) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        let owner = self.owner.clone();
        let available = self.balance_of(&owner);
        let balance = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            })?;
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply = supply;
        self.set_balance(&owner, balance);
        info!(%amount, supply = %self.total_supply, "redeemed");
        Ok(())
    }

    fn pause(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if self.paused {
            return Err(LedgerError::AlreadyPaused);
        }
        self.paused = true;
        info!("paused");
        Ok(())
    }

    fn unpause(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(LedgerError::NotPaused);
        }
        self.paused = false;
        info!("unpaused");
        Ok(())
    }

    fn add_black_list(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if self.black_list.insert(account.clone()) {
            info!(%account, "blacklisted");
        } else {
            debug!(%account, "already blacklisted");
        }
        Ok(())
    }

    fn remove_black_list(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if self.black_list.remove(account) {
            info!(%account, "removed from blacklist");
        } else {
            debug!(%account, "was not blacklisted");
        }
        Ok(())
    }

    fn destroy_black_funds(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if !self.black_list.contains(account) {
            return Err(LedgerError::NotBlacklisted(account.clone()));
        }
        let dirty = self.balance_of(account);
        let supply = self
            .total_supply
            .checked_sub(dirty)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply = supply;
        self.set_balance(account, TokenAmount::ZERO);
        info!(%account, destroyed = %dirty, "destroyed blacklisted funds");
        Ok(())
    }

    fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        info!(from = %self.owner, to = %new_owner, "ownership transferred");
        self.owner = new_owner.clone();
        Ok(())
    }
}
