//! Token metadata and genesis allocation.

use quorum_types::AccountId;
use serde::{Deserialize, Serialize};

/// Genesis configuration for a [`crate::TokenLedger`].
///
/// `initial_supply` is a `u64` because TOML integers are at most 64 bits;
/// the ledger itself counts in `u128`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Units credited to `supplier` at genesis.
    #[serde(default)]
    pub initial_supply: u64,

    /// Receives the initial supply.
    #[serde(default = "default_supplier")]
    pub supplier: AccountId,
}

fn default_name() -> String {
    "Managed token".to_string()
}

fn default_symbol() -> String {
    "MTK".to_string()
}

fn default_decimals() -> u8 {
    2
}

fn default_supplier() -> AccountId {
    AccountId::new("supplier")
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            initial_supply: 0,
            supplier: default_supplier(),
        }
    }
}
