//! Governance configuration with TOML file support.

use quorum_types::AccountId;
use serde::{Deserialize, Serialize};

use crate::GovernanceError;

/// Genesis configuration for a [`crate::GovernanceEngine`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// The engine's own account on the managed ledger. The ledger must be
    /// owned by this account for executed requests to take effect.
    #[serde(default = "default_engine_account")]
    pub engine_account: AccountId,

    /// Initial voters (at least three distinct accounts).
    #[serde(default)]
    pub voters: Vec<AccountId>,
}

fn default_engine_account() -> AccountId {
    AccountId::new("governance")
}

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GovernanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            engine_account: default_engine_account(),
            voters: Vec::new(),
        }
    }
}
