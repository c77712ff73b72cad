//! Replay scripts: an ordered list of `request` and `approve` calls.
//!
//! ```toml
//! [[call]]
//! action = "request"
//! proposer = "alice"
//! kind = "issue"
//! amount = 100
//! recipient = "dave"
//!
//! [[call]]
//! action = "approve"
//! voter = "bob"
//! kind = "issue"
//! request = 0
//! ```
//!
//! Approvals name their request by creation ordinal (0 for the first request
//! created during the replay), since ids are only known once created.

use std::collections::BTreeSet;
use std::path::Path;

use quorum_governance::{RequestKind, RequestPayload};
use quorum_types::{AccountId, TokenAmount};
use serde::Deserialize;

use crate::error::DaemonError;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "call")]
    pub calls: Vec<Call>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Call {
    Request(RequestCall),
    Approve(ApproveCall),
}

/// A proposal. Which of the optional fields are required depends on `kind`.
#[derive(Clone, Debug, Deserialize)]
pub struct RequestCall {
    pub proposer: AccountId,
    pub kind: RequestKind,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub recipient: Option<AccountId>,
    #[serde(default)]
    pub account: Option<AccountId>,
    #[serde(default)]
    pub new_owner: Option<AccountId>,
    #[serde(default)]
    pub add: Vec<AccountId>,
    #[serde(default)]
    pub remove: Vec<AccountId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApproveCall {
    pub voter: AccountId,
    pub kind: RequestKind,
    /// Creation ordinal of the request within the replay.
    pub request: usize,
}

impl Script {
    pub fn from_toml_file(path: &Path) -> Result<Self, DaemonError> {
        let content = std::fs::read_to_string(path).map_err(|source| DaemonError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| DaemonError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

impl RequestCall {
    /// Build the payload for `kind` from the fields it needs.
    pub fn payload(&self) -> Result<RequestPayload, DaemonError> {
        let kind = self.kind;
        let payload = match kind {
            RequestKind::Issue => RequestPayload::Issue {
                amount: self.amount(kind)?,
                recipient: required(kind, "recipient", &self.recipient)?,
            },
            RequestKind::Redeem => RequestPayload::Redeem {
                amount: self.amount(kind)?,
            },
            RequestKind::Pause => RequestPayload::Pause,
            RequestKind::Unpause => RequestPayload::Unpause,
            RequestKind::Blacklist => RequestPayload::Blacklist {
                account: required(kind, "account", &self.account)?,
            },
            RequestKind::Unblacklist => RequestPayload::Unblacklist {
                account: required(kind, "account", &self.account)?,
            },
            RequestKind::DestroyBlackFunds => RequestPayload::DestroyBlackFunds {
                account: required(kind, "account", &self.account)?,
            },
            RequestKind::OwnerChange => RequestPayload::OwnerChange {
                new_owner: required(kind, "new_owner", &self.new_owner)?,
            },
            RequestKind::MembershipChange => RequestPayload::MembershipChange {
                add: self.add.iter().cloned().collect::<BTreeSet<_>>(),
                remove: self.remove.iter().cloned().collect::<BTreeSet<_>>(),
            },
        };
        Ok(payload)
    }

    fn amount(&self, kind: RequestKind) -> Result<TokenAmount, DaemonError> {
        self.amount
            .map(TokenAmount::from)
            .ok_or(DaemonError::MissingField {
                kind,
                field: "amount",
            })
    }
}

fn required(
    kind: RequestKind,
    field: &'static str,
    value: &Option<AccountId>,
) -> Result<AccountId, DaemonError> {
    value
        .clone()
        .ok_or(DaemonError::MissingField { kind, field })
}
