//! Account identifiers for voters, token holders and ledger owners.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account on the managed ledger.
///
/// Identifiers are opaque, non-empty strings without surrounding whitespace.
/// Voters, token holders and the engine itself are all addressed this way.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier from a trusted raw string.
    ///
    /// # Panics
    /// Panics if the string is not a valid identifier (see [`AccountId::parse`]).
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse an account identifier, rejecting empty or padded strings.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypesError::EmptyAccount);
        }
        if s.trim() != s {
            return Err(TypesError::InvalidAccount(s));
        }
        Ok(Self(s))
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl TryFrom<&str> for AccountId {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
