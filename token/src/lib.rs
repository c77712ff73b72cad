//! The managed token ledger.
//!
//! The governance engine never touches balances directly. It drives a ledger
//! through the privileged surface in [`ManagedLedger`]: issue, redeem, pause,
//! blacklist, destroy blacklisted funds and transfer ownership. Every call
//! names its caller and the ledger rejects anyone but its current owner.
//!
//! [`TokenLedger`] is the in-memory reference implementation used by the
//! daemon and the scenario tests.

pub mod config;
pub mod error;
pub mod ledger;
pub mod managed;

pub use config::TokenConfig;
pub use error::LedgerError;
pub use ledger::TokenLedger;
pub use managed::ManagedLedger;
