//! Notifications emitted by the governance engine.

use quorum_types::{AccountId, RequestId};

use crate::request::RequestKind;

/// Governance events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    /// A request was created. Carries the only copy of the new id.
    Requested {
        kind: RequestKind,
        id: RequestId,
        proposer: AccountId,
    },
    /// An approval was recorded without reaching quorum.
    Approved {
        kind: RequestKind,
        id: RequestId,
        voter: AccountId,
        approvals: usize,
        quorum: usize,
    },
    /// A request reached quorum and its effect was applied.
    Executed { kind: RequestKind, id: RequestId },
    /// A membership change executed; every older pending request is now
    /// invalid.
    VotersChanged {
        version: u64,
        members: Vec<AccountId>,
    },
}

impl GovernanceEvent {
    /// The request this event concerns, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Requested { id, .. } | Self::Approved { id, .. } | Self::Executed { id, .. } => {
                Some(*id)
            }
            Self::VotersChanged { .. } => None,
        }
    }
}

/// Synchronous fan-out event bus for governance events.
///
/// Listeners are invoked inline on the calling thread, inside the engine's
/// serialized call.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
