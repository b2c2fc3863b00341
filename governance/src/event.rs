//! Notifications emitted by the election for subscribers.

use ballot_types::{Address, ProposalId, WorkflowPhase};
use serde::{Deserialize, Serialize};

/// Election events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BallotEvent {
    /// The administrator whitelisted a voter.
    VoterRegistered { voter: Address },
    /// The workflow advanced one phase.
    PhaseChanged {
        previous: WorkflowPhase,
        new: WorkflowPhase,
    },
    /// A proposal was appended at `proposal_id`.
    ProposalRegistered { proposal_id: ProposalId },
    /// A registered voter cast their vote.
    VoteCast {
        voter: Address,
        proposal_id: ProposalId,
    },
}

/// Synchronous fan-out event bus for election events.
///
/// Listeners run inline on the calling thread, after the state change they
/// describe has been applied. Delivery is fire-and-forget.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&BallotEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BallotEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &BallotEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
