//! Workflow controller — owns the current phase and its legal transitions.
//!
//! Transitions are split into a pure check ([`WorkflowController::check_advance`])
//! and a crate-internal apply step, so the election can validate everything
//! else before the phase moves. A [`PhaseChange`] can only be minted by
//! `check_advance`, and always names a phase and its immediate successor.

use ballot_types::WorkflowPhase;
use serde::Serialize;

use crate::error::BallotError;
use crate::event::BallotEvent;

/// A validated one-step phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseChange {
    previous: WorkflowPhase,
    new: WorkflowPhase,
}

impl PhaseChange {
    pub fn previous(&self) -> WorkflowPhase {
        self.previous
    }

    pub fn new_phase(&self) -> WorkflowPhase {
        self.new
    }
}

impl From<PhaseChange> for BallotEvent {
    fn from(change: PhaseChange) -> Self {
        BallotEvent::PhaseChanged {
            previous: change.previous,
            new: change.new,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowController {
    phase: WorkflowPhase,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume at an arbitrary phase (snapshot restore).
    pub(crate) fn at(phase: WorkflowPhase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Validate the transition out of `from` without applying it.
    ///
    /// Fails unless the current phase is exactly `from`.
    pub fn check_advance(&self, from: WorkflowPhase) -> Result<PhaseChange, BallotError> {
        // VotesTallied has no successor; report it as a request to stay put.
        let to = from.next().unwrap_or(from);
        if self.phase != from || from.is_final() {
            return Err(BallotError::InvalidPhaseTransition {
                from: self.phase,
                to,
            });
        }
        Ok(PhaseChange {
            previous: from,
            new: to,
        })
    }

    /// Apply a transition produced by [`Self::check_advance`] on this controller.
    ///
    /// A change that no longer starts at the current phase is ignored and
    /// `false` is returned, so a stale change can never move the phase.
    pub(crate) fn apply(&mut self, change: PhaseChange) -> bool {
        if self.phase != change.previous || change.previous.next() != Some(change.new) {
            return false;
        }
        self.phase = change.new;
        true
    }

    fn advance(&mut self, from: WorkflowPhase) -> Result<PhaseChange, BallotError> {
        let change = self.check_advance(from)?;
        let applied = self.apply(change);
        debug_assert!(applied);
        Ok(change)
    }

    pub fn start_proposals_registration(&mut self) -> Result<PhaseChange, BallotError> {
        self.advance(WorkflowPhase::RegisteringVoters)
    }

    pub fn end_proposals_registration(&mut self) -> Result<PhaseChange, BallotError> {
        self.advance(WorkflowPhase::ProposalsRegistrationStarted)
    }

    pub fn start_voting_session(&mut self) -> Result<PhaseChange, BallotError> {
        self.advance(WorkflowPhase::ProposalsRegistrationEnded)
    }

    pub fn end_voting_session(&mut self) -> Result<PhaseChange, BallotError> {
        self.advance(WorkflowPhase::VotingSessionStarted)
    }

    /// Fail unless the current phase is exactly `required`.
    pub fn require(&self, required: WorkflowPhase) -> Result<(), BallotError> {
        if self.phase == required {
            Ok(())
        } else {
            Err(BallotError::InvalidPhase {
                required,
                current: self.phase,
            })
        }
    }

    /// Fail unless the current phase is `required` or later.
    pub fn require_at_least(&self, required: WorkflowPhase) -> Result<(), BallotError> {
        if self.phase >= required {
            Ok(())
        } else {
            Err(BallotError::InvalidPhase {
                required,
                current: self.phase,
            })
        }
    }
}
