//! The election workflow phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// The six phases of an election, in their only legal order.
///
/// Phases move strictly forward, one step at a time. The derived `Ord`
/// follows declaration order, so "at or after X" is `phase >= X`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WorkflowPhase {
    /// The administrator whitelists voters.
    #[default]
    RegisteringVoters,
    /// Registered voters submit proposals.
    ProposalsRegistrationStarted,
    /// Proposal list is frozen; voting has not opened yet.
    ProposalsRegistrationEnded,
    /// Registered voters cast their single vote.
    VotingSessionStarted,
    /// Votes are frozen, awaiting the tally.
    VotingSessionEnded,
    /// The winner has been computed. Terminal.
    VotesTallied,
}

impl WorkflowPhase {
    /// Every phase, in workflow order.
    pub const ALL: [WorkflowPhase; 6] = [
        Self::RegisteringVoters,
        Self::ProposalsRegistrationStarted,
        Self::ProposalsRegistrationEnded,
        Self::VotingSessionStarted,
        Self::VotingSessionEnded,
        Self::VotesTallied,
    ];

    /// The immediate successor, or `None` for the terminal phase.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::RegisteringVoters => Some(Self::ProposalsRegistrationStarted),
            Self::ProposalsRegistrationStarted => Some(Self::ProposalsRegistrationEnded),
            Self::ProposalsRegistrationEnded => Some(Self::VotingSessionStarted),
            Self::VotingSessionStarted => Some(Self::VotingSessionEnded),
            Self::VotingSessionEnded => Some(Self::VotesTallied),
            Self::VotesTallied => None,
        }
    }

    /// Stable snake-case label used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegisteringVoters => "registering_voters",
            Self::ProposalsRegistrationStarted => "proposals_registration_started",
            Self::ProposalsRegistrationEnded => "proposals_registration_ended",
            Self::VotingSessionStarted => "voting_session_started",
            Self::VotingSessionEnded => "voting_session_ended",
            Self::VotesTallied => "votes_tallied",
        }
    }

    /// Whether the election has concluded.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::VotesTallied)
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowPhase {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| TypesError::UnknownPhase(s.to_string()))
    }
}
