use ballot_types::{Address, ProposalId, WorkflowPhase};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("{0} is not the administrator")]
    Unauthorized(Address),

    #[error("cannot move from {from} to {to}")]
    InvalidPhaseTransition {
        from: WorkflowPhase,
        to: WorkflowPhase,
    },

    #[error("operation requires phase {required}, election is in {current}")]
    InvalidPhase {
        required: WorkflowPhase,
        current: WorkflowPhase,
    },

    #[error("voter {0} is already registered")]
    AlreadyRegistered(Address),

    #[error("voter {0} is not registered")]
    NotRegistered(Address),

    #[error("a proposal described {0:?} already exists")]
    DuplicateProposal(String),

    #[error("voter {0} has already voted")]
    AlreadyVoted(Address),

    #[error("no proposal described {0:?}")]
    ProposalNotFound(String),

    #[error("proposal id {id} out of range ({count} proposals)")]
    InvalidProposalId { id: ProposalId, count: usize },

    #[error("no proposals have been submitted")]
    NoProposals,

    #[error("no winning proposal is recorded")]
    NoWinningProposal,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
