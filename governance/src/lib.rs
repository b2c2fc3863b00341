//! Permissioned single-election voting.
//!
//! Six-phase workflow: RegisteringVoters → ProposalsRegistrationStarted →
//! ProposalsRegistrationEnded → VotingSessionStarted → VotingSessionEnded → VotesTallied.
//!
//! The administrator whitelists voters and drives every phase transition.
//! Registered voters submit uniquely-worded proposals and cast exactly one vote,
//! by proposal text. The tally picks the plurality winner; ties go to the
//! earliest proposal.
//!
//! [`Election`] is the entry point. It combines the [`WorkflowController`]
//! (phase state) with the [`BallotStore`] (voters, proposals, votes), checks
//! every administrator-only call against an [`AdminCapability`], and reports
//! state changes on an [`EventBus`].

pub mod access;
pub mod election;
pub mod error;
pub mod event;
pub mod proposal;
pub mod snapshot;
pub mod store;
pub mod workflow;

pub use access::{AdminCapability, Ownership};
pub use election::Election;
pub use error::BallotError;
pub use event::{BallotEvent, EventBus};
pub use proposal::{Proposal, Voter};
pub use snapshot::ElectionSnapshot;
pub use store::BallotStore;
pub use workflow::{PhaseChange, WorkflowController};
