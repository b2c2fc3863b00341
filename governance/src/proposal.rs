//! Proposal and voter records.

use ballot_types::ProposalId;
use serde::{Deserialize, Serialize};

/// A proposal competing for votes.
///
/// Its position in the proposal sequence is its permanent id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique text, matched exactly (case-sensitive) on lookup.
    pub description: String,
    /// Votes received. Starts at 0 and only increments.
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            vote_count: 0,
        }
    }
}

/// Per-identity voting state.
///
/// Every identity implicitly has one, defaulting to unregistered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub is_registered: bool,
    pub has_voted: bool,
    /// Set together with `has_voted`.
    pub voted_proposal_id: Option<ProposalId>,
}
