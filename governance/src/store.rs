//! Ballot store — registered voters, the proposal sequence, and vote state.
//!
//! The store knows nothing about phases; [`crate::Election`] gates every call
//! on the workflow phase first. Each mutating method checks all of its
//! preconditions before touching state, so an `Err` leaves the store as it was.

use std::collections::{BTreeSet, HashMap};

use ballot_types::{Address, ProposalId};

use crate::error::BallotError;
use crate::proposal::{Proposal, Voter};

#[derive(Clone, Debug, Default)]
pub struct BallotStore {
    voters: HashMap<Address, Voter>,
    proposals: Vec<Proposal>,
    winning_proposal_id: Option<ProposalId>,
}

impl BallotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        voters: HashMap<Address, Voter>,
        proposals: Vec<Proposal>,
        winning_proposal_id: Option<ProposalId>,
    ) -> Self {
        Self {
            voters,
            proposals,
            winning_proposal_id,
        }
    }

    pub(crate) fn voters(&self) -> &HashMap<Address, Voter> {
        &self.voters
    }

    // ── Voters ─────────────────────────────────────────────────────────

    /// Voting state for `identity`; unknown identities get the unregistered default.
    pub fn voter(&self, identity: &Address) -> Voter {
        self.voters.get(identity).copied().unwrap_or_default()
    }

    pub fn is_registered(&self, identity: &Address) -> bool {
        self.voter(identity).is_registered
    }

    pub fn registered_voter_count(&self) -> usize {
        self.voters.values().filter(|v| v.is_registered).count()
    }

    /// Whitelist `identity`.
    pub fn register(&mut self, identity: &Address) -> Result<(), BallotError> {
        let voter = self.voters.entry(identity.clone()).or_default();
        if voter.is_registered {
            return Err(BallotError::AlreadyRegistered(identity.clone()));
        }
        voter.is_registered = true;
        Ok(())
    }

    fn ensure_registered(&self, identity: &Address) -> Result<(), BallotError> {
        if self.is_registered(identity) {
            Ok(())
        } else {
            Err(BallotError::NotRegistered(identity.clone()))
        }
    }

    // ── Proposals ──────────────────────────────────────────────────────

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// First proposal whose description matches exactly.
    pub fn find_proposal(&self, description: &str) -> Option<ProposalId> {
        self.proposals
            .iter()
            .position(|p| p.description == description)
    }

    pub fn proposal_id_by_description(&self, description: &str) -> Result<ProposalId, BallotError> {
        self.find_proposal(description)
            .ok_or_else(|| BallotError::ProposalNotFound(description.to_string()))
    }

    /// Append a proposal on behalf of a registered voter.
    pub fn add_proposal(
        &mut self,
        author: &Address,
        description: &str,
    ) -> Result<ProposalId, BallotError> {
        self.ensure_registered(author)?;
        if self.find_proposal(description).is_some() {
            return Err(BallotError::DuplicateProposal(description.to_string()));
        }
        self.proposals.push(Proposal::new(description));
        Ok(self.proposals.len() - 1)
    }

    /// Descriptions in submission order.
    pub fn descriptions(&self) -> Result<Vec<String>, BallotError> {
        if self.proposals.is_empty() {
            return Err(BallotError::NoProposals);
        }
        Ok(self
            .proposals
            .iter()
            .map(|p| p.description.clone())
            .collect())
    }

    /// Look up a proposal by id on behalf of a registered voter.
    pub fn proposal(&self, caller: &Address, id: ProposalId) -> Result<&Proposal, BallotError> {
        self.ensure_registered(caller)?;
        self.proposals
            .get(id)
            .ok_or(BallotError::InvalidProposalId {
                id,
                count: self.proposals.len(),
            })
    }

    // ── Votes ──────────────────────────────────────────────────────────

    /// Record `voter`'s single vote for the proposal described by `description`.
    pub fn record_vote(
        &mut self,
        voter: &Address,
        description: &str,
    ) -> Result<ProposalId, BallotError> {
        let state = self.voter(voter);
        if !state.is_registered {
            return Err(BallotError::NotRegistered(voter.clone()));
        }
        if state.has_voted {
            return Err(BallotError::AlreadyVoted(voter.clone()));
        }
        let id = self.proposal_id_by_description(description)?;

        self.voters.insert(
            voter.clone(),
            Voter {
                is_registered: true,
                has_voted: true,
                voted_proposal_id: Some(id),
            },
        );
        self.proposals[id].vote_count += 1;
        Ok(id)
    }

    /// Descriptions `target` voted for: empty, or exactly one.
    pub fn voter_votes(
        &self,
        caller: &Address,
        target: &Address,
    ) -> Result<BTreeSet<String>, BallotError> {
        self.ensure_registered(caller)?;
        self.ensure_registered(target)?;
        Ok(self
            .voter(target)
            .voted_proposal_id
            .and_then(|id| self.proposals.get(id))
            .map(|p| p.description.clone())
            .into_iter()
            .collect())
    }

    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }

    // ── Tally ──────────────────────────────────────────────────────────

    /// Plurality winner. A later proposal only takes the lead with a strictly
    /// greater count, so ties go to the earliest id.
    pub fn compute_winner(&self) -> Result<ProposalId, BallotError> {
        let mut proposals = self.proposals.iter().enumerate();
        let (mut winner, first) = proposals.next().ok_or(BallotError::NoProposals)?;
        let mut max_votes = first.vote_count;
        for (id, proposal) in proposals {
            if proposal.vote_count > max_votes {
                max_votes = proposal.vote_count;
                winner = id;
            }
        }
        Ok(winner)
    }

    pub(crate) fn set_winner(&mut self, id: ProposalId) {
        self.winning_proposal_id = Some(id);
    }

    pub fn winning_proposal_id(&self) -> Option<ProposalId> {
        self.winning_proposal_id
    }

    pub fn winner(&self) -> Result<&Proposal, BallotError> {
        self.winning_proposal_id
            .and_then(|id| self.proposals.get(id))
            .ok_or(BallotError::NoWinningProposal)
    }
}
