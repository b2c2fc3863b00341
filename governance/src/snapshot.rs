//! Serializable election state, for hosts that persist between calls.

use std::collections::BTreeMap;

use ballot_types::{Address, ProposalId, WorkflowPhase};
use serde::{Deserialize, Serialize};

use crate::error::BallotError;
use crate::proposal::{Proposal, Voter};
use crate::store::BallotStore;

/// Point-in-time copy of an election's phase, voters, proposals and result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSnapshot {
    pub phase: WorkflowPhase,
    /// Sorted by address so equal states encode to equal bytes.
    pub voters: BTreeMap<Address, Voter>,
    pub proposals: Vec<Proposal>,
    pub winning_proposal_id: Option<ProposalId>,
}

impl ElectionSnapshot {
    pub(crate) fn capture(phase: WorkflowPhase, store: &BallotStore) -> Self {
        Self {
            phase,
            voters: store
                .voters()
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            proposals: store.proposals().to_vec(),
            winning_proposal_id: store.winning_proposal_id(),
        }
    }

    /// Serialize to bytes with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BallotError> {
        bincode::serialize(self).map_err(|e| BallotError::Snapshot(e.to_string()))
    }

    /// Deserialize from bytes produced by [`Self::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, BallotError> {
        bincode::deserialize(data).map_err(|e| BallotError::Snapshot(e.to_string()))
    }

    /// Check internal consistency. A snapshot that passes can be resumed
    /// without breaking any ledger invariant.
    pub fn validate(&self) -> Result<(), BallotError> {
        let invalid = |msg: String| Err(BallotError::Snapshot(msg));

        for (i, proposal) in self.proposals.iter().enumerate() {
            if self.proposals[..i]
                .iter()
                .any(|p| p.description == proposal.description)
            {
                return invalid(format!("duplicate proposal {:?}", proposal.description));
            }
        }
        if self.phase < WorkflowPhase::ProposalsRegistrationStarted && !self.proposals.is_empty() {
            return invalid(format!("proposals present in phase {}", self.phase));
        }

        let mut tally = vec![0u64; self.proposals.len()];
        for (address, voter) in &self.voters {
            match (voter.has_voted, voter.voted_proposal_id) {
                (false, None) => {}
                (true, Some(id)) if id < tally.len() && voter.is_registered => tally[id] += 1,
                _ => return invalid(format!("inconsistent vote record for {address}")),
            }
        }
        if tally.iter().any(|&n| n > 0) && self.phase < WorkflowPhase::VotingSessionStarted {
            return invalid(format!("votes present in phase {}", self.phase));
        }
        if let Some(id) = self
            .proposals
            .iter()
            .zip(&tally)
            .position(|(p, n)| p.vote_count != *n)
        {
            return invalid(format!(
                "proposal {id} counts {} votes but {} voters chose it",
                self.proposals[id].vote_count, tally[id]
            ));
        }

        match (self.phase.is_final(), self.winning_proposal_id) {
            (false, None) => Ok(()),
            (true, Some(id)) => match plurality_winner(&tally) {
                Some(expected) if expected == id => Ok(()),
                Some(expected) => invalid(format!(
                    "recorded winner {id} but the counts elect proposal {expected}"
                )),
                None => invalid("tallied snapshot without proposals".to_string()),
            },
            (true, None) => invalid("tallied snapshot without a winner".to_string()),
            (false, Some(_)) => invalid(format!("winner recorded in phase {}", self.phase)),
        }
    }

    pub(crate) fn into_parts(self) -> Result<(WorkflowPhase, BallotStore), BallotError> {
        self.validate()?;
        let store = BallotStore::from_parts(
            self.voters.into_iter().collect(),
            self.proposals,
            self.winning_proposal_id,
        );
        Ok((self.phase, store))
    }
}

/// First index holding the highest count; same rule as the live tally.
fn plurality_winner(counts: &[u64]) -> Option<ProposalId> {
    let mut winner = None;
    let mut max_votes = 0;
    for (id, &votes) in counts.iter().enumerate() {
        if winner.is_none() || votes > max_votes {
            max_votes = votes;
            winner = Some(id);
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Ownership;
    use crate::election::Election;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn tallied() -> Election {
        let admin = addr(100);
        let mut election = Election::new(Ownership::new(admin.clone()));
        election.whitelist(&admin, &addr(1)).unwrap();
        election.whitelist(&admin, &addr(2)).unwrap();
        election.start_proposals_registration(&admin).unwrap();
        election.submit_proposal(&addr(1), "Alpha").unwrap();
        election.submit_proposal(&addr(1), "Beta").unwrap();
        election.end_proposals_registration(&admin).unwrap();
        election.start_voting_session(&admin).unwrap();
        election.vote(&addr(1), "Beta").unwrap();
        election.end_voting_session(&admin).unwrap();
        election.tally_votes(&admin).unwrap();
        election
    }

    #[test]
    fn bytes_roundtrip_restores_state() {
        let election = tallied();
        let bytes = election.snapshot().to_bytes().unwrap();
        let restored = Election::restore(
            ElectionSnapshot::from_bytes(&bytes).unwrap(),
            Ownership::new(addr(100)),
        )
        .unwrap();
        assert_eq!(restored.current_phase(), WorkflowPhase::VotesTallied);
        assert_eq!(restored.get_winner().unwrap().description, "Beta");
        assert_eq!(restored.voter(&addr(1)).voted_proposal_id, Some(1));
        assert_eq!(restored.snapshot(), election.snapshot());
    }

    #[test]
    fn garbage_bytes_rejected() {
        let err = ElectionSnapshot::from_bytes(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, BallotError::Snapshot(_)));
    }

    #[test]
    fn mismatched_vote_count_rejected() {
        let mut snapshot = tallied().snapshot();
        snapshot.proposals[0].vote_count = 3;
        assert!(matches!(snapshot.validate(), Err(BallotError::Snapshot(_))));
    }

    #[test]
    fn out_of_range_vote_rejected() {
        let mut snapshot = tallied().snapshot();
        if let Some(voter) = snapshot.voters.get_mut(&addr(1)) {
            voter.voted_proposal_id = Some(9);
        }
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn duplicate_descriptions_rejected() {
        let mut snapshot = tallied().snapshot();
        snapshot.proposals[1].description = "Alpha".into();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn non_plurality_winner_rejected() {
        let mut snapshot = tallied().snapshot();
        snapshot.winning_proposal_id = Some(0);
        let err = Election::restore(snapshot, Ownership::new(addr(100))).unwrap_err();
        assert!(matches!(err, BallotError::Snapshot(_)));
    }

    #[test]
    fn tied_counts_must_elect_first_proposal() {
        let mut snapshot = tallied().snapshot();
        if let Some(voter) = snapshot.voters.get_mut(&addr(2)) {
            voter.has_voted = true;
            voter.voted_proposal_id = Some(0);
        }
        snapshot.proposals[0].vote_count = 1;
        assert!(snapshot.validate().is_err());
        snapshot.winning_proposal_id = Some(0);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn plurality_winner_prefers_first_maximum() {
        assert_eq!(plurality_winner(&[3, 5, 5, 2]), Some(1));
        assert_eq!(plurality_winner(&[0, 0]), Some(0));
        assert_eq!(plurality_winner(&[]), None);
    }

    #[test]
    fn winner_before_tally_rejected() {
        let mut snapshot = tallied().snapshot();
        snapshot.phase = WorkflowPhase::VotingSessionEnded;
        assert!(snapshot.validate().is_err());
        snapshot.winning_proposal_id = None;
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn restore_starts_without_listeners() {
        let snapshot = tallied().snapshot();
        let restored: Election = Election::restore(snapshot, Ownership::new(addr(100))).unwrap();
        assert_eq!(restored.registered_voter_count(), 2);
        assert_eq!(restored.proposal_count(), 2);
    }
}
