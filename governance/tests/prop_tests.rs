use proptest::prelude::*;

use ballot_governance::{Election, Ownership};
use ballot_types::{Address, WorkflowPhase};

fn admin() -> Address {
    Address::from_low_u64(0xad)
}

/// One of the four admin transition calls, or the tally.
#[derive(Clone, Copy, Debug)]
enum Step {
    StartProposals,
    EndProposals,
    StartVoting,
    EndVoting,
    Tally,
}

fn any_step() -> impl Strategy<Value = Step> {
    prop::sample::select(vec![
        Step::StartProposals,
        Step::EndProposals,
        Step::StartVoting,
        Step::EndVoting,
        Step::Tally,
    ])
}

fn apply(election: &mut Election, step: Step) -> bool {
    let admin = admin();
    match step {
        Step::StartProposals => election.start_proposals_registration(&admin).is_ok(),
        Step::EndProposals => election.end_proposals_registration(&admin).is_ok(),
        Step::StartVoting => election.start_voting_session(&admin).is_ok(),
        Step::EndVoting => election.end_voting_session(&admin).is_ok(),
        Step::Tally => election.tally_votes(&admin).is_ok(),
    }
}

proptest! {
    /// Whatever transitions are attempted, the phase only ever moves to its
    /// immediate successor, and a failed call leaves it where it was.
    #[test]
    fn phase_only_moves_forward(steps in prop::collection::vec(any_step(), 0..40)) {
        let mut election = Election::new(Ownership::new(admin()));
        let voter = Address::from_low_u64(1);
        election.whitelist(&admin(), &voter).unwrap();

        for step in steps {
            let before = election.current_phase();
            let registering = before == WorkflowPhase::ProposalsRegistrationStarted;
            if registering && election.proposal_count() == 0 {
                election.submit_proposal(&voter, "only").unwrap();
            }
            let ok = apply(&mut election, step);
            let after = election.current_phase();
            if ok {
                prop_assert_eq!(before.next(), Some(after));
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// After any mix of votes, each voter has voted at most once and the
    /// vote counts add up to the number of voters who voted.
    #[test]
    fn vote_counts_match_voters(
        proposals in 1usize..6,
        ballots in prop::collection::vec((1u64..12, 0usize..8), 0..60),
    ) {
        let mut election = Election::new(Ownership::new(admin()));
        for i in 1..12 {
            election.whitelist(&admin(), &Address::from_low_u64(i)).unwrap();
        }
        election.start_proposals_registration(&admin()).unwrap();
        for p in 0..proposals {
            election.submit_proposal(&Address::from_low_u64(1), &format!("P{p}")).unwrap();
        }
        election.end_proposals_registration(&admin()).unwrap();
        election.start_voting_session(&admin()).unwrap();

        for (who, choice) in ballots {
            let voter = Address::from_low_u64(who);
            let already = election.voter(&voter).has_voted;
            let result = election.vote(&voter, &format!("P{choice}"));
            prop_assert_eq!(result.is_ok(), !already && choice < proposals);
        }

        let voted = (1..12)
            .filter(|i| election.voter(&Address::from_low_u64(*i)).has_voted)
            .count() as u64;
        let counted: u64 = (0..proposals)
            .map(|id| election.get_proposal(&Address::from_low_u64(1), id).unwrap().vote_count)
            .sum();
        prop_assert_eq!(counted, voted);
    }

    /// Submitting the same description twice never yields two proposals.
    #[test]
    fn descriptions_stay_unique(descriptions in prop::collection::vec("[ab]{0,2}", 0..20)) {
        let mut election = Election::new(Ownership::new(admin()));
        let voter = Address::from_low_u64(1);
        election.whitelist(&admin(), &voter).unwrap();
        election.start_proposals_registration(&admin()).unwrap();
        for d in &descriptions {
            let _ = election.submit_proposal(&voter, d);
        }
        if election.proposal_count() > 0 {
            let mut listed = election.list_proposal_descriptions().unwrap();
            let total = listed.len();
            listed.sort();
            listed.dedup();
            prop_assert_eq!(listed.len(), total);
        } else {
            prop_assert!(descriptions.is_empty());
        }
    }

    /// The tally picks the first proposal holding the maximum count.
    #[test]
    fn tally_picks_first_maximum(counts in prop::collection::vec(0u64..4, 1..6)) {
        let total: u64 = counts.iter().sum();
        let mut election = Election::new(Ownership::new(admin()));
        for i in 1..=total.max(1) {
            election.whitelist(&admin(), &Address::from_low_u64(i)).unwrap();
        }
        election.start_proposals_registration(&admin()).unwrap();
        for p in 0..counts.len() {
            election.submit_proposal(&Address::from_low_u64(1), &format!("P{p}")).unwrap();
        }
        election.end_proposals_registration(&admin()).unwrap();
        election.start_voting_session(&admin()).unwrap();
        let mut next = 1;
        for (p, count) in counts.iter().enumerate() {
            for _ in 0..*count {
                election.vote(&Address::from_low_u64(next), &format!("P{p}")).unwrap();
                next += 1;
            }
        }
        election.end_voting_session(&admin()).unwrap();

        let max = *counts.iter().max().unwrap();
        let expected = counts.iter().position(|c| *c == max).unwrap();
        prop_assert_eq!(election.tally_votes(&admin()).unwrap(), expected);
    }
}
