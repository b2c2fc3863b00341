//! The election facade — one election, driven from whitelist to tally.
//!
//! Every operation runs to completion before the next one starts and is
//! all-or-nothing: preconditions are checked first, then state is mutated,
//! then events are emitted. A failed call changes nothing and emits nothing.

use std::collections::BTreeSet;

use ballot_types::{Address, ProposalId, WorkflowPhase};

use crate::access::{AdminCapability, Ownership};
use crate::error::BallotError;
use crate::event::{BallotEvent, EventBus};
use crate::proposal::{Proposal, Voter};
use crate::snapshot::ElectionSnapshot;
use crate::store::BallotStore;
use crate::workflow::{PhaseChange, WorkflowController};

/// A single-use election. There is no reset; build a new one per election.
#[derive(Debug)]
pub struct Election<A: AdminCapability = Ownership> {
    workflow: WorkflowController,
    store: BallotStore,
    authority: A,
    events: EventBus,
}

impl<A: AdminCapability> Election<A> {
    pub fn new(authority: A) -> Self {
        Self {
            workflow: WorkflowController::new(),
            store: BallotStore::new(),
            authority,
            events: EventBus::new(),
        }
    }

    /// Register an observer for every event emitted from now on.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BallotEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Mutable access to the administrator capability, e.g. to transfer ownership.
    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    pub fn current_phase(&self) -> WorkflowPhase {
        self.workflow.phase()
    }

    fn ensure_admin(&self, caller: &Address) -> Result<(), BallotError> {
        if self.authority.is_administrator(caller) {
            Ok(())
        } else {
            Err(BallotError::Unauthorized(caller.clone()))
        }
    }

    fn emit(&self, event: BallotEvent) {
        self.events.emit(&event);
    }

    // ── Workflow ───────────────────────────────────────────────────────

    fn transition(
        &mut self,
        caller: &Address,
        from: WorkflowPhase,
    ) -> Result<PhaseChange, BallotError> {
        let change = self
            .ensure_admin(caller)
            .and_then(|()| self.workflow.check_advance(from))
            .inspect_err(|e| tracing::debug!(%caller, error = %e, "phase transition rejected"))?;
        self.workflow.apply(change);
        tracing::info!(previous = %change.previous(), new = %change.new_phase(), "phase changed");
        self.emit(change.into());
        Ok(change)
    }

    pub fn start_proposals_registration(
        &mut self,
        caller: &Address,
    ) -> Result<PhaseChange, BallotError> {
        self.transition(caller, WorkflowPhase::RegisteringVoters)
    }

    pub fn end_proposals_registration(
        &mut self,
        caller: &Address,
    ) -> Result<PhaseChange, BallotError> {
        self.transition(caller, WorkflowPhase::ProposalsRegistrationStarted)
    }

    pub fn start_voting_session(&mut self, caller: &Address) -> Result<PhaseChange, BallotError> {
        self.transition(caller, WorkflowPhase::ProposalsRegistrationEnded)
    }

    pub fn end_voting_session(&mut self, caller: &Address) -> Result<PhaseChange, BallotError> {
        self.transition(caller, WorkflowPhase::VotingSessionStarted)
    }

    // ── Ballot operations ──────────────────────────────────────────────

    /// Whitelist `voter`. Administrator only, during `RegisteringVoters`.
    pub fn whitelist(&mut self, caller: &Address, voter: &Address) -> Result<(), BallotError> {
        self.ensure_admin(caller)
            .and_then(|()| self.workflow.require(WorkflowPhase::RegisteringVoters))
            .and_then(|()| self.store.register(voter))
            .inspect_err(|e| {
                tracing::debug!(%caller, %voter, error = %e, "registration rejected")
            })?;
        tracing::info!(%voter, "voter registered");
        self.emit(BallotEvent::VoterRegistered {
            voter: voter.clone(),
        });
        Ok(())
    }

    /// Submit a proposal. Registered voters only, during `ProposalsRegistrationStarted`.
    pub fn submit_proposal(
        &mut self,
        caller: &Address,
        description: &str,
    ) -> Result<ProposalId, BallotError> {
        let proposal_id = self
            .workflow
            .require(WorkflowPhase::ProposalsRegistrationStarted)
            .and_then(|()| self.store.add_proposal(caller, description))
            .inspect_err(|e| tracing::debug!(%caller, error = %e, "proposal rejected"))?;
        tracing::info!(%caller, proposal_id, description, "proposal registered");
        self.emit(BallotEvent::ProposalRegistered { proposal_id });
        Ok(proposal_id)
    }

    /// Cast the caller's only vote, naming the proposal by its exact description.
    pub fn vote(&mut self, caller: &Address, description: &str) -> Result<ProposalId, BallotError> {
        let proposal_id = self
            .workflow
            .require(WorkflowPhase::VotingSessionStarted)
            .and_then(|()| self.store.record_vote(caller, description))
            .inspect_err(|e| tracing::debug!(%caller, error = %e, "vote rejected"))?;
        tracing::info!(voter = %caller, proposal_id, "vote cast");
        self.emit(BallotEvent::VoteCast {
            voter: caller.clone(),
            proposal_id,
        });
        Ok(proposal_id)
    }

    /// Compute the plurality winner and close the election.
    ///
    /// Administrator only, during `VotingSessionEnded`. This is the only
    /// way into `VotesTallied`.
    pub fn tally_votes(&mut self, caller: &Address) -> Result<ProposalId, BallotError> {
        let (change, winner) = self
            .ensure_admin(caller)
            .and_then(|()| self.workflow.check_advance(WorkflowPhase::VotingSessionEnded))
            .and_then(|change| self.store.compute_winner().map(|winner| (change, winner)))
            .inspect_err(|e| tracing::debug!(%caller, error = %e, "tally rejected"))?;
        self.store.set_winner(winner);
        self.workflow.apply(change);
        tracing::info!(
            winning_proposal_id = winner,
            votes = self.store.proposals()[winner].vote_count,
            total_votes = self.store.total_votes(),
            "votes tallied"
        );
        self.emit(change.into());
        Ok(winner)
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// All descriptions in submission order, once proposal registration has opened.
    pub fn list_proposal_descriptions(&self) -> Result<Vec<String>, BallotError> {
        self.workflow
            .require_at_least(WorkflowPhase::ProposalsRegistrationStarted)?;
        self.store.descriptions()
    }

    /// The winning proposal. Only readable once votes are tallied.
    pub fn get_winner(&self) -> Result<&Proposal, BallotError> {
        self.workflow.require(WorkflowPhase::VotesTallied)?;
        self.store.winner()
    }

    /// The winning proposal's id. Only readable once votes are tallied.
    pub fn winning_proposal_id(&self) -> Result<ProposalId, BallotError> {
        self.workflow.require(WorkflowPhase::VotesTallied)?;
        self.store
            .winning_proposal_id()
            .ok_or(BallotError::NoWinningProposal)
    }

    pub fn get_proposal_id_by_description(
        &self,
        description: &str,
    ) -> Result<ProposalId, BallotError> {
        self.store.proposal_id_by_description(description)
    }

    /// A proposal by id. Registered voters only.
    pub fn get_proposal(&self, caller: &Address, id: ProposalId) -> Result<&Proposal, BallotError> {
        self.store.proposal(caller, id)
    }

    /// What `target` voted for. Registered voters only; `target` must be registered.
    pub fn get_voter_votes(
        &self,
        caller: &Address,
        target: &Address,
    ) -> Result<BTreeSet<String>, BallotError> {
        self.store.voter_votes(caller, target)
    }

    pub fn voter(&self, identity: &Address) -> Voter {
        self.store.voter(identity)
    }

    pub fn registered_voter_count(&self) -> usize {
        self.store.registered_voter_count()
    }

    pub fn proposal_count(&self) -> usize {
        self.store.proposal_count()
    }

    // ── Snapshots ──────────────────────────────────────────────────────

    /// Capture the election state. Listeners and the capability are not included.
    pub fn snapshot(&self) -> ElectionSnapshot {
        ElectionSnapshot::capture(self.workflow.phase(), &self.store)
    }

    /// Rebuild an election from a snapshot, after checking it is consistent.
    pub fn restore(snapshot: ElectionSnapshot, authority: A) -> Result<Self, BallotError> {
        let (phase, store) = snapshot.into_parts()?;
        tracing::info!(%phase, proposals = store.proposal_count(), "election restored");
        Ok(Self {
            workflow: WorkflowController::at(phase),
            store,
            authority,
            events: EventBus::new(),
        })
    }
}
