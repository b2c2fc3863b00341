//! Election scenarios with TOML file support.
//!
//! A scenario lists the administrator, the voters to whitelist, the proposals
//! to submit and the votes to cast. [`run_scenario`] drives one election
//! through every phase with exactly those calls.

use std::path::Path;
use std::sync::mpsc;

use ballot_governance::{BallotError, BallotEvent, Election, Ownership, Proposal};
use ballot_types::{Address, ProposalId};
use ballot_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("config error: {0}")]
    Config(String),

    #[error("{step} failed: {source}")]
    Ballot {
        step: String,
        #[source]
        source: BallotError,
    },
}

/// A proposal to submit during proposal registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalEntry {
    pub author: Address,
    pub description: String,
}

/// A vote to cast during the voting session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub voter: Address,
    pub description: String,
}

/// Everything needed to run one election.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Owner of the administrator capability.
    pub administrator: Address,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print every emitted event as a JSON line.
    #[serde(default = "default_true")]
    pub emit_events: bool,

    /// Identities to whitelist, in order.
    #[serde(default)]
    pub voters: Vec<Address>,

    /// Proposals to submit, in order.
    #[serde(default)]
    pub proposals: Vec<ProposalEntry>,

    /// Votes to cast, in order.
    #[serde(default)]
    pub votes: Vec<VoteEntry>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ScenarioConfig {
    /// Load a scenario from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScenarioError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse a scenario from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ScenarioError> {
        toml::from_str(s).map_err(|e| ScenarioError::Config(e.to_string()))
    }

    /// Serialize the scenario to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ScenarioError> {
        toml::to_string_pretty(self).map_err(|e| ScenarioError::Config(e.to_string()))
    }

    /// Three voters, two proposals, Alpha wins 2–1.
    pub fn sample() -> Self {
        let admin = Address::from_low_u64(0xad);
        let (a, b, c) = (
            Address::from_low_u64(0xa),
            Address::from_low_u64(0xb),
            Address::from_low_u64(0xc),
        );
        let vote = |voter: &Address, description: &str| VoteEntry {
            voter: voter.clone(),
            description: description.to_string(),
        };
        Self {
            administrator: admin,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            emit_events: true,
            voters: vec![a.clone(), b.clone(), c.clone()],
            proposals: vec![
                ProposalEntry {
                    author: a.clone(),
                    description: "Alpha".to_string(),
                },
                ProposalEntry {
                    author: b.clone(),
                    description: "Beta".to_string(),
                },
            ],
            votes: vec![vote(&a, "Alpha"), vote(&b, "Beta"), vote(&c, "Alpha")],
        }
    }
}

/// What a completed scenario produced.
#[derive(Clone, Debug)]
pub struct ScenarioOutcome {
    pub winning_proposal_id: ProposalId,
    pub winner: Proposal,
    /// Every event in emission order.
    pub events: Vec<BallotEvent>,
}

fn step<T>(name: impl Into<String>, result: Result<T, BallotError>) -> Result<T, ScenarioError> {
    result.map_err(|source| ScenarioError::Ballot {
        step: name.into(),
        source,
    })
}

/// Run the whole election described by `config`. Stops at the first failing call.
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioOutcome, ScenarioError> {
    let admin = &config.administrator;
    let mut election = Election::new(Ownership::new(admin.clone()));

    let (tx, rx) = mpsc::channel();
    election.subscribe(Box::new(move |event| {
        let _ = tx.send(event.clone());
    }));

    for voter in &config.voters {
        step(format!("whitelist {voter}"), election.whitelist(admin, voter))?;
    }
    step("start proposals registration", election.start_proposals_registration(admin))?;
    for proposal in &config.proposals {
        step(
            format!("proposal {:?} by {}", proposal.description, proposal.author),
            election.submit_proposal(&proposal.author, &proposal.description),
        )?;
    }
    step("end proposals registration", election.end_proposals_registration(admin))?;
    step("start voting session", election.start_voting_session(admin))?;
    for vote in &config.votes {
        step(
            format!("vote by {} for {:?}", vote.voter, vote.description),
            election.vote(&vote.voter, &vote.description),
        )?;
    }
    step("end voting session", election.end_voting_session(admin))?;
    let winning_proposal_id = step("tally", election.tally_votes(admin))?;
    let winner = step("read winner", election.get_winner())?.clone();

    tracing::info!(
        winning_proposal_id,
        description = %winner.description,
        votes = winner.vote_count,
        "scenario complete"
    );

    Ok(ScenarioOutcome {
        winning_proposal_id,
        winner,
        events: rx.try_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_elects_alpha() {
        let outcome = run_scenario(&ScenarioConfig::sample()).expect("sample should run");
        assert_eq!(outcome.winning_proposal_id, 0);
        assert_eq!(outcome.winner.description, "Alpha");
        assert_eq!(outcome.winner.vote_count, 2);
        // 3 registrations + 5 phase changes + 2 proposals + 3 votes
        assert_eq!(outcome.events.len(), 13);
    }

    #[test]
    fn sample_round_trips_through_toml() {
        let config = ScenarioConfig::sample();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = ScenarioConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.voters, config.voters);
        assert_eq!(parsed.proposals, config.proposals);
        assert_eq!(parsed.votes, config.votes);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let toml = r#"administrator = "0x00000000000000000000000000000000000000ad""#;
        let config = ScenarioConfig::from_toml_str(toml).expect("should parse");
        assert!(config.voters.is_empty());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Human);
        assert!(config.emit_events);
    }

    #[test]
    fn malformed_address_is_config_error() {
        let err = ScenarioConfig::from_toml_str(r#"administrator = "alice""#).unwrap_err();
        assert!(matches!(err, ScenarioError::Config(_)));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = ScenarioConfig::from_toml_file("/nonexistent/scenario.toml");
        assert!(matches!(result, Err(ScenarioError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let toml = ScenarioConfig::sample().to_toml_string().unwrap();
        file.write_all(toml.as_bytes()).unwrap();
        let config = ScenarioConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.voters.len(), 3);
    }

    #[test]
    fn no_proposals_fails_at_tally() {
        let mut config = ScenarioConfig::sample();
        config.proposals.clear();
        config.votes.clear();
        let err = run_scenario(&config).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Ballot {
                source: BallotError::NoProposals,
                ..
            }
        ));
    }

    #[test]
    fn double_vote_names_the_step() {
        let mut config = ScenarioConfig::sample();
        let repeat = config.votes[0].clone();
        config.votes.push(repeat);
        let err = run_scenario(&config).unwrap_err();
        assert!(err.to_string().starts_with("vote by 0x"));
        assert!(matches!(
            err,
            ScenarioError::Ballot {
                source: BallotError::AlreadyVoted(_),
                ..
            }
        ));
    }
}
