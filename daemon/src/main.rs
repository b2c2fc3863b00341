//! ballot — runs a whitelisted, single-round election from a TOML scenario.

mod scenario;

use anyhow::Context;
use ballot_utils::LogFormat;
use clap::Parser;
use scenario::{run_scenario, ScenarioConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ballot", about = "Permissioned single-election voting")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the scenario file's `log_level`.
    #[arg(long, global = true, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the scenario file's `log_format`.
    #[arg(long, global = true, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the election described by a scenario file.
    Run {
        /// Path to the TOML scenario.
        #[arg(long, env = "BALLOT_SCENARIO")]
        scenario: PathBuf,
    },
    /// Print a sample scenario to stdout.
    Template,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Template => {
            let toml = ScenarioConfig::sample()
                .to_toml_string()
                .context("rendering sample scenario")?;
            print!("{toml}");
        }
        Command::Run { scenario } => {
            let config = ScenarioConfig::from_toml_file(&scenario)
                .with_context(|| format!("loading scenario {}", scenario.display()))?;

            let format = cli.log_format.unwrap_or(config.log_format);
            let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
            ballot_utils::init_logging(format, level).context("initialising logging")?;

            tracing::info!(
                voters = config.voters.len(),
                proposals = config.proposals.len(),
                votes = config.votes.len(),
                "running scenario {}",
                scenario.display()
            );

            let outcome = run_scenario(&config).context("election aborted")?;

            if config.emit_events {
                for event in &outcome.events {
                    println!(
                        "{}",
                        serde_json::to_string(event).context("encoding event")?
                    );
                }
            }
            println!(
                "winner: #{} {:?} with {} vote(s)",
                outcome.winning_proposal_id, outcome.winner.description, outcome.winner.vote_count
            );
        }
    }
    Ok(())
}
