//! quorum-daemon: drives quorum governance over a reference token ledger.

mod config;
mod error;
mod replay;
mod script;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use quorum_governance::{GovernanceEngine, VoterRegistry};
use quorum_token::TokenLedger;
use quorum_types::AccountId;
use quorum_utils::LogFormat;
use tracing::info;

use crate::config::DaemonConfig;
use crate::replay::{Replayer, Summary};
use crate::script::Script;

#[derive(Parser)]
#[command(name = "quorum-daemon", about = "Quorum-gated token governance")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "QUORUM_CONFIG")]
    config: Option<PathBuf>,

    /// Voting accounts, comma-separated. Replaces the configured list.
    #[arg(long, env = "QUORUM_VOTERS", value_delimiter = ',')]
    voters: Vec<String>,

    /// Log filter, e.g. "info" or "warn,quorum_governance=debug".
    #[arg(long, env = "QUORUM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format: "human" or "json".
    #[arg(long, env = "QUORUM_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply a script of request/approve calls and print a JSON summary.
    Replay {
        script: PathBuf,

        /// Write the governance snapshot to this file afterwards.
        #[arg(long)]
        save_state: Option<PathBuf>,
    },
    /// Print the configured voter count and quorum.
    Quorum,
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if !cli.voters.is_empty() {
        config.governance.voters = cli
            .voters
            .iter()
            .map(|v| AccountId::parse(v.as_str()))
            .collect::<Result<_, _>>()
            .context("invalid --voters")?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    quorum_utils::init_logging(config.logging.format, &config.logging.level);
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Replay { script, save_state } => {
            replay(&config, &script, save_state.as_deref())
        }
        Command::Quorum => {
            let registry = VoterRegistry::new(config.governance.voters.iter().cloned())?;
            println!("voters: {}", registry.len());
            println!("quorum: {}", registry.quorum());
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn replay(config: &DaemonConfig, script: &Path, save_state: Option<&Path>) -> anyhow::Result<()> {
    let token = TokenLedger::new(config.governance.engine_account.clone(), &config.token);
    let mut engine = GovernanceEngine::from_config(&config.governance, token)?;
    let script = Script::from_toml_file(script)?;

    let replayer = Replayer::attach(&mut engine);
    let report = replayer.run(&mut engine, &script);

    if let Some(path) = save_state {
        let state = engine.save_state()?;
        std::fs::write(path, &state)
            .with_context(|| format!("failed to write state to {}", path.display()))?;
        info!(path = %path.display(), bytes = state.len(), "governance state saved");
    }

    let summary = Summary::new(&engine, &report);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
