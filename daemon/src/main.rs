//! biovote: run registration and voting sessions against a biometric registry.

mod roll;
mod session;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use biovote_registry::{RegistryConfig, VotingRegistry};
use biovote_utils::{init_logging, LogFormat};
use clap::Parser;

use crate::roll::Roll;
use crate::session::SessionReport;

#[derive(Parser)]
#[command(name = "biovote", about = "Biometric-gated voter registry", version)]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; flags
    /// and env vars override them.
    #[arg(long, global = true, env = "BIOVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "BIOVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "BIOVOTE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Register two voters, let both vote, then try a repeat and an unknown id.
    Demo {
        /// Print registry events as JSON lines instead of outcome lines.
        #[arg(long)]
        json: bool,
    },
    /// Register the voters in a roll file and replay its ballots.
    Session {
        /// Roll file with [[voters]] and [[ballots]] tables.
        #[arg(long)]
        roll: PathBuf,

        /// Print registry events as JSON lines instead of outcome lines.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    /// Config file (or defaults) with flag overrides applied.
    fn resolve_config(&self) -> anyhow::Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => RegistryConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_report(report: &SessionReport, json: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        report.write_json(&mut out)?;
    } else {
        report.write_human(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match &cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Demo { json } => {
            let registry = VotingRegistry::from_config(&config)?;
            tracing::info!(verifier = registry.verifier_name(), "starting demo session");
            let report = session::run_demo(&registry).await?;
            print_report(&report, *json)?;
        }
        Command::Session { roll, json } => {
            let registry = VotingRegistry::from_config(&config)?;
            let roll_file = Roll::from_toml_file(roll)?;
            tracing::info!(
                verifier = registry.verifier_name(),
                roll = %roll.display(),
                "starting roll session"
            );
            let report = session::run_roll(&registry, &roll_file).await?;
            print_report(&report, *json)?;
        }
    }

    Ok(())
}
