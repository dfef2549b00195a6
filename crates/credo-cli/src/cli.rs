//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Credo CLI - Score claims and track the stability of their credibility.
#[derive(Debug, Parser)]
#[command(name = "credo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.credo/config.toml)
    #[arg(short, long, global = true, env = "CREDO_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite ledger to export records to
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per claim)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate claims at one or more epochs
    Evaluate(EvaluateArgs),

    /// Evaluate at evenly spaced epochs over a time range
    Replay(ReplayArgs),

    /// List contradiction clusters
    Clusters(ClustersArgs),

    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Input JSON file (sources, claims, links, contradictions, ...)
    pub input: PathBuf,

    /// Evaluation epoch in milliseconds since the Unix epoch (repeatable)
    #[arg(short, long = "epoch", required = true, num_args = 1..)]
    pub epochs: Vec<u64>,

    /// Only evaluate these claim ids
    #[arg(long = "claim")]
    pub claims: Vec<String>,
}

/// Arguments for the replay command.
#[derive(Debug, Parser)]
pub struct ReplayArgs {
    /// Input JSON file
    pub input: PathBuf,

    /// First epoch (ms)
    #[arg(long)]
    pub from: u64,

    /// Last epoch (ms, inclusive)
    #[arg(long)]
    pub to: u64,

    /// Step between epochs (ms)
    #[arg(long, default_value = "3600000")]
    pub step: u64,
}

/// Arguments for the clusters command.
#[derive(Debug, Parser)]
pub struct ClustersArgs {
    /// Input JSON file
    pub input: PathBuf,

    /// Only count contradictions recorded at or before this time (ms)
    #[arg(long)]
    pub at: Option<u64>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Print a named preset (default, sensitive, conservative) instead
    #[arg(long)]
    pub preset: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_command() {
        let cli = Cli::parse_from([
            "credo", "evaluate", "input.json", "--epoch", "3600000", "--epoch", "7200000",
        ]);
        match cli.command {
            Command::Evaluate(args) => assert_eq!(args.epochs, vec![3_600_000, 7_200_000]),
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_evaluate_requires_epoch() {
        assert!(Cli::try_parse_from(["credo", "evaluate", "input.json"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "credo", "-vv", "--format", "json", "--no-color", "--db", "ledger.sqlite", "config",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.db, Some(PathBuf::from("ledger.sqlite")));
    }

    #[test]
    fn test_replay_defaults() {
        let cli = Cli::parse_from(["credo", "replay", "in.json", "--from", "0", "--to", "10"]);
        match cli.command {
            Command::Replay(args) => assert_eq!(args.step, 3_600_000),
            _ => panic!("Expected Replay command"),
        }
    }
}
