//! Credo CLI - score claims and track the stability of their credibility.

use clap::Parser;
use credo_cli::commands;
use credo_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> credo_cli::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);
    let db = cli.db.as_deref();

    match cli.command {
        Command::Evaluate(args) => commands::execute_evaluate(args, &config, db, &formatter)?,
        Command::Replay(args) => commands::execute_replay(args, &config, db, &formatter)?,
        Command::Clusters(args) => commands::execute_clusters(args, &formatter)?,
        Command::Config(args) => commands::execute_config(args, &config, &formatter)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
