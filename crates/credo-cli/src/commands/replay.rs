//! Replay command implementation.

use crate::cli::ReplayArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::input::InputDocument;
use crate::output::Formatter;
use credo_domain::Timestamp;
use credo_engine::{ClaimSelection, EpistemicEngine, EpochReport};
use std::path::Path;

/// Execute the replay command.
pub fn execute_replay(
    args: ReplayArgs,
    config: &Config,
    db: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    let epochs = epoch_range(args.from, args.to, args.step)?;
    let graph = InputDocument::from_file(&args.input)?.into_graph()?;
    let mut engine = EpistemicEngine::with_graph(config.engine.clone(), graph)?;

    let reports: Vec<EpochReport> = epochs
        .into_iter()
        .map(|t| engine.evaluate_epoch(t, &ClaimSelection::All))
        .collect();

    println!("{}", formatter.format_reports(&reports)?);
    if formatter.format() == crate::config::OutputFormat::Table {
        println!("{}", engine.metrics().summary());
    }
    super::export_records(&engine, db, formatter)?;
    Ok(())
}

/// Epochs from `from` to `to` inclusive, `step` apart.
pub(crate) fn epoch_range(from: Timestamp, to: Timestamp, step: u64) -> Result<Vec<Timestamp>> {
    if step == 0 {
        return Err(CliError::InvalidInput("step must be positive".to_string()));
    }
    if from > to {
        return Err(CliError::InvalidInput(format!(
            "range start {} is after its end {}",
            from, to
        )));
    }
    let step = usize::try_from(step)
        .map_err(|_| CliError::InvalidInput(format!("step {} is too large", step)))?;
    Ok((from..=to).step_by(step).collect())
}
