//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::input::{claim_id, InputDocument};
use crate::output::Formatter;
use credo_engine::{ClaimSelection, EpistemicEngine, EpochReport};
use std::path::Path;

/// Execute the evaluate command.
///
/// Epochs run in the order given; an epoch earlier than one already
/// evaluated is reported as a per-claim failure.
pub fn execute_evaluate(
    args: EvaluateArgs,
    config: &Config,
    db: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    let selection = parse_selection(&args.claims)?;
    let graph = InputDocument::from_file(&args.input)?.into_graph()?;
    let mut engine = EpistemicEngine::with_graph(config.engine.clone(), graph)?;

    let reports: Vec<EpochReport> = args
        .epochs
        .iter()
        .map(|&t| engine.evaluate_epoch(t, &selection))
        .collect();

    println!("{}", formatter.format_reports(&reports)?);
    super::export_records(&engine, db, formatter)?;
    Ok(())
}

/// Build a selection from `--claim` arguments; none selects every claim.
pub(crate) fn parse_selection(claims: &[String]) -> Result<ClaimSelection> {
    if claims.is_empty() {
        return Ok(ClaimSelection::All);
    }
    let ids = claims
        .iter()
        .map(|s| claim_id(s))
        .collect::<Result<Vec<_>>>()?;
    Ok(ClaimSelection::Claims(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use credo_domain::ClaimId;

    #[test]
    fn test_empty_selection_is_all() {
        assert_eq!(parse_selection(&[]).unwrap(), ClaimSelection::All);
    }

    #[test]
    fn test_selection_parses_ids() {
        let id = ClaimId::from_value(42);
        let selection = parse_selection(&[id.to_string()]).unwrap();
        assert_eq!(selection, ClaimSelection::one(id));
    }

    #[test]
    fn test_selection_rejects_garbage() {
        let result = parse_selection(&["claim-1".to_string()]);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
