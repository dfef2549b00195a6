//! Command implementations.

pub mod clusters;
pub mod config;
pub mod evaluate;
pub mod replay;

pub use self::clusters::execute_clusters;
pub use self::config::execute_config;
pub use self::evaluate::execute_evaluate;
pub use self::replay::execute_replay;

use crate::error::Result;
use crate::output::Formatter;
use credo_engine::EpistemicEngine;
use credo_store::SqliteLedger;
use std::path::Path;
use tracing::info;

/// Write every engine record to the ledger at `db`, if one was given.
///
/// Returns the number of records written.
pub(crate) fn export_records(
    engine: &EpistemicEngine,
    db: Option<&Path>,
    formatter: &Formatter,
) -> Result<usize> {
    let Some(path) = db else {
        return Ok(0);
    };
    let mut ledger = SqliteLedger::new(path)?;
    let written = engine.export(&mut ledger)?;
    info!(path = %path.display(), written, "Exported records");
    eprintln!(
        "{}",
        formatter.success(&format!("Exported {} record(s) to {}", written, path.display()))
    );
    Ok(written)
}
