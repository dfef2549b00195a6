//! Clusters command implementation.

use crate::cli::ClustersArgs;
use crate::error::Result;
use crate::input::InputDocument;
use crate::output::Formatter;

/// Execute the clusters command.
pub fn execute_clusters(args: ClustersArgs, formatter: &Formatter) -> Result<()> {
    let graph = InputDocument::from_file(&args.input)?.into_graph()?;
    let clusters = match args.at {
        Some(t) => graph.find_contradiction_clusters_at(t),
        None => graph.find_contradiction_clusters(),
    };
    println!("{}", formatter.format_clusters(&clusters)?);
    Ok(())
}
