//! Credo Claim Graph
//!
//! Typed claim, source and entity nodes joined by weighted evidence links
//! and claim-to-claim contradiction edges. Every other component reads from
//! this graph.
//!
//! # Guarantees
//!
//! - Link and edge endpoints exist at creation time
//! - Mutation lineages are acyclic and children never predate parents
//! - Nodes are append-only; only verification status and source
//!   credibility change in place
//!
//! # Example
//!
//! ```
//! use credo_domain::{ClaimId, ClaimNode, ClaimType, Relation, SourceCategory, SourceId, SourceNode};
//! use credo_graph::ClaimGraph;
//!
//! # fn main() -> Result<(), credo_graph::GraphError> {
//! let mut graph = ClaimGraph::new();
//! let claim = ClaimId::from_value(1);
//! let source = SourceId::from_value(2);
//!
//! graph.add_claim(ClaimNode::new(claim, "the bridge closed at noon".into(), ClaimType::Observation, 0))?;
//! graph.add_source(SourceNode::new(source, "City desk".into(), SourceCategory::Document, 0.8, 0))?;
//! graph.link(source, claim, Relation::Supports, 1.0, 10)?;
//!
//! assert_eq!(graph.supporting_links_at(claim, 10).len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cluster;
pub mod error;
pub mod graph;

pub use cluster::{ClusterIndex, ContradictionCluster};
pub use error::GraphError;
pub use graph::{ClaimGraph, GraphStatistics};
