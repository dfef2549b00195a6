//! Credo Domain Layer
//!
//! This crate contains the data model shared by every Credo component.
//! It has no external dependencies beyond `uuid` (and an optional `serde`
//! feature for configuration-facing value types) and defines the node and
//! record types, the stability-state adjacency, and the trait seams that
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Claim**: an assertion under evaluation; corrections are new claims
//!   linked by `mutation_parent`
//! - **Source**: something that asserts or disputes a claim, with a
//!   credibility prior
//! - **Evidence link**: a weighted source → claim edge (supports,
//!   contradicts, neutral)
//! - **Contradiction edge**: a weighted claim ↔ claim conflict
//! - **Records**: scores, mutation metrics, timeline samples, stability
//!   classifications and alerts, all keyed by claim id and timestamp
//!
//! ## Architecture
//!
//! - Pure data and invariants only
//! - Algorithms live in the component crates (`credo-scorer`,
//!   `credo-timeline`, ...)
//! - Trait definitions for the export seam live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alert;
pub mod claim;
pub mod entity;
pub mod evidence;
pub mod id;
pub mod mutation;
pub mod score;
pub mod source;
pub mod stability;
pub mod time;
pub mod timeline;
pub mod traits;

// Re-exports for convenience
pub use alert::{AlertId, AlertType, EpistemicAlert, Severity};
pub use claim::{ClaimNode, ClaimType, VerificationStatus};
pub use entity::EntityNode;
pub use evidence::{ContradictionEdge, EvidenceLink, Relation};
pub use id::{ClaimId, EntityId, SourceId};
pub use mutation::{EditDistribution, MutationMetric};
pub use score::{ClaimScore, ScoreComponents, ScoreWeights};
pub use source::{SourceCategory, SourceNode};
pub use stability::{FeatureSnapshot, StabilityClassification, StabilityState, VarianceTrend};
pub use time::Timestamp;
pub use timeline::{Signal, TimelineSample};
