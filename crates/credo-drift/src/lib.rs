//! Credo Mutation & Drift Analyzer
//!
//! Measures how a claim's text moves along its mutation lineage.
//!
//! For a version with a parent, the texts are lowercased, split on
//! whitespace and aligned with a token-level Levenshtein alignment. The
//! counts of insert, delete, substitute and unchanged operations form a
//! distribution whose Shannon entropy `H = −Σ p·log2 p` lies in [0, 2].
//!
//! - **Drift velocity**: `(H_version − H_parent) / elapsed hours`, undefined
//!   for roots and zero elapsed time
//! - **Lineage similarity**: Jaccard overlap of token sets with the parent,
//!   undefined for roots
//!
//! A root has entropy exactly 0.

#![warn(missing_docs)]

pub mod analyzer;
pub mod error;
pub mod report;
pub mod tokens;

pub use analyzer::{DriftAnalyzer, VersionDrift};
pub use error::DriftError;
pub use report::{BranchingReport, LineageReport, LineageStep};
pub use tokens::{edit_distribution, jaccard_similarity, tokenize, EditCounts};
