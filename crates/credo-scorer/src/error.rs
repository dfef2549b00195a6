//! Error types for scoring

use credo_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while scoring a claim
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    /// Graph lookup failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Scorer configuration is invalid
    #[error("Invalid scorer configuration: {0}")]
    InvalidConfig(String),
}
