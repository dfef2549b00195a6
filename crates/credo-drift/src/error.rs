//! Error types for drift analysis

use credo_domain::{ClaimId, Timestamp};
use credo_graph::GraphError;
use thiserror::Error;

/// Errors that can occur during drift analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriftError {
    /// Graph lookup failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The claim did not exist yet at the requested time
    #[error("Claim {claim} is not visible at {at}")]
    NotVisible {
        /// Requested claim
        claim: ClaimId,
        /// Requested time
        at: Timestamp,
    },
}
