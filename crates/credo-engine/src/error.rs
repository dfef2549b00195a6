//! Error types for engine operations

use crate::ConfigError;
use credo_alerts::AlertError;
use credo_domain::{ClaimId, Timestamp};
use credo_drift::DriftError;
use credo_graph::GraphError;
use credo_scorer::ScorerError;
use credo_stability::StabilityError;
use credo_timeline::TimelineError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while evaluating or querying the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Graph lookup or mutation failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Scoring failed
    #[error(transparent)]
    Scorer(#[from] ScorerError),

    /// Drift analysis failed
    #[error(transparent)]
    Drift(#[from] DriftError),

    /// Timeline recording or analysis failed
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// Classification history rejected an entry
    #[error(transparent)]
    Stability(#[from] StabilityError),

    /// Alert lookup failed
    #[error(transparent)]
    Alert(#[from] AlertError),

    /// Configuration could not be used
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No record exists for the claim
    #[error("No {record} recorded for claim {claim}")]
    NoRecord {
        /// Kind of record
        record: &'static str,
        /// Claim queried
        claim: ClaimId,
    },

    /// The epoch precedes the claim's latest evaluated epoch
    #[error("Epoch {epoch} precedes latest evaluated epoch {latest} for claim {claim}")]
    StaleEpoch {
        /// Claim evaluated
        claim: ClaimId,
        /// Requested epoch
        epoch: Timestamp,
        /// Latest epoch already evaluated
        latest: Timestamp,
    },
}

/// Coarse classification of an [`EngineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// An id or record does not exist
    NotFound,
    /// The operation conflicts with recorded state
    InvalidState,
    /// Not enough samples for the requested statistic
    InsufficientData,
    /// Configuration is unusable
    Config,
}

impl ErrorKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EngineError {
    /// Coarse kind of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Graph(e) => graph_kind(e),
            EngineError::Scorer(ScorerError::Graph(e)) => graph_kind(e),
            EngineError::Scorer(ScorerError::InvalidConfig(_)) => ErrorKind::Config,
            EngineError::Drift(DriftError::Graph(e)) => graph_kind(e),
            EngineError::Drift(DriftError::NotVisible { .. }) => ErrorKind::NotFound,
            EngineError::Timeline(TimelineError::InsufficientData { .. }) => {
                ErrorKind::InsufficientData
            }
            EngineError::Timeline(TimelineError::InvalidState(_)) => ErrorKind::InvalidState,
            EngineError::Stability(StabilityError::InvalidState(_)) => ErrorKind::InvalidState,
            EngineError::Alert(AlertError::NotFound(_)) => ErrorKind::NotFound,
            EngineError::Alert(AlertError::InvalidConfig(_)) => ErrorKind::Config,
            EngineError::Config(_) => ErrorKind::Config,
            EngineError::NoRecord { .. } => ErrorKind::NotFound,
            EngineError::StaleEpoch { .. } => ErrorKind::InvalidState,
        }
    }
}

fn graph_kind(e: &GraphError) -> ErrorKind {
    match e {
        GraphError::NotFound { .. } => ErrorKind::NotFound,
        GraphError::InvalidState(_) => ErrorKind::InvalidState,
    }
}
