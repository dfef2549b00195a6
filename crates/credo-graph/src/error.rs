//! Error types for graph operations

use thiserror::Error;

/// Errors that can occur while building or querying the claim graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A referenced node does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Node kind ("claim", "source", "entity")
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The operation would violate a graph invariant
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl GraphError {
    pub(crate) fn claim_not_found(id: impl ToString) -> Self {
        GraphError::NotFound {
            kind: "claim",
            id: id.to_string(),
        }
    }

    pub(crate) fn source_not_found(id: impl ToString) -> Self {
        GraphError::NotFound {
            kind: "source",
            id: id.to_string(),
        }
    }

    pub(crate) fn entity_not_found(id: impl ToString) -> Self {
        GraphError::NotFound {
            kind: "entity",
            id: id.to_string(),
        }
    }
}
