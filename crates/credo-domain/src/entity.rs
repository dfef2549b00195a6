//! Entity nodes
//!
//! Entities are the people, organizations and places that claims mention.
//! Mentions support co-occurrence queries and do not affect scoring.

use crate::{EntityId, Timestamp};

/// An entity node in the evidence graph
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Free-form kind, e.g. "person", "organization", "place"
    pub kind: String,

    /// When this entity was registered
    pub created_at: Timestamp,
}

impl EntityNode {
    /// Create a new entity node
    pub fn new(id: EntityId, name: String, kind: String, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            kind,
            created_at,
        }
    }
}
