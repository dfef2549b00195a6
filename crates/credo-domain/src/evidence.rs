//! Evidence links and contradiction edges
//!
//! Evidence links connect a source to a claim it supports, contradicts or
//! merely mentions. Contradiction edges connect two claims that cannot both
//! hold; contradiction clusters are computed over them.

use crate::{ClaimId, SourceId, Timestamp};
use std::fmt;

/// How a source relates to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Relation {
    /// The source backs the claim
    Supports,
    /// The source disputes the claim
    Contradicts,
    /// The source mentions the claim without taking a side
    Neutral,
}

impl Relation {
    /// Get the relation name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Supports => "supports",
            Relation::Contradicts => "contradicts",
            Relation::Neutral => "neutral",
        }
    }

    /// Parse a relation from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "supports" => Some(Relation::Supports),
            "contradicts" => Some(Relation::Contradicts),
            "neutral" => Some(Relation::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Relation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid relation: {}", s))
    }
}

/// A weighted source → claim edge
///
/// Multiple links between the same pair are allowed; each is a distinct
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceLink {
    /// Asserting source
    pub source_id: SourceId,

    /// Target claim
    pub claim_id: ClaimId,

    /// Relation of the source to the claim
    pub relation: Relation,

    /// Link quality in [0.0, 1.0]
    pub weight: f64,

    /// When the link was observed
    pub created_at: Timestamp,
}

impl EvidenceLink {
    /// Create a new evidence link
    pub fn new(
        source_id: SourceId,
        claim_id: ClaimId,
        relation: Relation,
        weight: f64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            source_id,
            claim_id,
            relation,
            weight,
            created_at,
        }
    }

    /// Whether this link supports its claim
    pub fn is_supporting(&self) -> bool {
        self.relation == Relation::Supports
    }

    /// Whether the source disputes the claim
    pub fn is_contradicting(&self) -> bool {
        self.relation == Relation::Contradicts
    }
}

/// A weighted claim ↔ claim contradiction
///
/// Edges are undirected. `claim_a` and `claim_b` are stored in the order
/// they were given.
#[derive(Debug, Clone, PartialEq)]
pub struct ContradictionEdge {
    /// First claim
    pub claim_a: ClaimId,

    /// Second claim
    pub claim_b: ClaimId,

    /// Strength of the conflict in [0.0, 1.0]
    pub weight: f64,

    /// When the conflict was observed
    pub created_at: Timestamp,
}

impl ContradictionEdge {
    /// Create a new contradiction edge
    pub fn new(claim_a: ClaimId, claim_b: ClaimId, weight: f64, created_at: Timestamp) -> Self {
        Self {
            claim_a,
            claim_b,
            weight,
            created_at,
        }
    }

    /// Whether the edge touches the given claim
    pub fn touches(&self, claim: ClaimId) -> bool {
        self.claim_a == claim || self.claim_b == claim
    }

    /// The endpoint opposite `claim`, if the edge touches it
    pub fn other(&self, claim: ClaimId) -> Option<ClaimId> {
        if self.claim_a == claim {
            Some(self.claim_b)
        } else if self.claim_b == claim {
            Some(self.claim_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parse() {
        assert_eq!(Relation::parse("SUPPORTS"), Some(Relation::Supports));
        assert!("refutes".parse::<Relation>().is_err());
    }

    #[test]
    fn test_edge_endpoints() {
        let a = ClaimId::from_value(1);
        let b = ClaimId::from_value(2);
        let c = ClaimId::from_value(3);
        let edge = ContradictionEdge::new(a, b, 0.5, 0);

        assert!(edge.touches(a));
        assert!(!edge.touches(c));
        assert_eq!(edge.other(a), Some(b));
        assert_eq!(edge.other(b), Some(a));
        assert_eq!(edge.other(c), None);
    }
}
