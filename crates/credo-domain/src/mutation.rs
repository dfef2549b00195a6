//! Mutation metrics
//!
//! A mutation metric describes how much a claim's text moved relative to its
//! mutation parent: the entropy of the edit-operation distribution, the rate
//! at which that entropy changes along the lineage, and the token overlap
//! with the parent.

use crate::{ClaimId, Timestamp};

/// Normalized distribution of token edit operations
///
/// Fractions sum to 1.0 when any tokens were aligned, and are all zero when
/// both texts were empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EditDistribution {
    /// Fraction of operations that inserted a token
    pub insert: f64,
    /// Fraction of operations that deleted a token
    pub delete: f64,
    /// Fraction of operations that substituted a token
    pub substitute: f64,
    /// Fraction of operations that kept a token
    pub unchanged: f64,
}

impl EditDistribution {
    /// The four fractions in a fixed order (insert, delete, substitute, unchanged)
    pub fn as_array(&self) -> [f64; 4] {
        [self.insert, self.delete, self.substitute, self.unchanged]
    }

    /// Shannon entropy of the distribution in bits
    ///
    /// Zero-probability operations contribute nothing. The result lies in
    /// [0.0, 2.0].
    pub fn entropy(&self) -> f64 {
        let h: f64 = self
            .as_array()
            .iter()
            .filter(|p| **p > 0.0)
            .map(|p| -p * p.log2())
            .sum();
        h.max(0.0)
    }
}

/// Drift measurement for a claim at one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct MutationMetric {
    /// Claim the metric is recorded for
    pub claim_id: ClaimId,

    /// Evaluation epoch
    pub timestamp: Timestamp,

    /// Lineage version analysed (the claim's lineage head at `timestamp`)
    pub version_id: ClaimId,

    /// Number of ancestors of the analysed version
    pub depth: usize,

    /// Entropy of the version's edit distribution, always >= 0
    pub entropy: f64,

    /// Entropy change per hour relative to the parent version
    ///
    /// `None` for roots and for versions created at the same instant as
    /// their parent.
    pub drift_velocity: Option<f64>,

    /// Jaccard similarity of token sets with the parent, in [0.0, 1.0]
    ///
    /// `None` for roots. Undefined is not the same as total divergence.
    pub lineage_similarity: Option<f64>,

    /// Edit-operation distribution the entropy was computed from
    pub distribution: EditDistribution,
}

impl MutationMetric {
    /// Metric for a root version: zero entropy, no similarity, no velocity
    pub fn root(claim_id: ClaimId, timestamp: Timestamp, version_id: ClaimId) -> Self {
        Self {
            claim_id,
            timestamp,
            version_id,
            depth: 0,
            entropy: 0.0,
            drift_velocity: None,
            lineage_similarity: None,
            distribution: EditDistribution::default(),
        }
    }
}
