//! Lineage and branching summaries

use credo_domain::{ClaimId, Timestamp};

/// Drift of one edit step in a lineage
#[derive(Debug, Clone, PartialEq)]
pub struct LineageStep {
    /// Version produced by the step
    pub version_id: ClaimId,
    /// When the version was created
    pub created_at: Timestamp,
    /// Entropy of the step's edit distribution
    pub entropy: f64,
    /// Jaccard similarity with the previous version
    pub similarity: f64,
    /// Drift velocity of the step
    pub drift_velocity: Option<f64>,
}

/// Chain statistics for a full mutation lineage
#[derive(Debug, Clone, PartialEq)]
pub struct LineageReport {
    /// Last version of the lineage
    pub claim_id: ClaimId,
    /// Number of versions, root included
    pub chain_length: usize,
    /// One entry per edit step, root first
    pub steps: Vec<LineageStep>,
    /// Largest step entropy (0 for a lone root)
    pub max_step_entropy: f64,
    /// Mean step similarity, `None` for a lone root
    pub mean_similarity: Option<f64>,
    /// `1 − Σ(1 − similarity) / chain_length`, clamped to [0, 1]
    pub semantic_stability: f64,
}

impl LineageReport {
    pub(crate) fn from_steps(
        claim_id: ClaimId,
        chain_length: usize,
        steps: Vec<LineageStep>,
    ) -> Self {
        let max_step_entropy = steps.iter().map(|s| s.entropy).fold(0.0, f64::max);
        let mean_similarity = if steps.is_empty() {
            None
        } else {
            Some(steps.iter().map(|s| s.similarity).sum::<f64>() / steps.len() as f64)
        };
        let cumulative_drift: f64 = steps.iter().map(|s| 1.0 - s.similarity).sum();
        let semantic_stability = if chain_length == 0 {
            1.0
        } else {
            (1.0 - cumulative_drift / chain_length as f64).clamp(0.0, 1.0)
        };

        Self {
            claim_id,
            chain_length,
            steps,
            max_step_entropy,
            mean_similarity,
            semantic_stability,
        }
    }
}

/// Descendant counts of a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchingReport {
    /// Analysed claim
    pub claim_id: ClaimId,
    /// Direct mutations, in insertion order
    pub direct_children: Vec<ClaimId>,
    /// Mutations at any depth
    pub total_descendants: usize,
}
