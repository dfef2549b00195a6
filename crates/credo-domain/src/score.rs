//! Confidence score records and composite weights

use crate::{ClaimId, Timestamp};

/// Weights of the six composite components
///
/// The composite is
/// `prior·P + credibility·Cr + citation·Ci − contradiction·Co + verification·V − mutation_decay·D`.
/// Weights are non-negative and sum to 1.0; the two penalty terms are
/// subtracted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreWeights {
    /// Weight of the claim-type prior
    pub prior: f64,
    /// Weight of the supporting-source credibility average
    pub credibility: f64,
    /// Weight of the citation density
    pub citation: f64,
    /// Weight of the contradiction penalty
    pub contradiction: f64,
    /// Weight of the verification modifier
    pub verification: f64,
    /// Weight of the mutation-decay penalty
    pub mutation_decay: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            prior: 0.2,
            credibility: 0.2,
            citation: 0.2,
            contradiction: 0.1,
            verification: 0.2,
            mutation_decay: 0.1,
        }
    }
}

impl ScoreWeights {
    /// Tolerance on the weight sum
    pub const SUM_TOLERANCE: f64 = 1e-6;

    /// Sum of all six weights
    pub fn sum(&self) -> f64 {
        self.prior
            + self.credibility
            + self.citation
            + self.contradiction
            + self.verification
            + self.mutation_decay
    }

    /// Check that every weight is non-negative and the sum is 1.0
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("prior", self.prior),
            ("credibility", self.credibility),
            ("citation", self.citation),
            ("contradiction", self.contradiction),
            ("verification", self.verification),
            ("mutation_decay", self.mutation_decay),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("weight '{}' must be a non-negative number, got {}", name, w));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(format!("weights must sum to 1.0, got {:.6}", sum));
        }
        Ok(())
    }
}

/// Raw component values behind a composite score
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreComponents {
    /// Claim-type prior
    pub prior: f64,
    /// Weighted average credibility of supporting sources
    pub credibility: f64,
    /// Supporting-link density, capped at 1.0
    pub citation: f64,
    /// Log-scaled contradiction-cluster penalty, capped at 1.0
    pub contradiction: f64,
    /// Signed verification modifier in [-1.0, 1.0]
    pub verification: f64,
    /// Non-negative drift velocity
    pub mutation_decay: f64,
}

impl ScoreComponents {
    /// Weighted composite before clamping
    pub fn weighted_sum(&self, w: &ScoreWeights) -> f64 {
        w.prior * self.prior + w.credibility * self.credibility + w.citation * self.citation
            - w.contradiction * self.contradiction
            + w.verification * self.verification
            - w.mutation_decay * self.mutation_decay
    }
}

/// Composite confidence of a claim at one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimScore {
    /// Scored claim
    pub claim_id: ClaimId,
    /// Evaluation epoch
    pub timestamp: Timestamp,
    /// Component values
    pub components: ScoreComponents,
    /// Weights used
    pub weights: ScoreWeights,
    /// Composite clamped to [0.0, 1.0]
    pub composite: f64,
}
