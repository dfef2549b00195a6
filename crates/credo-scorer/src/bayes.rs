//! Incremental Bayesian updates and ranking

use credo_domain::ClaimScore;
use std::cmp::Ordering;

/// Lower bound of an updated posterior
pub const POSTERIOR_FLOOR: f64 = 0.01;

/// Upper bound of an updated posterior
pub const POSTERIOR_CEILING: f64 = 0.99;

/// Odds used when the current confidence is already 1.0
const SATURATED_ODDS: f64 = 100.0;

/// Direction of a single new observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceDirection {
    /// The observation backs the claim
    Supports,
    /// The observation disputes the claim
    Contradicts,
}

/// Result of folding one observation into a confidence value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BayesianUpdate {
    /// Confidence before the update
    pub prior: f64,
    /// Likelihood ratio applied to the prior odds
    pub likelihood_ratio: f64,
    /// Confidence after the update, in [0.01, 0.99]
    pub posterior: f64,
    /// Direction of the observation
    pub direction: EvidenceDirection,
    /// Strength of the observation, clamped to [0, 1]
    pub evidence_weight: f64,
}

/// Odds-form update of a confidence value with one observation
///
/// Supporting evidence multiplies the odds by `1 + w`; contradicting
/// evidence divides them by `1 + w`.
///
/// # Examples
///
/// ```
/// use credo_scorer::{bayesian_update, EvidenceDirection};
///
/// let up = bayesian_update(0.5, 1.0, EvidenceDirection::Supports);
/// assert!((up.posterior - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn bayesian_update(
    current: f64,
    evidence_weight: f64,
    direction: EvidenceDirection,
) -> BayesianUpdate {
    let prior = current.clamp(0.0, 1.0);
    let w = evidence_weight.clamp(0.0, 1.0);
    let likelihood_ratio = match direction {
        EvidenceDirection::Supports => 1.0 + w,
        EvidenceDirection::Contradicts => 1.0 / (1.0 + w),
    };

    let prior_odds = if prior < 1.0 {
        prior / (1.0 - prior)
    } else {
        SATURATED_ODDS
    };
    let posterior_odds = prior_odds * likelihood_ratio;
    let posterior =
        (posterior_odds / (1.0 + posterior_odds)).clamp(POSTERIOR_FLOOR, POSTERIOR_CEILING);

    BayesianUpdate {
        prior,
        likelihood_ratio,
        posterior,
        direction,
        evidence_weight: w,
    }
}

/// Scores ordered by composite (highest first), ties by claim id
pub fn rank(scores: &[ClaimScore], top_n: usize) -> Vec<&ClaimScore> {
    let mut ranked: Vec<&ClaimScore> = scores.iter().collect();
    ranked.sort_by(|a, b| {
        b.composite
            .partial_cmp(&a.composite)
            .unwrap_or(Ordering::Equal)
            .then(a.claim_id.cmp(&b.claim_id))
    });
    ranked.truncate(top_n);
    ranked
}
