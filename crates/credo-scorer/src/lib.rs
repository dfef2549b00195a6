//! Credo Confidence Scorer
//!
//! Computes a point-in-time composite confidence for a claim from
//! graph-derived signals:
//!
//! ```text
//! C = w1·Prior + w2·Credibility + w3·Citation − w4·Contradiction
//!     + w5·Verification − w6·MutationDecay
//! ```
//!
//! The composite is clamped to [0, 1]. Components and weights are stored on
//! every [`ClaimScore`](credo_domain::ClaimScore) so a reader can recompute
//! it.
//!
//! | Component | Source |
//! |-----------|--------|
//! | Prior | constant per claim type |
//! | Credibility | weight-averaged credibility of supporting sources |
//! | Citation | supporting-link count over a saturation constant, capped at 1 |
//! | Contradiction | `ln(1+k)/ln(1+saturation)`, k = other claims in the cluster |
//! | Verification | +1 confirmed, 0 unverified, −0.5 disputed, −1 retracted |
//! | MutationDecay | latest drift velocity, clamped non-negative |

#![warn(missing_docs)]

pub mod bayes;
pub mod components;
pub mod config;
pub mod error;
pub mod scorer;

pub use bayes::{bayesian_update, rank, BayesianUpdate, EvidenceDirection};
pub use components::{prior_for, verification_modifier};
pub use config::ScorerConfig;
pub use error::ScorerError;
pub use scorer::ConfidenceScorer;
