//! Scorer configuration

use credo_domain::ScoreWeights;
use serde::{Deserialize, Serialize};

/// Default supporting-link count at which citation density saturates
pub const DEFAULT_CITATION_SATURATION: f64 = 5.0;

/// Default cluster peer count at which the contradiction penalty saturates
pub const DEFAULT_CONTRADICTION_SATURATION: f64 = 5.0;

/// Default drift velocity (entropy per hour) at which mutation decay saturates
pub const DEFAULT_DECAY_SATURATION: f64 = 1.0;

/// Configuration for the confidence scorer
///
/// Loaded from the `[scoring]` table of the engine configuration:
///
/// ```toml
/// [scoring]
/// citation_saturation = 5.0
/// contradiction_saturation = 5.0
/// decay_saturation = 1.0
///
/// [scoring.weights]
/// prior = 0.2
/// credibility = 0.2
/// citation = 0.2
/// contradiction = 0.1
/// verification = 0.2
/// mutation_decay = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Composite weights
    pub weights: ScoreWeights,

    /// Supporting-link count at which citation reaches 1.0
    pub citation_saturation: f64,

    /// Cluster peer count at which the contradiction penalty reaches 1.0
    pub contradiction_saturation: f64,

    /// Drift velocity at which mutation decay reaches 1.0
    pub decay_saturation: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            citation_saturation: DEFAULT_CITATION_SATURATION,
            contradiction_saturation: DEFAULT_CONTRADICTION_SATURATION,
            decay_saturation: DEFAULT_DECAY_SATURATION,
        }
    }
}

impl ScorerConfig {
    /// Check weights and saturation constants
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        if self.citation_saturation.is_nan() || self.citation_saturation <= 0.0 {
            return Err(format!(
                "citation_saturation must be positive, got {}",
                self.citation_saturation
            ));
        }
        if self.contradiction_saturation.is_nan() || self.contradiction_saturation <= 0.0 {
            return Err(format!(
                "contradiction_saturation must be positive, got {}",
                self.contradiction_saturation
            ));
        }
        if self.decay_saturation.is_nan() || self.decay_saturation <= 0.0 {
            return Err(format!(
                "decay_saturation must be positive, got {}",
                self.decay_saturation
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScorerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_saturation_rejected() {
        let config = ScorerConfig {
            citation_saturation: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScorerConfig {
            contradiction_saturation: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScorerConfig {
            decay_saturation: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
