//! Stability states and classification records
//!
//! The five states describe a claim's temporal trajectory. Transitions are
//! restricted to a fixed adjacency:
//!
//! | From       | Allowed targets                  |
//! |------------|----------------------------------|
//! | Stable     | Converging, Volatile, Critical   |
//! | Converging | Stable, Volatile, Critical       |
//! | Volatile   | Converging, Diverging, Critical  |
//! | Diverging  | Volatile, Critical               |
//! | Critical   | Volatile, Diverging              |

use crate::{ClaimId, Timestamp};
use std::fmt;

/// Stability state of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StabilityState {
    /// Low variance, no anomalies
    #[default]
    Stable,
    /// Variance is shrinking toward a plateau
    Converging,
    /// Variance exceeds the volatility thresholds
    Volatile,
    /// Drift is accelerating
    Diverging,
    /// Several distinct anomalies are active at once
    Critical,
}

impl StabilityState {
    /// All states, in declaration order
    pub const ALL: [StabilityState; 5] = [
        StabilityState::Stable,
        StabilityState::Converging,
        StabilityState::Volatile,
        StabilityState::Diverging,
        StabilityState::Critical,
    ];

    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityState::Stable => "stable",
            StabilityState::Converging => "converging",
            StabilityState::Volatile => "volatile",
            StabilityState::Diverging => "diverging",
            StabilityState::Critical => "critical",
        }
    }

    /// Parse a state from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL.into_iter().find(|st| st.as_str() == lower)
    }

    /// Whether a transition from `self` to `target` is permitted
    ///
    /// Remaining in the same state is always permitted.
    pub fn can_transition_to(&self, target: StabilityState) -> bool {
        use StabilityState::*;

        if *self == target {
            return true;
        }
        matches!(
            (self, target),
            (Stable, Converging)
                | (Stable, Volatile)
                | (Stable, Critical)
                | (Converging, Stable)
                | (Converging, Volatile)
                | (Converging, Critical)
                | (Volatile, Converging)
                | (Volatile, Diverging)
                | (Volatile, Critical)
                | (Diverging, Volatile)
                | (Diverging, Critical)
                | (Critical, Volatile)
                | (Critical, Diverging)
        )
    }
}

impl fmt::Display for StabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StabilityState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid stability state: {}", s))
    }
}

/// Direction of recent variance relative to the preceding window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VarianceTrend {
    /// Recent variance is clearly lower
    Decreasing,
    /// Recent variance is clearly higher
    Increasing,
    /// Neither
    Flat,
}

impl VarianceTrend {
    /// Get the trend name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VarianceTrend::Decreasing => "decreasing",
            VarianceTrend::Increasing => "increasing",
            VarianceTrend::Flat => "flat",
        }
    }
}

impl fmt::Display for VarianceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature values a classification was derived from
///
/// Fields are `None` when the timeline did not yet hold enough samples.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeatureSnapshot {
    /// Latest raw confidence
    pub confidence: Option<f64>,
    /// Population standard deviation of confidence over the window
    pub confidence_std: Option<f64>,
    /// Confidence variance trend
    pub confidence_trend: Option<VarianceTrend>,
    /// Whether the confidence series has plateaued
    pub confidence_plateau: bool,
    /// Latest raw entropy
    pub entropy: Option<f64>,
    /// Population standard deviation of entropy over the window
    pub entropy_std: Option<f64>,
    /// Latest entropy velocity (drift velocity), per hour
    pub entropy_velocity: Option<f64>,
    /// Latest entropy acceleration (drift acceleration), per hour²
    pub drift_acceleration: Option<f64>,
    /// Number of distinct anomaly alert types active for the claim
    pub active_alert_count: usize,
}

/// One entry in a claim's classification history
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityClassification {
    /// Classified claim
    pub claim_id: ClaimId,
    /// Evaluation epoch
    pub timestamp: Timestamp,
    /// State before this epoch
    pub from: StabilityState,
    /// State after this epoch
    pub state: StabilityState,
    /// Features that produced the classification
    pub features: FeatureSnapshot,
    /// Number of the rule that fired, if any
    pub rule: Option<u8>,
    /// Human-readable explanation
    pub reason: String,
}

impl StabilityClassification {
    /// Whether the state changed at this epoch
    pub fn is_transition(&self) -> bool {
        self.from != self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StabilityState::*;

    #[test]
    fn test_adjacency_table() {
        assert!(Stable.can_transition_to(Converging));
        assert!(Stable.can_transition_to(Volatile));
        assert!(Stable.can_transition_to(Critical));
        assert!(!Stable.can_transition_to(Diverging));

        assert!(Converging.can_transition_to(Stable));
        assert!(!Converging.can_transition_to(Diverging));

        assert!(Volatile.can_transition_to(Diverging));
        assert!(!Volatile.can_transition_to(Stable));

        assert!(Diverging.can_transition_to(Volatile));
        assert!(!Diverging.can_transition_to(Stable));
        assert!(!Diverging.can_transition_to(Converging));

        assert!(Critical.can_transition_to(Volatile));
        assert!(Critical.can_transition_to(Diverging));
        assert!(!Critical.can_transition_to(Stable));
        assert!(!Critical.can_transition_to(Converging));
    }

    #[test]
    fn test_every_state_reaches_critical_except_itself() {
        for state in StabilityState::ALL {
            assert!(state.can_transition_to(Critical));
            assert!(state.can_transition_to(state));
        }
    }

    #[test]
    fn test_state_parse() {
        assert_eq!(StabilityState::parse("Volatile"), Some(Volatile));
        assert!("chaotic".parse::<StabilityState>().is_err());
        assert_eq!(StabilityState::default(), Stable);
    }
}
