//! Pure transition function

use crate::{StabilityConfig, StabilityError};
use credo_domain::{FeatureSnapshot, StabilityState, VarianceTrend};
use std::fmt;

/// Transition rule, numbered by priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Too many distinct anomalies are active
    AnomalyOverload = 1,
    /// Anomalies have subsided below the Critical threshold
    CriticalRecovery = 2,
    /// Standard deviation exceeded a volatility threshold
    VolatilitySpike = 3,
    /// Variance started decreasing from a stable state
    StableSettling = 4,
    /// A converging series reached a plateau
    PlateauReached = 5,
    /// Variance reversed while converging
    VarianceReversal = 6,
    /// Drift is accelerating while entropy rises
    DriftAcceleration = 7,
    /// Variance subsided while volatile
    VolatilitySubsided = 8,
    /// Drift is decelerating
    DriftDeceleration = 9,
}

impl Rule {
    /// Priority number of the rule
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}", self.number())
    }
}

/// Outcome of one classification step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State before the step
    pub from: StabilityState,
    /// State after the step
    pub to: StabilityState,
    /// Rule that fired, `None` when the state is unchanged
    pub rule: Option<Rule>,
    /// Human-readable explanation
    pub reason: String,
}

impl Transition {
    fn fired(from: StabilityState, to: StabilityState, rule: Rule, reason: String) -> Self {
        Self {
            from,
            to,
            rule: Some(rule),
            reason,
        }
    }

    fn unchanged(state: StabilityState) -> Self {
        Self {
            from: state,
            to: state,
            rule: None,
            reason: format!("no rule fired; remains {}", state),
        }
    }

    /// Whether the state changed
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Parse a state name
///
/// # Errors
///
/// `InvalidState` for an unrecognized name.
pub fn parse_state(name: &str) -> Result<StabilityState, StabilityError> {
    StabilityState::parse(name).ok_or_else(|| {
        StabilityError::InvalidState(format!("unrecognized stability state '{}'", name))
    })
}

/// Classify from a state given by name
pub fn classify_named(
    current: &str,
    features: &FeatureSnapshot,
    config: &StabilityConfig,
) -> Result<Transition, StabilityError> {
    Ok(classify(parse_state(current)?, features, config))
}

fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// Apply the rules to `current` and the feature snapshot
///
/// The result always satisfies [`StabilityState::can_transition_to`].
///
/// # Examples
///
/// ```
/// use credo_domain::{FeatureSnapshot, StabilityState};
/// use credo_stability::{classify, StabilityConfig};
///
/// let features = FeatureSnapshot {
///     active_alert_count: 3,
///     ..Default::default()
/// };
/// let t = classify(StabilityState::Stable, &features, &StabilityConfig::default());
/// assert_eq!(t.to, StabilityState::Critical);
/// ```
pub fn classify(
    current: StabilityState,
    features: &FeatureSnapshot,
    config: &StabilityConfig,
) -> Transition {
    use StabilityState::*;

    let eps = config.accel_epsilon;
    let accel = features.drift_acceleration;
    let active = features.active_alert_count;

    // Rule 1
    if active >= config.critical_alert_count {
        if current == Critical {
            return Transition::unchanged(current);
        }
        return Transition::fired(
            current,
            Critical,
            Rule::AnomalyOverload,
            format!(
                "{} distinct anomaly alerts active (threshold {})",
                active, config.critical_alert_count
            ),
        );
    }

    match current {
        Critical => {
            // Rule 2
            if exceeds(accel, eps) {
                Transition::fired(
                    current,
                    Diverging,
                    Rule::CriticalRecovery,
                    format!(
                        "active alerts dropped to {}; drift still accelerating ({:.6} > {})",
                        active,
                        accel.unwrap_or_default(),
                        eps
                    ),
                )
            } else {
                Transition::fired(
                    current,
                    Volatile,
                    Rule::CriticalRecovery,
                    format!("active alerts dropped to {}; drift not accelerating", active),
                )
            }
        }
        Stable => {
            // Rule 3
            if exceeds(features.confidence_std, config.confidence_std_threshold) {
                return Transition::fired(
                    current,
                    Volatile,
                    Rule::VolatilitySpike,
                    format!(
                        "confidence std {:.4} > {}",
                        features.confidence_std.unwrap_or_default(),
                        config.confidence_std_threshold
                    ),
                );
            }
            if exceeds(features.entropy_std, config.entropy_std_threshold) {
                return Transition::fired(
                    current,
                    Volatile,
                    Rule::VolatilitySpike,
                    format!(
                        "entropy std {:.4} > {}",
                        features.entropy_std.unwrap_or_default(),
                        config.entropy_std_threshold
                    ),
                );
            }
            // Rule 4
            if features.confidence_trend == Some(VarianceTrend::Decreasing) {
                return Transition::fired(
                    current,
                    Converging,
                    Rule::StableSettling,
                    "confidence variance decreasing".to_string(),
                );
            }
            Transition::unchanged(current)
        }
        Converging => {
            // Rule 5
            if features.confidence_plateau {
                return Transition::fired(
                    current,
                    Stable,
                    Rule::PlateauReached,
                    "confidence plateau reached".to_string(),
                );
            }
            // Rule 6
            if features.confidence_trend == Some(VarianceTrend::Increasing) {
                return Transition::fired(
                    current,
                    Volatile,
                    Rule::VarianceReversal,
                    "confidence variance increasing again".to_string(),
                );
            }
            Transition::unchanged(current)
        }
        Volatile => {
            // Rule 7
            if exceeds(accel, eps) && exceeds(features.entropy_velocity, 0.0) {
                return Transition::fired(
                    current,
                    Diverging,
                    Rule::DriftAcceleration,
                    format!(
                        "drift acceleration {:.6} > {} with entropy rising",
                        accel.unwrap_or_default(),
                        eps
                    ),
                );
            }
            // Rule 8
            if features.confidence_trend == Some(VarianceTrend::Decreasing) {
                return Transition::fired(
                    current,
                    Converging,
                    Rule::VolatilitySubsided,
                    "confidence variance subsiding".to_string(),
                );
            }
            if features.confidence_plateau {
                return Transition::fired(
                    current,
                    Converging,
                    Rule::VolatilitySubsided,
                    "confidence plateau reached while volatile".to_string(),
                );
            }
            Transition::unchanged(current)
        }
        Diverging => {
            // Rule 9
            if accel.is_some_and(|a| a < -eps) {
                return Transition::fired(
                    current,
                    Volatile,
                    Rule::DriftDeceleration,
                    format!("drift decelerating ({:.6} < -{})", accel.unwrap_or_default(), eps),
                );
            }
            Transition::unchanged(current)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn state() -> impl Strategy<Value = StabilityState> {
        prop::sample::select(StabilityState::ALL.to_vec())
    }

    fn trend() -> impl Strategy<Value = Option<VarianceTrend>> {
        prop::option::of(prop::sample::select(vec![
            VarianceTrend::Decreasing,
            VarianceTrend::Increasing,
            VarianceTrend::Flat,
        ]))
    }

    fn features() -> impl Strategy<Value = FeatureSnapshot> {
        (
            prop::option::of(0.0f64..1.0),
            trend(),
            any::<bool>(),
            prop::option::of(0.0f64..2.0),
            prop::option::of(-1.0f64..1.0),
            prop::option::of(-0.05f64..0.05),
            0usize..6,
        )
            .prop_map(
                |(
                    confidence_std,
                    confidence_trend,
                    confidence_plateau,
                    entropy_std,
                    entropy_velocity,
                    drift_acceleration,
                    active_alert_count,
                )| FeatureSnapshot {
                    confidence: None,
                    confidence_std,
                    confidence_trend,
                    confidence_plateau,
                    entropy: None,
                    entropy_std,
                    entropy_velocity,
                    drift_acceleration,
                    active_alert_count,
                },
            )
    }

    proptest! {
        /// Property: every classification respects the adjacency table
        #[test]
        fn test_adjacency_respected(from in state(), f in features()) {
            let t = classify(from, &f, &StabilityConfig::default());
            prop_assert_eq!(t.from, from);
            prop_assert!(from.can_transition_to(t.to), "{} -> {} not permitted", from, t.to);
        }

        /// Property: three active anomalies always classify Critical
        #[test]
        fn test_overload_is_critical(from in state(), mut f in features()) {
            f.active_alert_count = f.active_alert_count.max(3);
            let t = classify(from, &f, &StabilityConfig::default());
            prop_assert_eq!(t.to, StabilityState::Critical);
        }

        /// Property: identical inputs classify identically
        #[test]
        fn test_deterministic(from in state(), f in features()) {
            let config = StabilityConfig::default();
            prop_assert_eq!(classify(from, &f, &config), classify(from, &f, &config));
        }
    }
}
