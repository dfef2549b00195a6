//! Classifier configuration

use serde::{Deserialize, Serialize};

/// Thresholds for the stability rules
///
/// Loaded from the `[stability]` table of the engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Distinct active anomaly alert types that force Critical
    pub critical_alert_count: usize,

    /// Drift acceleration magnitude treated as accelerating
    pub accel_epsilon: f64,

    /// Confidence standard deviation above which a claim is volatile
    pub confidence_std_threshold: f64,

    /// Entropy standard deviation above which a claim is volatile
    pub entropy_std_threshold: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            critical_alert_count: 3,
            accel_epsilon: 0.005,
            confidence_std_threshold: 0.10,
            entropy_std_threshold: 0.5,
        }
    }
}

impl StabilityConfig {
    /// Check thresholds are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.critical_alert_count == 0 {
            return Err("critical_alert_count must be at least 1".to_string());
        }
        for (name, value) in [
            ("accel_epsilon", self.accel_epsilon),
            ("confidence_std_threshold", self.confidence_std_threshold),
            ("entropy_std_threshold", self.entropy_std_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }
        Ok(())
    }
}
