//! Alert rule thresholds

use serde::{Deserialize, Serialize};

/// Thresholds and behaviour of the alert rules
///
/// Loaded from the `[alerts]` table of the engine configuration. The 2σ
/// spike and collapse thresholds live in the timeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Entropy acceleration magnitude that raises `drift_acceleration`
    pub drift_accel_threshold: f64,

    /// Minimum acceleration magnitude on both sides of an inflection
    pub inflection_epsilon: f64,

    /// Cluster size growth that raises `tension_surge`
    pub tension_size_jump: usize,

    /// Cluster weight growth that raises `tension_surge`
    pub tension_weight_jump: f64,

    /// Resolve a claim's alerts once their rule stops firing
    pub auto_resolve: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            drift_accel_threshold: 0.005,
            inflection_epsilon: 0.0005,
            tension_size_jump: 2,
            tension_weight_jump: 0.5,
            auto_resolve: true,
        }
    }
}

impl AlertConfig {
    /// Check thresholds are usable
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("drift_accel_threshold", self.drift_accel_threshold),
            ("inflection_epsilon", self.inflection_epsilon),
            ("tension_weight_jump", self.tension_weight_jump),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }
        if self.tension_size_jump == 0 {
            return Err("tension_size_jump must be at least 1".to_string());
        }
        Ok(())
    }
}
