//! Aggregated engine configuration
//!
//! One TOML document with a section per component:
//!
//! ```toml
//! [scoring]
//! citation_saturation = 5.0
//!
//! [scoring.weights]
//! prior = 0.2
//!
//! [timeline]
//! ema_alpha = 0.3
//!
//! [stability]
//! critical_alert_count = 3
//!
//! [alerts]
//! auto_resolve = true
//!
//! [engine]
//! parallel = true
//! ```
//!
//! Every field has a default, so a partial document (or an empty one) is
//! valid.

use credo_alerts::AlertConfig;
use credo_domain::ScoreWeights;
use credo_scorer::ScorerConfig;
use credo_stability::StabilityConfig;
use credo_timeline::TimelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML for this schema
    #[error("TOML error: {0}")]
    Toml(String),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Toml(e.to_string())
    }
}

/// Orchestration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Run the per-claim pure phase on the rayon pool
    pub parallel: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Configuration for every component of the engine
///
/// # Examples
///
/// ```
/// use credo_engine::EngineConfig;
///
/// // Balanced defaults
/// let config = EngineConfig::default();
/// assert_eq!(config.stability.critical_alert_count, 3);
///
/// // Reacts to smaller movements
/// let config = EngineConfig::sensitive();
/// assert_eq!(config.timeline.sigma, 1.5);
///
/// // Needs stronger evidence of change
/// let config = EngineConfig::conservative();
/// assert_eq!(config.timeline.sigma, 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Confidence scorer
    pub scoring: ScorerConfig,

    /// Timeline engine
    pub timeline: TimelineConfig,

    /// Stability classifier
    pub stability: StabilityConfig,

    /// Alert engine
    pub alerts: AlertConfig,

    /// Orchestration
    pub engine: EngineSettings,
}

impl EngineConfig {
    /// Sensitive configuration (lower thresholds, faster smoothing)
    ///
    /// Suitable for fast-moving disputes where early warning matters more
    /// than false positives.
    ///
    /// - Anomaly test: 1.5σ, minimum deviation 0.03
    /// - Critical after 2 distinct anomalies
    /// - Drift acceleration threshold: 0.003
    pub fn sensitive() -> Self {
        Self {
            scoring: ScorerConfig::default(),
            timeline: TimelineConfig {
                ema_alpha: 0.5,
                sigma: 1.5,
                min_deviation: 0.03,
                ..TimelineConfig::default()
            },
            stability: StabilityConfig {
                critical_alert_count: 2,
                accel_epsilon: 0.003,
                confidence_std_threshold: 0.07,
                entropy_std_threshold: 0.35,
            },
            alerts: AlertConfig {
                drift_accel_threshold: 0.003,
                inflection_epsilon: 0.0003,
                tension_size_jump: 1,
                tension_weight_jump: 0.3,
                auto_resolve: true,
            },
            engine: EngineSettings::default(),
        }
    }

    /// Conservative configuration (higher thresholds, heavier smoothing)
    ///
    /// Suitable for settled records where only sustained movement should
    /// surface.
    ///
    /// - Anomaly test: 3σ, minimum deviation 0.1
    /// - Critical after 4 distinct anomalies
    /// - Mutation decay weighted more heavily than citations
    pub fn conservative() -> Self {
        Self {
            scoring: ScorerConfig {
                weights: ScoreWeights {
                    prior: 0.2,
                    credibility: 0.2,
                    citation: 0.15,
                    contradiction: 0.1,
                    verification: 0.2,
                    mutation_decay: 0.15,
                },
                ..ScorerConfig::default()
            },
            timeline: TimelineConfig {
                ema_alpha: 0.2,
                sigma: 3.0,
                min_deviation: 0.1,
                plateau_window: 4,
                ..TimelineConfig::default()
            },
            stability: StabilityConfig {
                critical_alert_count: 4,
                accel_epsilon: 0.008,
                confidence_std_threshold: 0.15,
                entropy_std_threshold: 0.7,
            },
            alerts: AlertConfig {
                drift_accel_threshold: 0.008,
                inflection_epsilon: 0.001,
                tension_size_jump: 3,
                tension_weight_jump: 0.8,
                auto_resolve: true,
            },
            engine: EngineSettings::default(),
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default()),
            "sensitive" => Some(Self::sensitive()),
            "conservative" => Some(Self::conservative()),
            _ => None,
        }
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let section = |name: &str, result: Result<(), String>| {
            result.map_err(|e| ConfigError::Invalid(format!("[{}] {}", name, e)))
        };
        section("scoring", self.scoring.validate())?;
        section("timeline", self.timeline.validate())?;
        section("stability", self.stability.validate())?;
        section("alerts", self.alerts.validate())?;
        Ok(())
    }
}
