//! Timeline configuration

use serde::{Deserialize, Serialize};

/// Default EMA smoothing factor
pub const DEFAULT_EMA_ALPHA: f64 = 0.3;

/// Default variance below which a series has plateaued (std 0.02)
pub const DEFAULT_PLATEAU_VARIANCE: f64 = 0.0004;

/// Which values derivatives are taken over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeBasis {
    /// Values as recorded
    #[default]
    Raw,
    /// EMA-smoothed values
    Smoothed,
}

/// Configuration for the timeline engine
///
/// Loaded from the `[timeline]` table of the engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// EMA smoothing factor in (0, 1]
    pub ema_alpha: f64,

    /// Trailing window size; `None` covers the full history
    pub window: Option<usize>,

    /// Basis for velocity, acceleration and jerk
    pub derivative_basis: DerivativeBasis,

    /// Variance below which the trailing samples form a plateau
    pub plateau_variance: f64,

    /// Number of trailing samples checked for a plateau (at least 3)
    pub plateau_window: usize,

    /// Deviation in standard deviations that marks a spike or collapse
    pub sigma: f64,

    /// Minimum absolute deviation for a spike or collapse
    pub min_deviation: f64,

    /// Samples per half of the variance-trend comparison (at least 2)
    pub variance_window: usize,

    /// Ratio separating a decreasing or increasing variance trend from flat
    pub convergence_ratio: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            ema_alpha: DEFAULT_EMA_ALPHA,
            window: None,
            derivative_basis: DerivativeBasis::Raw,
            plateau_variance: DEFAULT_PLATEAU_VARIANCE,
            plateau_window: 3,
            sigma: 2.0,
            min_deviation: 0.05,
            variance_window: 3,
            convergence_ratio: 0.8,
        }
    }
}

impl TimelineConfig {
    /// Check every parameter is usable
    pub fn validate(&self) -> Result<(), String> {
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(format!("ema_alpha must be in (0, 1], got {}", self.ema_alpha));
        }
        if let Some(n) = self.window {
            if n < 4 {
                return Err(format!("window must hold at least 4 samples, got {}", n));
            }
        }
        if self.plateau_window < 3 {
            return Err(format!(
                "plateau_window must be at least 3, got {}",
                self.plateau_window
            ));
        }
        if self.variance_window < 2 {
            return Err(format!(
                "variance_window must be at least 2, got {}",
                self.variance_window
            ));
        }
        for (name, value) in [
            ("plateau_variance", self.plateau_variance),
            ("sigma", self.sigma),
            ("min_deviation", self.min_deviation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }
        if !(self.convergence_ratio > 0.0 && self.convergence_ratio <= 1.0) {
            return Err(format!(
                "convergence_ratio must be in (0, 1], got {}",
                self.convergence_ratio
            ));
        }
        Ok(())
    }
}
