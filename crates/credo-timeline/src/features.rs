//! Feature snapshots assembled from a timeline

use crate::Anomaly;
use credo_domain::{Signal, VarianceTrend};

/// Everything the classifier and alert rules read from one signal
///
/// Each field is `None` (or `false`) when the window holds too few samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFeatures {
    /// Signal described
    pub signal: Signal,
    /// Samples in the window
    pub samples: usize,
    /// Latest raw value
    pub latest: Option<f64>,
    /// Latest smoothed value
    pub smoothed: Option<f64>,
    /// Simple moving average over the window
    pub sma: Option<f64>,
    /// Population standard deviation over the window
    pub std_dev: Option<f64>,
    /// Latest velocity
    pub velocity: Option<f64>,
    /// Latest acceleration
    pub acceleration: Option<f64>,
    /// Acceleration before the latest one
    pub previous_acceleration: Option<f64>,
    /// Latest jerk
    pub jerk: Option<f64>,
    /// Whether the trailing samples have plateaued
    pub plateau: bool,
    /// Variance trend
    pub trend: Option<VarianceTrend>,
    /// Latest-sample anomaly, if any
    pub anomaly: Option<Anomaly>,
}

impl SignalFeatures {
    /// Features of a signal with no samples
    pub fn empty(signal: Signal) -> Self {
        Self {
            signal,
            samples: 0,
            latest: None,
            smoothed: None,
            sma: None,
            std_dev: None,
            velocity: None,
            acceleration: None,
            previous_acceleration: None,
            jerk: None,
            plateau: false,
            trend: None,
            anomaly: None,
        }
    }
}

/// Features of both signals of a claim
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFeatures {
    /// Composite confidence
    pub confidence: SignalFeatures,
    /// Mutation entropy
    pub entropy: SignalFeatures,
}

impl TimelineFeatures {
    /// Features of one signal
    pub fn get(&self, signal: Signal) -> &SignalFeatures {
        match signal {
            Signal::Confidence => &self.confidence,
            Signal::Entropy => &self.entropy,
        }
    }
}
