//! Timeline engine over all claims and signals

use crate::analysis::{self, Anomaly, Rate};
use crate::series::Series;
use crate::{SignalFeatures, TimelineConfig, TimelineError, TimelineFeatures};
use credo_domain::{ClaimId, Signal, Timestamp, TimelineSample, VarianceTrend};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-(claim, signal) time series with lazily derived quantities
///
/// # Examples
///
/// ```
/// use credo_domain::{ClaimId, Signal};
/// use credo_timeline::{TimelineConfig, TimelineEngine};
///
/// # fn main() -> Result<(), credo_timeline::TimelineError> {
/// let mut timeline = TimelineEngine::new(TimelineConfig::default())?;
/// let claim = ClaimId::from_value(1);
///
/// timeline.record(claim, Signal::Confidence, 0, 0.4)?;
/// assert_eq!(timeline.velocity(claim, Signal::Confidence), None);
///
/// timeline.record(claim, Signal::Confidence, 3_600_000, 0.6)?;
/// let v = timeline.velocity(claim, Signal::Confidence).unwrap();
/// assert!((v - 0.2).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TimelineEngine {
    config: TimelineConfig,
    series: BTreeMap<(ClaimId, Signal), Series>,
}

impl TimelineEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: TimelineConfig) -> Result<Self, TimelineError> {
        config.validate().map_err(TimelineError::InvalidState)?;
        Ok(Self {
            config,
            series: BTreeMap::new(),
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Record a raw value
    ///
    /// A sample at an existing timestamp is replaced, and smoothed values
    /// are recomputed from the insertion point forward.
    pub fn record(
        &mut self,
        claim: ClaimId,
        signal: Signal,
        t: Timestamp,
        raw: f64,
    ) -> Result<TimelineSample, TimelineError> {
        if !raw.is_finite() {
            return Err(TimelineError::InvalidState(format!(
                "{} sample for {} at {} is not finite",
                signal, claim, t
            )));
        }
        let sample = self
            .series
            .entry((claim, signal))
            .or_insert_with(|| Series::new(claim, signal))
            .record(t, raw, self.config.ema_alpha);
        debug!(%claim, %signal, t, raw, smoothed = sample.smoothed, "Recorded timeline sample");
        Ok(sample)
    }

    /// Record one raw value per signal at the same epoch
    ///
    /// Every value is checked before any is recorded, so a rejected batch
    /// leaves the timeline untouched.
    pub fn record_all(
        &mut self,
        claim: ClaimId,
        t: Timestamp,
        values: &[(Signal, f64)],
    ) -> Result<Vec<TimelineSample>, TimelineError> {
        if let Some((signal, _)) = values.iter().find(|(_, raw)| !raw.is_finite()) {
            return Err(TimelineError::InvalidState(format!(
                "{} sample for {} at {} is not finite",
                signal, claim, t
            )));
        }
        values
            .iter()
            .map(|&(signal, raw)| self.record(claim, signal, t, raw))
            .collect()
    }

    /// Full history of a signal
    pub fn samples(&self, claim: ClaimId, signal: Signal) -> &[TimelineSample] {
        self.series
            .get(&(claim, signal))
            .map(Series::samples)
            .unwrap_or(&[])
    }

    /// Trailing window of a signal
    pub fn window(&self, claim: ClaimId, signal: Signal) -> &[TimelineSample] {
        let all = self.samples(claim, signal);
        match self.config.window {
            Some(n) if all.len() > n => &all[all.len() - n..],
            _ => all,
        }
    }

    /// Latest sample
    pub fn latest(&self, claim: ClaimId, signal: Signal) -> Option<&TimelineSample> {
        self.samples(claim, signal).last()
    }

    /// Claims with at least one sample, in id order
    pub fn claims(&self) -> Vec<ClaimId> {
        let mut ids: Vec<ClaimId> = self.series.keys().map(|(c, _)| *c).collect();
        ids.dedup();
        ids
    }

    /// Simple moving average over the window
    pub fn sma(&self, claim: ClaimId, signal: Signal) -> Option<f64> {
        analysis::sma(self.window(claim, signal))
    }

    /// Exponential moving average over the window
    pub fn ema(&self, claim: ClaimId, signal: Signal) -> Option<f64> {
        analysis::ema(self.window(claim, signal), self.config.ema_alpha)
    }

    /// Velocity series over the window
    pub fn velocities(&self, claim: ClaimId, signal: Signal) -> Vec<Rate> {
        analysis::velocities(self.window(claim, signal), self.config.derivative_basis)
    }

    /// Acceleration series over the window
    pub fn accelerations(&self, claim: ClaimId, signal: Signal) -> Vec<Rate> {
        analysis::differentiate(&self.velocities(claim, signal))
    }

    /// Jerk series over the window
    pub fn jerks(&self, claim: ClaimId, signal: Signal) -> Vec<Rate> {
        analysis::differentiate(&self.accelerations(claim, signal))
    }

    /// Latest velocity, `None` with fewer than 2 samples
    pub fn velocity(&self, claim: ClaimId, signal: Signal) -> Option<f64> {
        self.velocities(claim, signal).last().map(|r| r.value)
    }

    /// Latest acceleration, `None` with fewer than 3 samples
    pub fn acceleration(&self, claim: ClaimId, signal: Signal) -> Option<f64> {
        self.accelerations(claim, signal).last().map(|r| r.value)
    }

    /// Latest jerk, `None` with fewer than 4 samples
    pub fn jerk(&self, claim: ClaimId, signal: Signal) -> Option<f64> {
        self.jerks(claim, signal).last().map(|r| r.value)
    }

    /// Population variance over the window
    pub fn variance(&self, claim: ClaimId, signal: Signal) -> Result<f64, TimelineError> {
        analysis::variance(self.window(claim, signal))
    }

    /// Population standard deviation over the window
    pub fn std_dev(&self, claim: ClaimId, signal: Signal) -> Result<f64, TimelineError> {
        self.variance(claim, signal).map(f64::sqrt)
    }

    /// Whether the trailing samples have plateaued
    pub fn is_plateau(&self, claim: ClaimId, signal: Signal) -> Result<bool, TimelineError> {
        analysis::is_plateau(
            self.window(claim, signal),
            self.config.plateau_window,
            self.config.plateau_variance,
        )
    }

    /// Spike or collapse of the latest sample
    pub fn detect_anomaly(
        &self,
        claim: ClaimId,
        signal: Signal,
    ) -> Result<Option<Anomaly>, TimelineError> {
        analysis::detect_anomaly(
            self.window(claim, signal),
            self.config.sigma,
            self.config.min_deviation,
        )
    }

    /// Recent variance relative to the preceding window
    pub fn variance_trend(
        &self,
        claim: ClaimId,
        signal: Signal,
    ) -> Result<VarianceTrend, TimelineError> {
        analysis::variance_trend(
            self.window(claim, signal),
            self.config.variance_window,
            self.config.convergence_ratio,
        )
    }

    /// Feature snapshot of one signal
    ///
    /// Quantities needing more samples than the window holds are left
    /// unset.
    pub fn signal_features(&self, claim: ClaimId, signal: Signal) -> SignalFeatures {
        let window = self.window(claim, signal);
        if window.is_empty() {
            return SignalFeatures::empty(signal);
        }
        let accelerations = self.accelerations(claim, signal);
        let previous_acceleration = accelerations
            .len()
            .checked_sub(2)
            .map(|i| accelerations[i].value);

        SignalFeatures {
            signal,
            samples: window.len(),
            latest: window.last().map(|s| s.raw),
            smoothed: window.last().map(|s| s.smoothed),
            sma: self.sma(claim, signal),
            std_dev: self.std_dev(claim, signal).ok(),
            velocity: self.velocity(claim, signal),
            acceleration: accelerations.last().map(|r| r.value),
            previous_acceleration,
            jerk: self.jerk(claim, signal),
            plateau: self.is_plateau(claim, signal).unwrap_or(false),
            trend: self.variance_trend(claim, signal).ok(),
            anomaly: self.detect_anomaly(claim, signal).ok().flatten(),
        }
    }

    /// Feature snapshots of both signals
    pub fn features(&self, claim: ClaimId) -> TimelineFeatures {
        TimelineFeatures {
            confidence: self.signal_features(claim, Signal::Confidence),
            entropy: self.signal_features(claim, Signal::Entropy),
        }
    }
}
