//! Pure computations over ordered sample slices
//!
//! Every function takes samples sorted by timestamp with unique timestamps,
//! which is how the engine stores them.

use crate::{DerivativeBasis, TimelineError};
use credo_domain::time::elapsed_hours;
use credo_domain::{Timestamp, TimelineSample, VarianceTrend};

/// Minimum samples for any variance-based computation
pub const MIN_VARIANCE_SAMPLES: usize = 3;

/// A rate of change stamped at the later of the two points it spans
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    /// Time of the later point
    pub timestamp: Timestamp,
    /// Change per hour
    pub value: f64,
}

/// Direction of an anomalous sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Above the trailing mean
    Spike,
    /// Below the trailing mean
    Collapse,
}

/// The latest sample deviating from the mean of the samples before it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anomaly {
    /// Spike or collapse
    pub kind: AnomalyKind,
    /// Time of the anomalous sample
    pub timestamp: Timestamp,
    /// Value of the anomalous sample
    pub value: f64,
    /// Mean of the preceding samples
    pub mean: f64,
    /// Population standard deviation of the preceding samples
    pub std_dev: f64,
    /// `value − mean`
    pub deviation: f64,
    /// Deviation the sample had to exceed
    pub threshold: f64,
}

fn require(available: usize, required: usize) -> Result<(), TimelineError> {
    if available < required {
        Err(TimelineError::InsufficientData {
            required,
            available,
        })
    } else {
        Ok(())
    }
}

/// Sample values on the given basis
pub fn values(samples: &[TimelineSample], basis: DerivativeBasis) -> Vec<f64> {
    samples
        .iter()
        .map(|s| match basis {
            DerivativeBasis::Raw => s.raw,
            DerivativeBasis::Smoothed => s.smoothed,
        })
        .collect()
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population variance, `None` for an empty slice
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Simple moving average of the raw values
pub fn sma(samples: &[TimelineSample]) -> Option<f64> {
    mean(&values(samples, DerivativeBasis::Raw))
}

/// Exponential moving average of the raw values, seeded with the first
pub fn ema(samples: &[TimelineSample], alpha: f64) -> Option<f64> {
    let mut iter = samples.iter();
    let first = iter.next()?.raw;
    Some(iter.fold(first, |acc, s| alpha * s.raw + (1.0 - alpha) * acc))
}

/// First derivative between consecutive samples
///
/// Empty for fewer than 2 samples.
pub fn velocities(samples: &[TimelineSample], basis: DerivativeBasis) -> Vec<Rate> {
    let stamped: Vec<Rate> = samples
        .iter()
        .zip(values(samples, basis))
        .map(|(s, value)| Rate {
            timestamp: s.timestamp,
            value,
        })
        .collect();
    differentiate(&stamped)
}

/// Finite differences of a stamped series, divided by elapsed hours
///
/// Pairs with no elapsed time are skipped.
pub fn differentiate(series: &[Rate]) -> Vec<Rate> {
    series
        .windows(2)
        .filter_map(|pair| {
            let hours = elapsed_hours(pair[0].timestamp, pair[1].timestamp);
            (hours > 0.0).then(|| Rate {
                timestamp: pair[1].timestamp,
                value: (pair[1].value - pair[0].value) / hours,
            })
        })
        .collect()
}

/// Population variance of the raw values
pub fn variance(samples: &[TimelineSample]) -> Result<f64, TimelineError> {
    require(samples.len(), MIN_VARIANCE_SAMPLES)?;
    Ok(population_variance(&values(samples, DerivativeBasis::Raw)).unwrap_or(0.0))
}

/// Whether the last `window` raw values have variance below `threshold`
pub fn is_plateau(
    samples: &[TimelineSample],
    window: usize,
    threshold: f64,
) -> Result<bool, TimelineError> {
    let window = window.max(MIN_VARIANCE_SAMPLES);
    require(samples.len(), window)?;
    let tail = &samples[samples.len() - window..];
    Ok(variance(tail)? < threshold)
}

/// Compare the latest raw value with the samples before it
///
/// An anomaly needs `|deviation| > sigma × std` and
/// `|deviation| > min_deviation`.
pub fn detect_anomaly(
    samples: &[TimelineSample],
    sigma: f64,
    min_deviation: f64,
) -> Result<Option<Anomaly>, TimelineError> {
    require(samples.len(), MIN_VARIANCE_SAMPLES)?;
    let (latest, preceding) = match samples.split_last() {
        Some(split) => split,
        None => return Ok(None),
    };
    let history = values(preceding, DerivativeBasis::Raw);
    let (Some(m), Some(var)) = (mean(&history), population_variance(&history)) else {
        return Ok(None);
    };
    let std_dev = var.sqrt();
    let deviation = latest.raw - m;
    let threshold = (sigma * std_dev).max(min_deviation);

    if deviation.abs() > sigma * std_dev && deviation.abs() > min_deviation {
        let kind = if deviation > 0.0 {
            AnomalyKind::Spike
        } else {
            AnomalyKind::Collapse
        };
        Ok(Some(Anomaly {
            kind,
            timestamp: latest.timestamp,
            value: latest.raw,
            mean: m,
            std_dev,
            deviation,
            threshold,
        }))
    } else {
        Ok(None)
    }
}

/// Variance of the last `window` values against the `window` before them
pub fn variance_trend(
    samples: &[TimelineSample],
    window: usize,
    ratio: f64,
) -> Result<VarianceTrend, TimelineError> {
    let window = window.max(2);
    require(samples.len(), 2 * window)?;
    let raw = values(samples, DerivativeBasis::Raw);
    let n = raw.len();
    let recent = population_variance(&raw[n - window..]).unwrap_or(0.0);
    let prior = population_variance(&raw[n - 2 * window..n - window]).unwrap_or(0.0);

    Ok(if recent < prior * ratio {
        VarianceTrend::Decreasing
    } else if recent * ratio > prior {
        VarianceTrend::Increasing
    } else {
        VarianceTrend::Flat
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use credo_domain::{ClaimId, Signal};
    use proptest::prelude::*;

    fn irregular() -> impl Strategy<Value = Vec<TimelineSample>> {
        prop::collection::vec((1u64..10_000_000, -1.0f64..1.0), 0..12).prop_map(|steps| {
            let mut t = 0;
            steps
                .into_iter()
                .map(|(gap, v)| {
                    t += gap;
                    TimelineSample {
                        claim_id: ClaimId::from_value(1),
                        signal: Signal::Entropy,
                        timestamp: t,
                        raw: v,
                        smoothed: v,
                    }
                })
                .collect()
        })
    }

    proptest! {
        /// Property: each derivative order needs one more sample, and
        /// velocity matches the hand-computed finite difference
        #[test]
        fn test_derivative_orders(samples in irregular()) {
            let v = velocities(&samples, DerivativeBasis::Raw);
            let a = differentiate(&v);
            let j = differentiate(&a);
            let n = samples.len();
            prop_assert_eq!(v.len(), n.saturating_sub(1));
            prop_assert_eq!(a.len(), n.saturating_sub(2));
            prop_assert_eq!(j.len(), n.saturating_sub(3));

            for (i, rate) in v.iter().enumerate() {
                let hours = (samples[i + 1].timestamp - samples[i].timestamp) as f64 / 3_600_000.0;
                let expected = (samples[i + 1].raw - samples[i].raw) / hours;
                prop_assert!((rate.value - expected).abs() <= 1e-9 * expected.abs().max(1.0));
                prop_assert_eq!(rate.timestamp, samples[i + 1].timestamp);
            }
        }

        /// Property: variance is never negative
        #[test]
        fn test_variance_non_negative(samples in irregular()) {
            match variance(&samples) {
                Ok(v) => prop_assert!(v >= 0.0),
                Err(TimelineError::InsufficientData { available, .. }) => prop_assert!(available < 3),
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }
    }
}
