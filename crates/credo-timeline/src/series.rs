//! Ordered per-(claim, signal) sample storage

use credo_domain::{ClaimId, Signal, Timestamp, TimelineSample};

/// Samples of one signal for one claim, sorted by timestamp
#[derive(Debug, Clone)]
pub(crate) struct Series {
    claim_id: ClaimId,
    signal: Signal,
    samples: Vec<TimelineSample>,
}

impl Series {
    pub(crate) fn new(claim_id: ClaimId, signal: Signal) -> Self {
        Self {
            claim_id,
            signal,
            samples: Vec::new(),
        }
    }

    pub(crate) fn samples(&self) -> &[TimelineSample] {
        &self.samples
    }

    /// Insert or replace the sample at `t`, then re-smooth from there on
    pub(crate) fn record(&mut self, t: Timestamp, raw: f64, alpha: f64) -> TimelineSample {
        let idx = match self.samples.binary_search_by_key(&t, |s| s.timestamp) {
            Ok(idx) => {
                self.samples[idx].raw = raw;
                idx
            }
            Err(idx) => {
                self.samples.insert(
                    idx,
                    TimelineSample {
                        claim_id: self.claim_id,
                        signal: self.signal,
                        timestamp: t,
                        raw,
                        smoothed: raw,
                    },
                );
                idx
            }
        };
        self.resmooth_from(idx, alpha);
        self.samples[idx]
    }

    fn resmooth_from(&mut self, start: usize, alpha: f64) {
        let mut prev = if start == 0 {
            None
        } else {
            Some(self.samples[start - 1].smoothed)
        };
        for sample in &mut self.samples[start..] {
            sample.smoothed = match prev {
                None => sample.raw,
                Some(p) => alpha * sample.raw + (1.0 - alpha) * p,
            };
            prev = Some(sample.smoothed);
        }
    }
}
