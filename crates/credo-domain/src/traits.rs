//! Trait definitions for external interactions
//!
//! The core produces records for passive readers (audit, reporting,
//! anchoring). Those readers sit behind [`RecordSink`]; implementations live
//! in infrastructure crates.

use crate::{ClaimScore, EpistemicAlert, MutationMetric, StabilityClassification, TimelineSample};

/// Destination for output records
///
/// Implemented by the infrastructure layer (credo-store). Writes are keyed
/// by claim and timestamp; writing the same key twice replaces the earlier
/// record.
pub trait RecordSink {
    /// Error type for sink operations
    type Error;

    /// Persist a confidence score
    fn record_score(&mut self, score: &ClaimScore) -> Result<(), Self::Error>;

    /// Persist a mutation metric
    fn record_metric(&mut self, metric: &MutationMetric) -> Result<(), Self::Error>;

    /// Persist a timeline sample
    fn record_sample(&mut self, sample: &TimelineSample) -> Result<(), Self::Error>;

    /// Persist a stability classification
    fn record_classification(
        &mut self,
        classification: &StabilityClassification,
    ) -> Result<(), Self::Error>;

    /// Persist an alert, including its current resolution state
    fn record_alert(&mut self, alert: &EpistemicAlert) -> Result<(), Self::Error>;

    /// Open a batch; records written until [`commit_batch`](Self::commit_batch)
    /// land together or not at all. The default does nothing.
    fn begin_batch(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Make the open batch durable
    fn commit_batch(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Discard the open batch
    fn rollback_batch(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
