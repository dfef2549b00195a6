//! Error types for timeline operations

use thiserror::Error;

/// Errors that can occur while recording or analysing a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Too few samples for the requested computation
    #[error("Insufficient data: {required} samples required, {available} available")]
    InsufficientData {
        /// Samples the computation needs
        required: usize,
        /// Samples currently in the window
        available: usize,
    },

    /// A value or configuration is unusable
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
