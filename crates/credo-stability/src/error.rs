//! Error types for stability classification

use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StabilityError {
    /// Unknown state name, forbidden transition or out-of-order history
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
