//! Error types for alert operations

use credo_domain::AlertId;
use thiserror::Error;

/// Errors that can occur in the alert engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    /// No alert with this id
    #[error("Alert not found: {0}")]
    NotFound(AlertId),

    /// Alert configuration is invalid
    #[error("Invalid alert configuration: {0}")]
    InvalidConfig(String),
}
