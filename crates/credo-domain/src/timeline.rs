//! Timeline samples

use crate::{ClaimId, Timestamp};
use std::fmt;

/// Scalar signal tracked over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Signal {
    /// Composite confidence
    Confidence,
    /// Mutation entropy
    Entropy,
}

impl Signal {
    /// Both signals
    pub const ALL: [Signal; 2] = [Signal::Confidence, Signal::Entropy];

    /// Get the signal name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Confidence => "confidence",
            Signal::Entropy => "entropy",
        }
    }

    /// Parse a signal from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "confidence" => Some(Signal::Confidence),
            "entropy" => Some(Signal::Entropy),
            _ => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid signal: {}", s))
    }
}

/// One recorded value of a signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSample {
    /// Claim the sample belongs to
    pub claim_id: ClaimId,
    /// Signal sampled
    pub signal: Signal,
    /// Sample time
    pub timestamp: Timestamp,
    /// Value as recorded
    pub raw: f64,
    /// Exponential moving average up to and including this sample
    pub smoothed: f64,
}
