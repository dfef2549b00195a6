//! Epistemic alerts
//!
//! Alerts are append-only. Resolution sets a flag and a timestamp; records
//! are never deleted.

use crate::{ClaimId, Timestamp};
use std::fmt;

/// Sequential alert identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlertId(pub u64);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Informational
    Info,
    /// Needs attention
    Warning,
    /// Needs immediate attention
    Critical,
}

impl Severity {
    /// Get the severity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Parse a severity from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule that produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertType {
    /// Entropy jumped above its trailing mean
    EntropySpike,
    /// Entropy dropped below its trailing mean
    EntropyCollapse,
    /// Confidence dropped below its trailing mean
    ConfidenceCollapse,
    /// Confidence jumped above its trailing mean
    ConfidenceSurge,
    /// Entropy acceleration magnitude exceeded the threshold
    DriftAcceleration,
    /// Entropy acceleration changed sign
    DriftInflection,
    /// Contradiction cluster grew sharply
    TensionSurge,
    /// Stability state changed
    StabilityTransition,
    /// Stability state is Critical
    CriticalState,
}

impl AlertType {
    /// All alert types, in declaration order
    pub const ALL: [AlertType; 9] = [
        AlertType::EntropySpike,
        AlertType::EntropyCollapse,
        AlertType::ConfidenceCollapse,
        AlertType::ConfidenceSurge,
        AlertType::DriftAcceleration,
        AlertType::DriftInflection,
        AlertType::TensionSurge,
        AlertType::StabilityTransition,
        AlertType::CriticalState,
    ];

    /// Fixed severity of the rule
    pub fn severity(&self) -> Severity {
        match self {
            AlertType::EntropySpike
            | AlertType::ConfidenceSurge
            | AlertType::DriftAcceleration
            | AlertType::TensionSurge => Severity::Warning,
            AlertType::EntropyCollapse
            | AlertType::ConfidenceCollapse
            | AlertType::CriticalState => Severity::Critical,
            AlertType::DriftInflection | AlertType::StabilityTransition => Severity::Info,
        }
    }

    /// Whether the rule watches signals rather than classifier state
    ///
    /// Only anomaly alerts count toward the Critical threshold.
    pub fn is_anomaly(&self) -> bool {
        !matches!(self, AlertType::StabilityTransition | AlertType::CriticalState)
    }

    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::EntropySpike => "entropy_spike",
            AlertType::EntropyCollapse => "entropy_collapse",
            AlertType::ConfidenceCollapse => "confidence_collapse",
            AlertType::ConfidenceSurge => "confidence_surge",
            AlertType::DriftAcceleration => "drift_acceleration",
            AlertType::DriftInflection => "drift_inflection",
            AlertType::TensionSurge => "tension_surge",
            AlertType::StabilityTransition => "stability_transition",
            AlertType::CriticalState => "critical_state",
        }
    }

    /// Parse a type from its name
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower)
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid alert type: {}", s))
    }
}

/// A severity-tagged alert record
#[derive(Debug, Clone, PartialEq)]
pub struct EpistemicAlert {
    /// Sequential identifier
    pub id: AlertId,
    /// Claim the alert concerns, `None` for system-wide alerts
    pub claim_id: Option<ClaimId>,
    /// Rule that fired
    pub alert_type: AlertType,
    /// Severity of the rule
    pub severity: Severity,
    /// Evaluation epoch
    pub timestamp: Timestamp,
    /// Value that triggered the rule
    pub value: f64,
    /// Threshold the value was compared against
    pub threshold: f64,
    /// Human-readable description
    pub message: String,
    /// Whether the alert has been resolved
    pub resolved: bool,
    /// When the alert was resolved
    pub resolved_at: Option<Timestamp>,
}

impl EpistemicAlert {
    /// Mark the alert resolved at `at`; already-resolved alerts are untouched
    pub fn resolve(&mut self, at: Timestamp) -> bool {
        if self.resolved {
            return false;
        }
        self.resolved = true;
        self.resolved_at = Some(at);
        true
    }
}
