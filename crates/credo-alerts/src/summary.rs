//! Alert log summary

use credo_domain::{AlertType, Severity};
use std::collections::BTreeMap;

/// Counts over the alert log
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlertSummary {
    /// Alerts ever raised
    pub total: usize,
    /// Alerts not yet resolved
    pub active: usize,
    /// Resolved alerts
    pub resolved: usize,
    /// Active alerts per severity
    pub by_severity: BTreeMap<Severity, usize>,
    /// Active alerts per type
    pub by_type: BTreeMap<AlertType, usize>,
}

impl AlertSummary {
    /// One-line human-readable form
    pub fn line(&self) -> String {
        let severities: Vec<String> = self
            .by_severity
            .iter()
            .map(|(s, n)| format!("{}={}", s, n))
            .collect();
        format!(
            "{} alerts ({} active, {} resolved) [{}]",
            self.total,
            self.active,
            self.resolved,
            severities.join(", ")
        )
    }
}
