//! Metrics collected across evaluation epochs

use credo_domain::{AlertType, StabilityState};
use std::collections::HashMap;

/// Counters for engine operations
///
/// Tracks epochs run, claims evaluated and failed, transitions per target
/// state, and alerts raised per type.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Epochs evaluated
    pub epoch_count: usize,

    /// Claims evaluated successfully
    pub claims_evaluated: usize,

    /// Claims skipped because they did not exist yet
    pub claims_skipped: usize,

    /// Per-claim failures
    pub claims_failed: usize,

    /// Stability transitions per target state
    pub transitions: HashMap<StabilityState, usize>,

    /// Alerts raised per type
    pub alerts: HashMap<AlertType, usize>,

    /// Alerts resolved
    pub alerts_resolved: usize,

    /// Total evaluation time in milliseconds
    pub total_runtime_ms: u64,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed epoch
    pub fn record_epoch(&mut self, runtime_ms: u64) {
        self.epoch_count += 1;
        self.total_runtime_ms += runtime_ms;
    }

    /// Record a successfully evaluated claim
    pub fn record_evaluated(&mut self) {
        self.claims_evaluated += 1;
    }

    /// Record claims skipped in an epoch
    pub fn record_skipped(&mut self, count: usize) {
        self.claims_skipped += count;
    }

    /// Record a per-claim failure
    pub fn record_failure(&mut self) {
        self.claims_failed += 1;
    }

    /// Record a stability transition
    pub fn record_transition(&mut self, to: StabilityState) {
        *self.transitions.entry(to).or_insert(0) += 1;
    }

    /// Record a newly raised alert
    pub fn record_alert(&mut self, alert_type: AlertType) {
        *self.alerts.entry(alert_type).or_insert(0) += 1;
    }

    /// Record resolved alerts
    pub fn record_resolved(&mut self, count: usize) {
        self.alerts_resolved += count;
    }

    /// Get total transitions across all states
    pub fn total_transitions(&self) -> usize {
        self.transitions.values().sum()
    }

    /// Get total alerts raised across all types
    pub fn total_alerts(&self) -> usize {
        self.alerts.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Engine Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Epochs: {}", self.epoch_count),
            format!(
                "Claims: {} evaluated, {} skipped, {} failed",
                self.claims_evaluated, self.claims_skipped, self.claims_failed
            ),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
        ];

        if !self.transitions.is_empty() {
            lines.push("Transitions into state:".to_string());
            for state in StabilityState::ALL {
                if let Some(count) = self.transitions.get(&state) {
                    lines.push(format!("  {}: {}", state, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_transitions()));
            lines.push(String::new());
        }

        if !self.alerts.is_empty() {
            lines.push("Alerts raised by type:".to_string());
            for alert_type in AlertType::ALL {
                if let Some(count) = self.alerts.get(&alert_type) {
                    lines.push(format!("  {}: {}", alert_type, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_alerts()));
            lines.push(format!("  Resolved: {}", self.alerts_resolved));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = EngineMetrics::new();
        assert_eq!(metrics.epoch_count, 0);
        assert_eq!(metrics.total_transitions(), 0);
        assert_eq!(metrics.total_alerts(), 0);
    }

    #[test]
    fn test_record_transition() {
        let mut metrics = EngineMetrics::new();
        metrics.record_transition(StabilityState::Volatile);
        metrics.record_transition(StabilityState::Volatile);
        metrics.record_transition(StabilityState::Critical);

        assert_eq!(metrics.transitions[&StabilityState::Volatile], 2);
        assert_eq!(metrics.total_transitions(), 3);
    }

    #[test]
    fn test_record_alerts() {
        let mut metrics = EngineMetrics::new();
        metrics.record_alert(AlertType::ConfidenceCollapse);
        metrics.record_alert(AlertType::TensionSurge);
        metrics.record_resolved(1);

        assert_eq!(metrics.total_alerts(), 2);
        assert_eq!(metrics.alerts_resolved, 1);
    }

    #[test]
    fn test_reset() {
        let mut metrics = EngineMetrics::new();
        metrics.record_epoch(12);
        metrics.record_evaluated();
        metrics.record_failure();
        metrics.reset();

        assert_eq!(metrics.epoch_count, 0);
        assert_eq!(metrics.claims_evaluated, 0);
        assert_eq!(metrics.claims_failed, 0);
    }

    #[test]
    fn test_summary() {
        let mut metrics = EngineMetrics::new();
        metrics.record_epoch(40);
        metrics.record_evaluated();
        metrics.record_evaluated();
        metrics.record_skipped(1);
        metrics.record_transition(StabilityState::Volatile);
        metrics.record_alert(AlertType::ConfidenceCollapse);

        let summary = metrics.summary();
        assert!(summary.contains("Epochs: 1"));
        assert!(summary.contains("2 evaluated, 1 skipped, 0 failed"));
        assert!(summary.contains("volatile: 1"));
        assert!(summary.contains("confidence_collapse: 1"));
    }
}
