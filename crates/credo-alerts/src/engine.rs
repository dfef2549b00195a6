//! Alert rule evaluation and the append-only alert log

use crate::{AlertConfig, AlertError, AlertSummary};
use credo_domain::{AlertId, AlertType, ClaimId, EpistemicAlert, StabilityState, Timestamp};
use credo_stability::Transition;
use credo_timeline::{AnomalyKind, SignalFeatures, TimelineFeatures};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Contradiction-cluster size and weight of a claim at one epoch
///
/// A claim outside every cluster is observed as size 0, weight 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TensionObservation {
    /// Cluster size
    pub size: usize,
    /// Total edge weight of the cluster
    pub weight: f64,
}

type DedupKey = (Option<ClaimId>, AlertType, Timestamp);

/// A rule that fired, before it becomes a record
struct Firing {
    alert_type: AlertType,
    value: f64,
    threshold: f64,
    message: String,
}

/// Evaluates alert rules and keeps the alert log
///
/// Alerts are never deleted. Ids are sequential from 1.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    config: AlertConfig,
    alerts: Vec<EpistemicAlert>,
    index: HashMap<DedupKey, usize>,
    tension: HashMap<ClaimId, BTreeMap<Timestamp, TensionObservation>>,
    system_tension: BTreeMap<Timestamp, f64>,
}

impl AlertEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: AlertConfig) -> Result<Self, AlertError> {
        config.validate().map_err(AlertError::InvalidConfig)?;
        Ok(Self {
            config,
            alerts: Vec::new(),
            index: HashMap::new(),
            tension: HashMap::new(),
            system_tension: BTreeMap::new(),
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    // ---- evaluation ----

    /// Evaluate the seven anomaly rules for a claim at `epoch`
    ///
    /// Returns the alerts that fired this epoch (existing records when the
    /// epoch is re-run). With `auto_resolve`, earlier anomaly alerts of the
    /// claim whose rule did not fire are resolved.
    pub fn evaluate_signals(
        &mut self,
        claim: ClaimId,
        epoch: Timestamp,
        features: &TimelineFeatures,
        tension: TensionObservation,
    ) -> Vec<EpistemicAlert> {
        let mut firings = Vec::new();

        if let Some(f) = anomaly_firing(
            &features.entropy,
            AlertType::EntropySpike,
            AlertType::EntropyCollapse,
        ) {
            firings.push(f);
        }
        if let Some(f) = anomaly_firing(
            &features.confidence,
            AlertType::ConfidenceSurge,
            AlertType::ConfidenceCollapse,
        ) {
            firings.push(f);
        }
        if let Some(f) = self.drift_acceleration(&features.entropy) {
            firings.push(f);
        }
        if let Some(f) = self.drift_inflection(&features.entropy) {
            firings.push(f);
        }
        if let Some(f) = self.tension_surge(claim, epoch, tension) {
            firings.push(f);
        }

        let fired = self.commit(Some(claim), epoch, firings);
        if self.config.auto_resolve {
            self.auto_resolve(Some(claim), epoch, &fired, AlertType::is_anomaly);
        }
        fired
    }

    /// Evaluate the two state rules for a classifier transition at `epoch`
    pub fn evaluate_transition(
        &mut self,
        claim: ClaimId,
        epoch: Timestamp,
        transition: &Transition,
    ) -> Vec<EpistemicAlert> {
        let mut firings = Vec::new();

        if transition.changed() {
            firings.push(Firing {
                alert_type: AlertType::StabilityTransition,
                value: state_level(transition.to),
                threshold: state_level(transition.from),
                message: format!(
                    "{} -> {}: {}",
                    transition.from, transition.to, transition.reason
                ),
            });
        }
        if transition.to == StabilityState::Critical {
            firings.push(Firing {
                alert_type: AlertType::CriticalState,
                value: state_level(transition.to),
                threshold: state_level(StabilityState::Critical),
                message: format!("claim is Critical: {}", transition.reason),
            });
        }

        let fired = self.commit(Some(claim), epoch, firings);
        if self.config.auto_resolve {
            self.auto_resolve(Some(claim), epoch, &fired, |t| !t.is_anomaly());
        }
        fired
    }

    /// Evaluate the system-wide tension rule at `epoch`
    ///
    /// Fires when the total contradiction weight of the graph grew by at
    /// least `tension_weight_jump` since the latest earlier epoch.
    pub fn evaluate_system(&mut self, epoch: Timestamp, total_weight: f64) -> Vec<EpistemicAlert> {
        let previous = self
            .system_tension
            .range(..epoch)
            .next_back()
            .map(|(_, w)| *w);
        self.system_tension.insert(epoch, total_weight);

        let mut firings = Vec::new();
        if let Some(prev) = previous {
            let growth = total_weight - prev;
            if growth >= self.config.tension_weight_jump {
                firings.push(Firing {
                    alert_type: AlertType::TensionSurge,
                    value: growth,
                    threshold: self.config.tension_weight_jump,
                    message: format!(
                        "total contradiction weight grew {:.3} -> {:.3}",
                        prev, total_weight
                    ),
                });
            }
        }

        let fired = self.commit(None, epoch, firings);
        if self.config.auto_resolve {
            self.auto_resolve(None, epoch, &fired, |_| true);
        }
        fired
    }

    fn drift_acceleration(&self, entropy: &SignalFeatures) -> Option<Firing> {
        let accel = entropy.acceleration?;
        (accel.abs() > self.config.drift_accel_threshold).then(|| Firing {
            alert_type: AlertType::DriftAcceleration,
            value: accel,
            threshold: self.config.drift_accel_threshold,
            message: format!(
                "drift acceleration {:.6}/h² exceeds {}",
                accel, self.config.drift_accel_threshold
            ),
        })
    }

    fn drift_inflection(&self, entropy: &SignalFeatures) -> Option<Firing> {
        let (prev, curr) = (entropy.previous_acceleration?, entropy.acceleration?);
        let eps = self.config.inflection_epsilon;
        let flipped = prev.signum() != curr.signum();
        (flipped && prev.abs() > eps && curr.abs() > eps).then(|| Firing {
            alert_type: AlertType::DriftInflection,
            value: curr,
            threshold: eps,
            message: format!("drift acceleration changed sign ({:.6} -> {:.6})", prev, curr),
        })
    }

    fn tension_surge(
        &mut self,
        claim: ClaimId,
        epoch: Timestamp,
        observed: TensionObservation,
    ) -> Option<Firing> {
        let history = self.tension.entry(claim).or_default();
        let previous = history.range(..epoch).next_back().map(|(_, o)| *o);
        history.insert(epoch, observed);

        let prev = previous?;
        let size_jump = observed.size.saturating_sub(prev.size);
        let weight_jump = observed.weight - prev.weight;

        if size_jump >= self.config.tension_size_jump {
            Some(Firing {
                alert_type: AlertType::TensionSurge,
                value: size_jump as f64,
                threshold: self.config.tension_size_jump as f64,
                message: format!(
                    "contradiction cluster grew from {} to {} claims",
                    prev.size, observed.size
                ),
            })
        } else if weight_jump >= self.config.tension_weight_jump {
            Some(Firing {
                alert_type: AlertType::TensionSurge,
                value: weight_jump,
                threshold: self.config.tension_weight_jump,
                message: format!(
                    "contradiction weight grew from {:.3} to {:.3}",
                    prev.weight, observed.weight
                ),
            })
        } else {
            None
        }
    }

    /// Turn firings into records, reusing the record of an already-seen key
    fn commit(
        &mut self,
        claim: Option<ClaimId>,
        epoch: Timestamp,
        firings: Vec<Firing>,
    ) -> Vec<EpistemicAlert> {
        let mut fired = Vec::with_capacity(firings.len());
        for firing in firings {
            let key = (claim, firing.alert_type, epoch);
            if let Some(&idx) = self.index.get(&key) {
                debug!(alert_type = %firing.alert_type, epoch, "Alert already recorded for epoch");
                fired.push(self.alerts[idx].clone());
                continue;
            }

            let alert = EpistemicAlert {
                id: AlertId(self.alerts.len() as u64 + 1),
                claim_id: claim,
                alert_type: firing.alert_type,
                severity: firing.alert_type.severity(),
                timestamp: epoch,
                value: firing.value,
                threshold: firing.threshold,
                message: firing.message,
                resolved: false,
                resolved_at: None,
            };
            warn!(
                id = %alert.id,
                claim = ?claim.map(|c| c.to_string()),
                alert_type = %alert.alert_type,
                severity = %alert.severity,
                message = %alert.message,
                "Alert raised"
            );
            self.index.insert(key, self.alerts.len());
            self.alerts.push(alert.clone());
            fired.push(alert);
        }
        fired
    }

    /// Resolve earlier unresolved alerts in `scope`
    ///
    /// A rule that stopped firing resolves its alert. A rule that fired again
    /// supersedes its earlier record with the one raised at `epoch`.
    fn auto_resolve<F>(
        &mut self,
        claim: Option<ClaimId>,
        epoch: Timestamp,
        fired: &[EpistemicAlert],
        scope: F,
    ) where
        F: Fn(&AlertType) -> bool,
    {
        let still_firing: HashSet<AlertType> = fired.iter().map(|a| a.alert_type).collect();
        for alert in self.alerts.iter_mut() {
            if alert.claim_id == claim
                && alert.timestamp < epoch
                && scope(&alert.alert_type)
                && alert.resolve(epoch)
            {
                if still_firing.contains(&alert.alert_type) {
                    debug!(id = %alert.id, alert_type = %alert.alert_type, "Superseded alert");
                } else {
                    debug!(id = %alert.id, alert_type = %alert.alert_type, "Auto-resolved alert");
                }
            }
        }
    }

    // ---- queries and resolution ----

    /// Distinct anomaly alert types active for a claim
    pub fn active_anomaly_count(&self, claim: ClaimId) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.claim_id == Some(claim) && !a.resolved && a.alert_type.is_anomaly())
            .map(|a| a.alert_type)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Look up an alert
    pub fn get(&self, id: AlertId) -> Result<&EpistemicAlert, AlertError> {
        self.slot(id).map(|idx| &self.alerts[idx])
    }

    fn slot(&self, id: AlertId) -> Result<usize, AlertError> {
        let idx = (id.0 as usize)
            .checked_sub(1)
            .filter(|i| *i < self.alerts.len())
            .ok_or(AlertError::NotFound(id))?;
        Ok(idx)
    }

    /// Mark an alert resolved
    ///
    /// Resolving an already-resolved alert leaves it unchanged.
    pub fn resolve(&mut self, id: AlertId, at: Timestamp) -> Result<&EpistemicAlert, AlertError> {
        let idx = self.slot(id)?;
        self.alerts[idx].resolve(at);
        Ok(&self.alerts[idx])
    }

    /// Resolve every active alert of a claim, or of every claim with `None`
    ///
    /// Returns the number of alerts resolved.
    pub fn resolve_all(&mut self, scope: Option<ClaimId>, at: Timestamp) -> usize {
        let mut resolved = 0;
        for alert in self.alerts.iter_mut() {
            if (scope.is_none() || alert.claim_id == scope) && alert.resolve(at) {
                resolved += 1;
            }
        }
        resolved
    }

    /// Unresolved alerts of a claim, or every unresolved alert with `None`
    pub fn list_active(&self, claim: Option<ClaimId>) -> Vec<&EpistemicAlert> {
        self.alerts
            .iter()
            .filter(|a| !a.resolved && (claim.is_none() || a.claim_id == claim))
            .collect()
    }

    /// Every alert of a claim, oldest first
    pub fn alerts_for(&self, claim: ClaimId) -> Vec<&EpistemicAlert> {
        self.alerts
            .iter()
            .filter(|a| a.claim_id == Some(claim))
            .collect()
    }

    /// The full alert log, oldest first
    pub fn all(&self) -> &[EpistemicAlert] {
        &self.alerts
    }

    /// Counts over the log
    pub fn summary(&self) -> AlertSummary {
        let mut summary = AlertSummary {
            total: self.alerts.len(),
            ..Default::default()
        };
        for alert in &self.alerts {
            if alert.resolved {
                summary.resolved += 1;
            } else {
                summary.active += 1;
                *summary.by_severity.entry(alert.severity).or_default() += 1;
                *summary.by_type.entry(alert.alert_type).or_default() += 1;
            }
        }
        summary
    }
}

fn anomaly_firing(
    features: &SignalFeatures,
    above: AlertType,
    below: AlertType,
) -> Option<Firing> {
    let anomaly = features.anomaly?;
    let alert_type = match anomaly.kind {
        AnomalyKind::Spike => above,
        AnomalyKind::Collapse => below,
    };
    Some(Firing {
        alert_type,
        value: anomaly.value,
        threshold: anomaly.threshold,
        message: format!(
            "{} {:.4} deviates {:+.4} from trailing mean {:.4} (σ {:.4})",
            features.signal, anomaly.value, anomaly.deviation, anomaly.mean, anomaly.std_dev
        ),
    })
}

/// Ordinal of a state, recorded as the value of state alerts
fn state_level(state: StabilityState) -> f64 {
    match state {
        StabilityState::Stable => 0.0,
        StabilityState::Converging => 1.0,
        StabilityState::Volatile => 2.0,
        StabilityState::Diverging => 3.0,
        StabilityState::Critical => 4.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credo_domain::{Severity, Signal};
    use credo_stability::Rule;
    use credo_timeline::Anomaly;

    fn engine() -> AlertEngine {
        AlertEngine::new(AlertConfig::default()).unwrap()
    }

    fn quiet() -> TimelineFeatures {
        TimelineFeatures {
            confidence: SignalFeatures::empty(Signal::Confidence),
            entropy: SignalFeatures::empty(Signal::Entropy),
        }
    }

    fn anomaly(kind: AnomalyKind, value: f64) -> Anomaly {
        Anomaly {
            kind,
            timestamp: 0,
            value,
            mean: 0.75,
            std_dev: 0.15,
            deviation: value - 0.75,
            threshold: 0.3,
        }
    }

    fn collapsing() -> TimelineFeatures {
        let mut f = quiet();
        f.confidence.anomaly = Some(anomaly(AnomalyKind::Collapse, 0.3));
        f
    }

    fn cid(v: u128) -> ClaimId {
        ClaimId::from_value(v)
    }

    #[test]
    fn test_quiet_features_raise_nothing() {
        let mut e = engine();
        assert!(e.evaluate_signals(cid(1), 0, &quiet(), TensionObservation::default()).is_empty());
        assert!(e.all().is_empty());
    }

    #[test]
    fn test_confidence_collapse() {
        let mut e = engine();
        let fired = e.evaluate_signals(cid(1), 10, &collapsing(), TensionObservation::default());
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].alert_type, AlertType::ConfidenceCollapse);
        assert_eq!(fired[0].severity, Severity::Critical);
        assert_eq!(fired[0].id, AlertId(1));
        assert_eq!(fired[0].timestamp, 10);
    }

    #[test]
    fn test_rerun_epoch_does_not_duplicate() {
        let mut e = engine();
        let first = e.evaluate_signals(cid(1), 10, &collapsing(), TensionObservation::default());
        let second = e.evaluate_signals(cid(1), 10, &collapsing(), TensionObservation::default());
        assert_eq!(first, second);
        assert_eq!(e.all().len(), 1);

        // the same rule fires again in a later epoch
        e.evaluate_signals(cid(1), 20, &collapsing(), TensionObservation::default());
        assert_eq!(e.all().len(), 2);
        assert_eq!(e.list_active(Some(cid(1)))[0].id, AlertId(2));
        assert_eq!(e.active_anomaly_count(cid(1)), 1);
    }

    #[test]
    fn test_auto_resolve_when_rule_stops() {
        let mut e = engine();
        e.evaluate_signals(cid(1), 10, &collapsing(), TensionObservation::default());
        assert_eq!(e.active_anomaly_count(cid(1)), 1);

        e.evaluate_signals(cid(1), 20, &quiet(), TensionObservation::default());
        assert_eq!(e.active_anomaly_count(cid(1)), 0);
        let alert = e.get(AlertId(1)).unwrap();
        assert!(alert.resolved);
        assert_eq!(alert.resolved_at, Some(20));
    }

    #[test]
    fn test_manual_resolution_without_auto_resolve() {
        let config = AlertConfig {
            auto_resolve: false,
            ..Default::default()
        };
        let mut e = AlertEngine::new(config).unwrap();
        e.evaluate_signals(cid(1), 10, &collapsing(), TensionObservation::default());
        e.evaluate_signals(cid(1), 20, &quiet(), TensionObservation::default());
        assert_eq!(e.list_active(Some(cid(1))).len(), 1);

        e.resolve(AlertId(1), 30).unwrap();
        assert!(e.list_active(None).is_empty());
        assert_eq!(e.all().len(), 1);
        assert!(matches!(e.resolve(AlertId(9), 30), Err(AlertError::NotFound(_))));
        assert!(matches!(e.get(AlertId(0)), Err(AlertError::NotFound(_))));
    }

    #[test]
    fn test_distinct_anomaly_types_counted() {
        let mut e = engine();
        let mut f = collapsing();
        f.entropy.anomaly = Some(anomaly(AnomalyKind::Spike, 1.2));
        f.entropy.acceleration = Some(0.02);
        let fired = e.evaluate_signals(cid(1), 10, &f, TensionObservation::default());

        let types: Vec<AlertType> = fired.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            types,
            vec![
                AlertType::EntropySpike,
                AlertType::ConfidenceCollapse,
                AlertType::DriftAcceleration
            ]
        );
        assert_eq!(e.active_anomaly_count(cid(1)), 3);
        assert_eq!(e.active_anomaly_count(cid(2)), 0);
    }

    #[test]
    fn test_drift_inflection() {
        let mut e = engine();
        let mut f = quiet();
        f.entropy.previous_acceleration = Some(0.002);
        f.entropy.acceleration = Some(-0.001);
        let fired = e.evaluate_signals(cid(1), 10, &f, TensionObservation::default());
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].alert_type, AlertType::DriftInflection);
        assert_eq!(fired[0].severity, Severity::Info);

        // below epsilon on one side
        let mut f = quiet();
        f.entropy.previous_acceleration = Some(0.002);
        f.entropy.acceleration = Some(-0.0001);
        assert!(e.evaluate_signals(cid(2), 10, &f, TensionObservation::default()).is_empty());
    }

    #[test]
    fn test_tension_surge() {
        let mut e = engine();
        let c = cid(1);
        let obs = |size, weight| TensionObservation { size, weight };

        // first observation is the baseline
        assert!(e.evaluate_signals(c, 10, &quiet(), obs(0, 0.0)).is_empty());
        assert!(e.evaluate_signals(c, 20, &quiet(), obs(0, 0.0)).is_empty());

        let fired = e.evaluate_signals(c, 30, &quiet(), obs(3, 0.4));
        assert_eq!(fired[0].alert_type, AlertType::TensionSurge);
        assert_eq!(fired[0].value, 3.0);

        // weight jump alone
        let fired = e.evaluate_signals(c, 40, &quiet(), obs(3, 1.0));
        assert_eq!(fired.len(), 1);
        assert!((fired[0].value - 0.6).abs() < 1e-12);

        // steady
        assert!(e.evaluate_signals(c, 50, &quiet(), obs(3, 1.0)).is_empty());
    }

    #[test]
    fn test_tension_rerun_compares_with_previous_epoch() {
        let mut e = engine();
        let c = cid(1);
        e.evaluate_signals(c, 10, &quiet(), TensionObservation { size: 0, weight: 0.0 });
        let obs = TensionObservation { size: 2, weight: 0.8 };
        let first = e.evaluate_signals(c, 20, &quiet(), obs);
        let again = e.evaluate_signals(c, 20, &quiet(), obs);
        assert_eq!(first.len(), 1);
        assert_eq!(first, again);
    }

    #[test]
    fn test_transition_alerts() {
        let mut e = engine();
        let t = Transition {
            from: StabilityState::Stable,
            to: StabilityState::Critical,
            rule: Some(Rule::AnomalyOverload),
            reason: "3 distinct anomaly alerts active".into(),
        };
        let fired = e.evaluate_transition(cid(1), 10, &t);
        let types: Vec<AlertType> = fired.iter().map(|a| a.alert_type).collect();
        assert_eq!(types, vec![AlertType::StabilityTransition, AlertType::CriticalState]);
        // state alerts do not feed the anomaly count
        assert_eq!(e.active_anomaly_count(cid(1)), 0);

        let stay = Transition {
            from: StabilityState::Critical,
            to: StabilityState::Critical,
            rule: None,
            reason: String::new(),
        };
        let fired = e.evaluate_transition(cid(1), 20, &stay);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].alert_type, AlertType::CriticalState);
        // the epoch-10 records are resolved or superseded
        assert!(e.get(AlertId(1)).unwrap().resolved);
        assert!(e.get(AlertId(2)).unwrap().resolved);
        assert!(!e.get(AlertId(3)).unwrap().resolved);
        assert_eq!(e.list_active(Some(cid(1))).len(), 1);
    }

    #[test]
    fn test_system_tension() {
        let mut e = engine();
        assert!(e.evaluate_system(10, 0.2).is_empty());
        let fired = e.evaluate_system(20, 1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].claim_id, None);
        assert!(e.evaluate_system(20, 1.0).len() == 1);
        assert_eq!(e.all().len(), 1);

        assert!(e.evaluate_system(30, 1.1).is_empty());
        assert!(e.get(AlertId(1)).unwrap().resolved);
    }

    #[test]
    fn test_resolve_all_and_summary() {
        let mut e = engine();
        e.evaluate_signals(cid(1), 10, &collapsing(), TensionObservation::default());
        e.evaluate_signals(cid(2), 10, &collapsing(), TensionObservation::default());

        let summary = e.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.by_severity[&Severity::Critical], 2);
        assert!(summary.line().contains("2 active"));

        assert_eq!(e.resolve_all(Some(cid(1)), 15), 1);
        assert_eq!(e.list_active(None).len(), 1);
        assert_eq!(e.resolve_all(None, 15), 1);
        assert_eq!(e.summary().resolved, 2);
    }
}
