//! Epoch orchestration and the query surface

use crate::{
    ClaimFailure, ClaimOutcome, ClaimSelection, EngineConfig, EngineError, EngineMetrics,
    EpochReport,
};
use credo_alerts::{AlertEngine, TensionObservation};
use credo_domain::traits::RecordSink;
use credo_domain::{
    AlertId, ClaimId, ClaimScore, EpistemicAlert, FeatureSnapshot, MutationMetric, Signal,
    StabilityClassification, StabilityState, TimelineSample, Timestamp,
};
use credo_drift::DriftAnalyzer;
use credo_graph::{ClaimGraph, ClusterIndex};
use credo_scorer::ConfidenceScorer;
use credo_stability::{classify, ClassificationHistory};
use credo_timeline::TimelineEngine;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Evaluates claims epoch by epoch and keeps every output record
///
/// The graph is owned by the engine; ingestion goes through
/// [`graph_mut`](Self::graph_mut) between epochs.
#[derive(Debug)]
pub struct EpistemicEngine {
    config: EngineConfig,
    graph: ClaimGraph,
    scorer: ConfidenceScorer,
    drift: DriftAnalyzer,
    timeline: TimelineEngine,
    history: ClassificationHistory,
    alerts: AlertEngine,
    scores: BTreeMap<ClaimId, BTreeMap<Timestamp, ClaimScore>>,
    mutations: BTreeMap<ClaimId, BTreeMap<Timestamp, MutationMetric>>,
    metrics: EngineMetrics,
}

impl EpistemicEngine {
    /// Create an engine over an empty graph
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_graph(config, ClaimGraph::new())
    }

    /// Create an engine over an existing graph
    pub fn with_graph(config: EngineConfig, graph: ClaimGraph) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            scorer: ConfidenceScorer::new(config.scoring.clone())?,
            drift: DriftAnalyzer::new(),
            timeline: TimelineEngine::new(config.timeline.clone())?,
            history: ClassificationHistory::new(),
            alerts: AlertEngine::new(config.alerts.clone())?,
            scores: BTreeMap::new(),
            mutations: BTreeMap::new(),
            metrics: EngineMetrics::new(),
            graph,
            config,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The evidence graph
    pub fn graph(&self) -> &ClaimGraph {
        &self.graph
    }

    /// Mutable access to the evidence graph for ingestion
    pub fn graph_mut(&mut self) -> &mut ClaimGraph {
        &mut self.graph
    }

    // ---- evaluation ----

    /// Evaluate the selected claims at epoch `t`
    ///
    /// Claims created after `t` are skipped. Per-claim failures are
    /// collected in the report.
    pub fn evaluate_epoch(&mut self, t: Timestamp, selection: &ClaimSelection) -> EpochReport {
        let started = Instant::now();
        let alerts_before = self.alerts.all().len();
        let resolved_before = self.alerts.summary().resolved;

        let clusters = self.graph.cluster_index(t);
        let mut report = EpochReport {
            epoch: t,
            cluster_count: clusters.len(),
            total_tension: clusters.total_weight(),
            ..Default::default()
        };

        let mut candidates = Vec::new();
        for claim in self.select(selection) {
            match self.admit(claim, t) {
                Ok(true) => candidates.push(claim),
                Ok(false) => report.skipped += 1,
                Err(e) => fail(&mut report, claim, e),
            }
        }

        let computed: Vec<(ClaimId, Result<(MutationMetric, ClaimScore), EngineError>)> =
            if self.config.engine.parallel {
                candidates
                    .par_iter()
                    .map(|&claim| (claim, self.compute(claim, t, &clusters)))
                    .collect()
            } else {
                candidates
                    .iter()
                    .map(|&claim| (claim, self.compute(claim, t, &clusters)))
                    .collect()
            };

        for (claim, result) in computed {
            let committed =
                result.and_then(|(metric, score)| self.commit(claim, t, metric, score, &clusters));
            match committed {
                Ok(outcome) => {
                    self.metrics.record_evaluated();
                    if outcome.transitioned() {
                        self.metrics.record_transition(outcome.state);
                    }
                    report.evaluated += 1;
                    report.outcomes.push(outcome);
                }
                Err(e) => fail(&mut report, claim, e),
            }
        }

        report.system_alerts = self.alerts.evaluate_system(t, report.total_tension);

        for alert in &self.alerts.all()[alerts_before..] {
            self.metrics.record_alert(alert.alert_type);
        }
        let resolved_after = self.alerts.summary().resolved;
        self.metrics
            .record_resolved(resolved_after.saturating_sub(resolved_before));
        self.metrics.record_skipped(report.skipped);
        for _ in &report.failures {
            self.metrics.record_failure();
        }
        self.metrics
            .record_epoch(started.elapsed().as_millis() as u64);

        info!(
            epoch = t,
            evaluated = report.evaluated,
            skipped = report.skipped,
            failed = report.failures.len(),
            transitions = report.transition_count(),
            alerts = report.alerts().count(),
            clusters = report.cluster_count,
            "Evaluated epoch"
        );
        report
    }

    fn select(&self, selection: &ClaimSelection) -> Vec<ClaimId> {
        match selection {
            ClaimSelection::All => self.graph.claims().map(|c| c.id).collect(),
            ClaimSelection::Claims(ids) => {
                let mut ids = ids.clone();
                ids.sort();
                ids.dedup();
                ids
            }
        }
    }

    /// Whether a claim takes part in epoch `t`
    fn admit(&self, claim: ClaimId, t: Timestamp) -> Result<bool, EngineError> {
        let node = self.graph.claim(claim)?;
        if node.created_at > t {
            debug!(%claim, created_at = node.created_at, epoch = t, "Claim not yet visible");
            return Ok(false);
        }
        if let Some(latest) = self.latest_epoch(claim) {
            if t < latest {
                return Err(EngineError::StaleEpoch {
                    claim,
                    epoch: t,
                    latest,
                });
            }
        }
        Ok(true)
    }

    /// Pure phase: reads the graph only
    fn compute(
        &self,
        claim: ClaimId,
        t: Timestamp,
        clusters: &ClusterIndex,
    ) -> Result<(MutationMetric, ClaimScore), EngineError> {
        let metric = self.drift.metric_at(&self.graph, claim, t)?;
        let score = self
            .scorer
            .score(&self.graph, claim, t, clusters, metric.drift_velocity)?;
        Ok((metric, score))
    }

    /// Sequential phase: records samples, alerts and the classification
    ///
    /// Every fallible check runs before the first write, so a failing claim
    /// leaves no partial records behind.
    fn commit(
        &mut self,
        claim: ClaimId,
        t: Timestamp,
        metric: MutationMetric,
        score: ClaimScore,
        clusters: &ClusterIndex,
    ) -> Result<ClaimOutcome, EngineError> {
        let current = self.history.next_from(claim, t)?;
        self.timeline.record_all(
            claim,
            t,
            &[
                (Signal::Confidence, score.composite),
                (Signal::Entropy, metric.entropy),
            ],
        )?;

        let confidence = score.composite;
        let entropy = metric.entropy;
        self.scores.entry(claim).or_default().insert(t, score);
        self.mutations.entry(claim).or_default().insert(t, metric);

        let features = self.timeline.features(claim);
        let tension = clusters
            .cluster_of(claim)
            .map(|c| TensionObservation {
                size: c.size(),
                weight: c.total_weight,
            })
            .unwrap_or_default();
        let mut fired = self.alerts.evaluate_signals(claim, t, &features, tension);

        let snapshot = FeatureSnapshot {
            confidence: features.confidence.latest,
            confidence_std: features.confidence.std_dev,
            confidence_trend: features.confidence.trend,
            confidence_plateau: features.confidence.plateau,
            entropy: features.entropy.latest,
            entropy_std: features.entropy.std_dev,
            entropy_velocity: features.entropy.velocity,
            drift_acceleration: features.entropy.acceleration,
            active_alert_count: self.alerts.active_anomaly_count(claim),
        };
        let transition = classify(current, &snapshot, &self.config.stability);

        self.history.record(StabilityClassification {
            claim_id: claim,
            timestamp: t,
            from: transition.from,
            state: transition.to,
            features: snapshot,
            rule: transition.rule.map(|r| r.number()),
            reason: transition.reason.clone(),
        })?;
        fired.extend(self.alerts.evaluate_transition(claim, t, &transition));

        debug!(
            %claim,
            epoch = t,
            confidence,
            entropy,
            state = %transition.to,
            alerts = fired.len(),
            "Evaluated claim"
        );

        Ok(ClaimOutcome {
            claim_id: claim,
            confidence,
            entropy,
            from: transition.from,
            state: transition.to,
            alerts: fired,
        })
    }

    fn latest_epoch(&self, claim: ClaimId) -> Option<Timestamp> {
        self.scores
            .get(&claim)
            .and_then(|by_epoch| by_epoch.keys().next_back().copied())
    }

    // ---- queries ----

    /// Most recent score of a claim
    pub fn get_latest_score(&self, claim: ClaimId) -> Result<&ClaimScore, EngineError> {
        self.graph.claim(claim)?;
        self.scores
            .get(&claim)
            .and_then(|by_epoch| by_epoch.values().next_back())
            .ok_or(EngineError::NoRecord {
                record: "score",
                claim,
            })
    }

    /// Recorded samples of one signal, oldest first
    pub fn get_timeline(
        &self,
        claim: ClaimId,
        signal: Signal,
    ) -> Result<&[TimelineSample], EngineError> {
        self.graph.claim(claim)?;
        Ok(self.timeline.samples(claim, signal))
    }

    /// Current stability state (Stable before the first classification)
    pub fn get_current_state(&self, claim: ClaimId) -> Result<StabilityState, EngineError> {
        self.graph.claim(claim)?;
        Ok(self.history.current(claim))
    }

    /// Unresolved alerts of a claim, or every unresolved alert with `None`
    pub fn list_active_alerts(&self, claim: Option<ClaimId>) -> Vec<&EpistemicAlert> {
        self.alerts.list_active(claim)
    }

    /// Every score of a claim, oldest first
    pub fn score_history(&self, claim: ClaimId) -> Vec<&ClaimScore> {
        self.scores
            .get(&claim)
            .map(|by_epoch| by_epoch.values().collect())
            .unwrap_or_default()
    }

    /// Every mutation metric of a claim, oldest first
    pub fn mutation_history(&self, claim: ClaimId) -> Vec<&MutationMetric> {
        self.mutations
            .get(&claim)
            .map(|by_epoch| by_epoch.values().collect())
            .unwrap_or_default()
    }

    /// Every classification of a claim, oldest first
    pub fn classification_history(&self, claim: ClaimId) -> &[StabilityClassification] {
        self.history.entries(claim)
    }

    /// Mark an alert resolved
    pub fn resolve_alert(
        &mut self,
        id: AlertId,
        at: Timestamp,
    ) -> Result<&EpistemicAlert, EngineError> {
        let was_resolved = self.alerts.get(id)?.resolved;
        if !was_resolved {
            self.metrics.record_resolved(1);
        }
        Ok(self.alerts.resolve(id, at)?)
    }

    /// The alert engine
    pub fn alerts(&self) -> &AlertEngine {
        &self.alerts
    }

    /// The timeline engine
    pub fn timeline(&self) -> &TimelineEngine {
        &self.timeline
    }

    /// The classification history
    pub fn history(&self) -> &ClassificationHistory {
        &self.history
    }

    /// Counters accumulated across epochs
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    // ---- export ----

    /// Write every record to `sink` as one batch
    ///
    /// Returns the number of records written. A failed write rolls the batch
    /// back, so the sink never holds a partial export.
    pub fn export<S: RecordSink>(&self, sink: &mut S) -> Result<usize, S::Error> {
        sink.begin_batch()?;
        match self.write_records(sink) {
            Ok(written) => {
                sink.commit_batch()?;
                info!(records = written, "Exported records");
                Ok(written)
            }
            Err(e) => {
                if sink.rollback_batch().is_err() {
                    warn!("Rollback of a failed export did not complete");
                }
                Err(e)
            }
        }
    }

    fn write_records<S: RecordSink>(&self, sink: &mut S) -> Result<usize, S::Error> {
        let mut written = 0;
        for score in self.scores.values().flat_map(|m| m.values()) {
            sink.record_score(score)?;
            written += 1;
        }
        for metric in self.mutations.values().flat_map(|m| m.values()) {
            sink.record_metric(metric)?;
            written += 1;
        }
        for claim in self.timeline.claims() {
            for signal in Signal::ALL {
                for sample in self.timeline.samples(claim, signal) {
                    sink.record_sample(sample)?;
                    written += 1;
                }
            }
        }
        let classified: Vec<ClaimId> = self.history.claims().collect();
        for claim in classified {
            for entry in self.history.entries(claim) {
                sink.record_classification(entry)?;
                written += 1;
            }
        }
        for alert in self.alerts.all() {
            sink.record_alert(alert)?;
            written += 1;
        }
        Ok(written)
    }
}

fn fail(report: &mut EpochReport, claim: ClaimId, error: EngineError) {
    warn!(%claim, epoch = report.epoch, error = %error, "Claim evaluation failed");
    report.failures.push(ClaimFailure {
        claim_id: claim,
        kind: error.kind(),
        message: error.to_string(),
    });
}


#[cfg(test)]
mod proptests {
    use super::*;
    use credo_domain::time::MS_PER_HOUR;
    use credo_domain::{ClaimNode, ClaimType, Relation, SourceCategory, SourceId, SourceNode};
    use proptest::prelude::*;

    const HOUR: u64 = MS_PER_HOUR as u64;

    fn build(credibilities: &[f64], parallel: bool) -> EpistemicEngine {
        let mut config = EngineConfig::default();
        config.engine.parallel = parallel;
        let mut engine = EpistemicEngine::new(config).unwrap();
        for (i, cred) in credibilities.iter().enumerate() {
            let claim = ClaimId::from_value(i as u128 + 1);
            let source = SourceId::from_value(i as u128 + 1);
            let graph = engine.graph_mut();
            graph
                .add_claim(ClaimNode::new(claim, format!("claim {}", i), ClaimType::Observation, 0))
                .unwrap();
            graph
                .add_source(SourceNode::new(
                    source,
                    format!("source {}", i),
                    SourceCategory::Social,
                    *cred,
                    0,
                ))
                .unwrap();
            graph.link(source, claim, Relation::Supports, 1.0, 0).unwrap();
        }
        engine
    }

    proptest! {
        /// Property: parallel and sequential evaluation agree
        #[test]
        fn test_evaluation_deterministic(creds in prop::collection::vec(0.0f64..=1.0, 1..12)) {
            let mut a = build(&creds, true);
            let mut b = build(&creds, false);
            for epoch in 1..=3u64 {
                let ra = a.evaluate_epoch(epoch * HOUR, &ClaimSelection::All);
                let rb = b.evaluate_epoch(epoch * HOUR, &ClaimSelection::All);
                prop_assert_eq!(ra.outcomes, rb.outcomes);
            }
        }

        /// Property: every recorded composite lies in [0, 1]
        #[test]
        fn test_composites_bounded(creds in prop::collection::vec(0.0f64..=1.0, 1..12)) {
            let mut engine = build(&creds, true);
            engine.evaluate_epoch(HOUR, &ClaimSelection::All);
            for i in 0..creds.len() {
                let score = engine.get_latest_score(ClaimId::from_value(i as u128 + 1)).unwrap();
                prop_assert!((0.0..=1.0).contains(&score.composite));
            }
        }
    }
}
