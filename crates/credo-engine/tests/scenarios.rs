//! End-to-end epoch scenarios

use credo_domain::time::MS_PER_HOUR;
use credo_domain::traits::RecordSink;
use credo_domain::{
    AlertType, ClaimId, ClaimNode, ClaimScore, ClaimType, EpistemicAlert, MutationMetric,
    Relation, Signal, SourceCategory, SourceId, SourceNode, StabilityClassification,
    StabilityState, TimelineSample, VerificationStatus,
};
use credo_engine::{ClaimSelection, EngineConfig, EpistemicEngine};

const HOUR: u64 = MS_PER_HOUR as u64;

fn cid(v: u128) -> ClaimId {
    ClaimId::from_value(v)
}

fn sid(v: u128) -> SourceId {
    SourceId::from_value(v)
}

fn engine() -> EpistemicEngine {
    EpistemicEngine::new(EngineConfig::default()).unwrap()
}

fn add_claim(engine: &mut EpistemicEngine, id: u128, claim_type: ClaimType) {
    engine
        .graph_mut()
        .add_claim(ClaimNode::new(cid(id), format!("claim {}", id), claim_type, 0))
        .unwrap();
}

fn add_source(engine: &mut EpistemicEngine, id: u128, credibility: f64) {
    engine
        .graph_mut()
        .add_source(SourceNode::new(
            sid(id),
            format!("source {}", id),
            SourceCategory::Document,
            credibility,
            0,
        ))
        .unwrap();
}

/// A confirmed measurement backed by five fully credible sources
fn well_supported(engine: &mut EpistemicEngine, claim: u128) {
    add_claim(engine, claim, ClaimType::Measurement);
    for s in 1..=5 {
        add_source(engine, claim * 10 + s, 1.0);
        engine
            .graph_mut()
            .link(sid(claim * 10 + s), cid(claim), Relation::Supports, 1.0, 0)
            .unwrap();
    }
    engine
        .graph_mut()
        .update_status(cid(claim), VerificationStatus::Confirmed)
        .unwrap();
}

#[test]
fn test_supporting_sources_lift_score() {
    let mut engine = engine();
    add_claim(&mut engine, 1, ClaimType::Observation);
    add_claim(&mut engine, 2, ClaimType::Observation);
    add_source(&mut engine, 1, 0.8);
    add_source(&mut engine, 2, 0.6);
    for s in [1, 2] {
        engine
            .graph_mut()
            .link(sid(s), cid(1), Relation::Supports, 1.0, 0)
            .unwrap();
    }

    engine.evaluate_epoch(HOUR, &ClaimSelection::All);

    let supported = engine.get_latest_score(cid(1)).unwrap();
    let baseline = engine.get_latest_score(cid(2)).unwrap();
    assert!((supported.components.credibility - 0.7).abs() < 1e-12);
    assert!(supported.composite > baseline.composite);
    assert_eq!(baseline.components.credibility, 0.0);
}

#[test]
fn test_unchanging_claim_stays_stable() {
    let mut engine = engine();
    well_supported(&mut engine, 1);

    for epoch in 1..=6 {
        let report = engine.evaluate_epoch(epoch * HOUR, &ClaimSelection::All);
        assert!(report.is_clean());
        assert_eq!(report.outcome(cid(1)).unwrap().state, StabilityState::Stable);
    }

    assert!((engine.get_latest_score(cid(1)).unwrap().composite - 0.73).abs() < 1e-9);
    assert!(engine.list_active_alerts(Some(cid(1))).is_empty());
    assert!(engine
        .classification_history(cid(1))
        .iter()
        .all(|c| !c.is_transition()));
    assert_eq!(engine.get_timeline(cid(1), Signal::Confidence).unwrap().len(), 6);
}

#[test]
fn test_retraction_collapses_confidence() {
    let mut engine = engine();
    well_supported(&mut engine, 1);

    engine.evaluate_epoch(HOUR, &ClaimSelection::All);
    engine.evaluate_epoch(2 * HOUR, &ClaimSelection::All);
    engine
        .graph_mut()
        .update_status(cid(1), VerificationStatus::Retracted)
        .unwrap();
    let report = engine.evaluate_epoch(3 * HOUR, &ClaimSelection::All);

    let outcome = report.outcome(cid(1)).unwrap();
    assert!((outcome.confidence - 0.33).abs() < 1e-9);
    let types: Vec<AlertType> = outcome.alerts.iter().map(|a| a.alert_type).collect();
    assert!(types.contains(&AlertType::ConfidenceCollapse));
    assert!(types.contains(&AlertType::StabilityTransition));
    assert!(matches!(
        engine.get_current_state(cid(1)).unwrap(),
        StabilityState::Volatile | StabilityState::Diverging
    ));

    let latest = engine.classification_history(cid(1)).last().unwrap();
    assert_eq!(latest.from, StabilityState::Stable);
    assert_eq!(latest.features.active_alert_count, 1);
    assert!(latest.features.confidence_std.unwrap() > 0.1);
}

#[test]
fn test_rerunning_an_epoch_is_idempotent() {
    let mut engine = engine();
    well_supported(&mut engine, 1);
    engine.evaluate_epoch(HOUR, &ClaimSelection::All);
    engine.evaluate_epoch(2 * HOUR, &ClaimSelection::All);
    engine
        .graph_mut()
        .update_status(cid(1), VerificationStatus::Retracted)
        .unwrap();

    let first = engine.evaluate_epoch(3 * HOUR, &ClaimSelection::All);
    let alert_count = engine.alerts().all().len();
    let second = engine.evaluate_epoch(3 * HOUR, &ClaimSelection::All);

    assert_eq!(first.outcomes, second.outcomes);
    assert_eq!(engine.alerts().all().len(), alert_count);
    assert_eq!(engine.score_history(cid(1)).len(), 3);
    assert_eq!(engine.classification_history(cid(1)).len(), 3);
    assert_eq!(engine.get_timeline(cid(1), Signal::Entropy).unwrap().len(), 3);
}

#[test]
fn test_contradictions_raise_tension() {
    let mut engine = engine();
    for id in 1..=3 {
        add_claim(&mut engine, id, ClaimType::Assertion);
    }
    engine.evaluate_epoch(HOUR, &ClaimSelection::All);

    engine.graph_mut().contradict(cid(1), cid(2), 0.9, HOUR + 1).unwrap();
    engine.graph_mut().contradict(cid(2), cid(3), 0.7, HOUR + 1).unwrap();
    let report = engine.evaluate_epoch(2 * HOUR, &ClaimSelection::All);

    assert_eq!(report.cluster_count, 1);
    assert!((report.total_tension - 1.6).abs() < 1e-12);
    for id in 1..=3 {
        let outcome = report.outcome(cid(id)).unwrap();
        assert!(outcome
            .alerts
            .iter()
            .any(|a| a.alert_type == AlertType::TensionSurge));
    }
    assert_eq!(report.system_alerts.len(), 1);
    assert_eq!(report.system_alerts[0].claim_id, None);

    // contradiction penalty lowers confidence
    let history = engine.score_history(cid(2));
    assert!(history[1].composite < history[0].composite);
    assert!(history[1].components.contradiction > 0.0);
}

#[test]
fn test_root_metric_stays_root_after_mutation() {
    let mut engine = engine();
    engine
        .graph_mut()
        .add_claim(ClaimNode::new(
            cid(1),
            "the dam gates opened at dawn".into(),
            ClaimType::Historical,
            0,
        ))
        .unwrap();
    engine.evaluate_epoch(HOUR, &ClaimSelection::All);

    engine
        .graph_mut()
        .mutate_claim_with_id(cid(1), cid(2), "the dam gates opened at noon", 2 * HOUR)
        .unwrap();
    let report = engine.evaluate_epoch(3 * HOUR, &ClaimSelection::All);
    assert_eq!(report.evaluated, 2);

    let root = engine.mutation_history(cid(1));
    assert_eq!(root.len(), 2);
    for m in &root {
        assert_eq!(m.version_id, cid(1));
        assert_eq!(m.depth, 0);
        assert_eq!(m.entropy, 0.0);
        assert!(m.lineage_similarity.is_none());
    }

    let child = engine.mutation_history(cid(2));
    assert_eq!(child.len(), 1);
    assert_eq!(child[0].version_id, cid(2));
    assert_eq!(child[0].depth, 1);
    assert!(child[0].entropy > 0.0);
    assert!(child[0].lineage_similarity.is_some());
}

#[test]
fn test_resolve_alert_through_engine() {
    let mut config = EngineConfig::default();
    config.alerts.auto_resolve = false;
    let mut engine = EpistemicEngine::new(config).unwrap();
    well_supported(&mut engine, 1);
    engine.evaluate_epoch(HOUR, &ClaimSelection::All);
    engine.evaluate_epoch(2 * HOUR, &ClaimSelection::All);
    engine
        .graph_mut()
        .update_status(cid(1), VerificationStatus::Retracted)
        .unwrap();
    engine.evaluate_epoch(3 * HOUR, &ClaimSelection::All);

    let active: Vec<_> = engine
        .list_active_alerts(Some(cid(1)))
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert!(!active.is_empty());
    for id in &active {
        let alert = engine.resolve_alert(*id, 4 * HOUR).unwrap();
        assert!(alert.resolved);
    }
    assert!(engine.list_active_alerts(None).is_empty());
    assert_eq!(engine.metrics().alerts_resolved, active.len());
}

#[derive(Default)]
struct Collected {
    scores: Vec<ClaimScore>,
    metrics: Vec<MutationMetric>,
    samples: Vec<TimelineSample>,
    classifications: Vec<StabilityClassification>,
    alerts: Vec<EpistemicAlert>,
}

impl RecordSink for Collected {
    type Error = std::convert::Infallible;

    fn record_score(&mut self, score: &ClaimScore) -> Result<(), Self::Error> {
        self.scores.push(score.clone());
        Ok(())
    }

    fn record_metric(&mut self, metric: &MutationMetric) -> Result<(), Self::Error> {
        self.metrics.push(metric.clone());
        Ok(())
    }

    fn record_sample(&mut self, sample: &TimelineSample) -> Result<(), Self::Error> {
        self.samples.push(*sample);
        Ok(())
    }

    fn record_classification(
        &mut self,
        classification: &StabilityClassification,
    ) -> Result<(), Self::Error> {
        self.classifications.push(classification.clone());
        Ok(())
    }

    fn record_alert(&mut self, alert: &EpistemicAlert) -> Result<(), Self::Error> {
        self.alerts.push(alert.clone());
        Ok(())
    }
}

#[test]
fn test_export_writes_every_record() {
    let mut engine = engine();
    well_supported(&mut engine, 1);
    add_claim(&mut engine, 2, ClaimType::Hypothesis);
    for epoch in 1..=3 {
        engine.evaluate_epoch(epoch * HOUR, &ClaimSelection::All);
    }

    let mut sink = Collected::default();
    let written = engine.export(&mut sink).unwrap();

    assert_eq!(sink.scores.len(), 6);
    assert_eq!(sink.metrics.len(), 6);
    assert_eq!(sink.samples.len(), 12);
    assert_eq!(sink.classifications.len(), 6);
    assert_eq!(
        written,
        sink.scores.len()
            + sink.metrics.len()
            + sink.samples.len()
            + sink.classifications.len()
            + sink.alerts.len()
    );
}

/// Accepts scores and metrics, then refuses classifications
#[derive(Default)]
struct RefusingSink {
    writes: usize,
    began: bool,
    committed: bool,
    rolled_back: bool,
}

impl RecordSink for RefusingSink {
    type Error = String;

    fn record_score(&mut self, _: &ClaimScore) -> Result<(), Self::Error> {
        self.writes += 1;
        Ok(())
    }

    fn record_metric(&mut self, _: &MutationMetric) -> Result<(), Self::Error> {
        self.writes += 1;
        Ok(())
    }

    fn record_sample(&mut self, _: &TimelineSample) -> Result<(), Self::Error> {
        self.writes += 1;
        Ok(())
    }

    fn record_classification(&mut self, _: &StabilityClassification) -> Result<(), Self::Error> {
        Err("classification table is read-only".into())
    }

    fn record_alert(&mut self, _: &EpistemicAlert) -> Result<(), Self::Error> {
        self.writes += 1;
        Ok(())
    }

    fn begin_batch(&mut self) -> Result<(), Self::Error> {
        self.began = true;
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<(), Self::Error> {
        self.committed = true;
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<(), Self::Error> {
        self.rolled_back = true;
        Ok(())
    }
}

#[test]
fn test_failed_export_rolls_back() {
    let mut engine = engine();
    well_supported(&mut engine, 1);
    engine.evaluate_epoch(HOUR, &ClaimSelection::All);

    let mut sink = RefusingSink::default();
    let err = engine.export(&mut sink).unwrap_err();
    assert_eq!(err, "classification table is read-only");
    assert!(sink.began);
    assert!(sink.writes > 0);
    assert!(sink.rolled_back);
    assert!(!sink.committed);

    let mut collected = Collected::default();
    engine.export(&mut collected).unwrap();
    assert_eq!(collected.classifications.len(), 1);
}

#[test]
fn test_metrics_accumulate() {
    let mut engine = engine();
    add_claim(&mut engine, 1, ClaimType::Observation);
    engine
        .graph_mut()
        .add_claim(ClaimNode::new(cid(2), "later".into(), ClaimType::Observation, 10 * HOUR))
        .unwrap();

    engine.evaluate_epoch(HOUR, &ClaimSelection::All);
    engine.evaluate_epoch(2 * HOUR, &ClaimSelection::All);

    let metrics = engine.metrics();
    assert_eq!(metrics.epoch_count, 2);
    assert_eq!(metrics.claims_evaluated, 2);
    assert_eq!(metrics.claims_skipped, 2);
    assert!(metrics.summary().contains("Epochs: 2"));
}
