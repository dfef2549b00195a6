//! Composite confidence scorer

use crate::components::{
    citation_density, contradiction_penalty, mutation_decay, prior_for, verification_modifier,
    weighted_credibility,
};
use crate::{ScorerConfig, ScorerError};
use credo_domain::{ClaimId, ClaimScore, ScoreComponents, Timestamp};
use credo_graph::{ClaimGraph, ClusterIndex};
use tracing::debug;

/// Point-in-time confidence scorer
///
/// Scoring is a pure function of the graph snapshot, the cluster index, the
/// claim's latest drift velocity and the evaluation time. Identical inputs
/// always yield the identical score.
///
/// # Examples
///
/// ```
/// use credo_domain::{ClaimId, ClaimNode, ClaimType};
/// use credo_graph::ClaimGraph;
/// use credo_scorer::{ConfidenceScorer, ScorerConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = ClaimGraph::new();
/// let id = ClaimId::from_value(1);
/// graph.add_claim(ClaimNode::new(id, "reported outage".into(), ClaimType::Observation, 0))?;
///
/// let scorer = ConfidenceScorer::new(ScorerConfig::default())?;
/// let score = scorer.score(&graph, id, 0, &graph.cluster_index(0), None)?;
/// assert!((score.composite - 0.12).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    config: ScorerConfig,
}

impl ConfidenceScorer {
    /// Create a scorer, validating the configuration
    pub fn new(config: ScorerConfig) -> Result<Self, ScorerError> {
        config.validate().map_err(ScorerError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Scorer configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Compute the raw components for a claim at `t`
    pub fn components(
        &self,
        graph: &ClaimGraph,
        claim_id: ClaimId,
        t: Timestamp,
        clusters: &ClusterIndex,
        drift_velocity: Option<f64>,
    ) -> Result<ScoreComponents, ScorerError> {
        let claim = graph.claim(claim_id)?;
        let supporting = graph.supporting_links_at(claim_id, t);
        let contradicting_weight: f64 = graph
            .contradicting_links_at(claim_id, t)
            .iter()
            .map(|l| l.weight)
            .sum();

        let credibility = weighted_credibility(supporting.iter().copied(), |link| {
            graph
                .source(link.source_id)
                .map(|s| s.credibility)
                .map_err(ScorerError::from)
        })?;

        Ok(ScoreComponents {
            prior: prior_for(claim.claim_type),
            credibility,
            citation: citation_density(supporting.len(), self.config.citation_saturation),
            contradiction: contradiction_penalty(
                clusters.peer_count(claim_id),
                contradicting_weight,
                self.config.contradiction_saturation,
            ),
            verification: verification_modifier(claim.status),
            mutation_decay: mutation_decay(drift_velocity, self.config.decay_saturation),
        })
    }

    /// Score a claim at `t`
    ///
    /// A claim without evidence links scores on its prior and verification
    /// terms alone.
    pub fn score(
        &self,
        graph: &ClaimGraph,
        claim_id: ClaimId,
        t: Timestamp,
        clusters: &ClusterIndex,
        drift_velocity: Option<f64>,
    ) -> Result<ClaimScore, ScorerError> {
        let components = self.components(graph, claim_id, t, clusters, drift_velocity)?;
        let weights = self.config.weights;
        let composite = components.weighted_sum(&weights).clamp(0.0, 1.0);

        debug!(claim = %claim_id, t, composite, "Scored claim");

        Ok(ClaimScore {
            claim_id,
            timestamp: t,
            components,
            weights,
            composite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credo_graph::GraphError;
    use credo_domain::{
        ClaimNode, ClaimType, Relation, ScoreWeights, SourceCategory, SourceId, SourceNode,
        VerificationStatus,
    };

    fn cid(v: u128) -> ClaimId {
        ClaimId::from_value(v)
    }

    fn sid(v: u128) -> SourceId {
        SourceId::from_value(v)
    }

    fn observation_graph() -> ClaimGraph {
        let mut graph = ClaimGraph::new();
        graph
            .add_claim(ClaimNode::new(cid(1), "C1".into(), ClaimType::Observation, 0))
            .unwrap();
        graph
            .add_source(SourceNode::new(sid(1), "A".into(), SourceCategory::Academic, 0.8, 0))
            .unwrap();
        graph
            .add_source(SourceNode::new(sid(2), "B".into(), SourceCategory::Social, 0.6, 0))
            .unwrap();
        graph.link(sid(1), cid(1), Relation::Supports, 1.0, 0).unwrap();
        graph.link(sid(2), cid(1), Relation::Supports, 1.0, 0).unwrap();
        graph
    }

    #[test]
    fn test_two_supporting_sources_beat_prior_only() {
        let graph = observation_graph();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        let clusters = graph.cluster_index(0);

        let score = scorer.score(&graph, cid(1), 0, &clusters, None).unwrap();
        let c = score.components;
        assert_eq!(c.prior, 0.60);
        assert!((c.credibility - 0.7).abs() < 1e-12);
        assert!(c.citation > 0.0);
        assert_eq!(c.contradiction, 0.0);
        assert_eq!(c.verification, 0.0);
        assert_eq!(c.mutation_decay, 0.0);

        let baseline = ScoreWeights::default().prior * c.prior;
        assert!(score.composite > baseline);
        // 0.2*0.6 + 0.2*0.7 + 0.2*0.4
        assert!((score.composite - 0.34).abs() < 1e-12);
    }

    #[test]
    fn test_no_links_uses_prior_and_verification() {
        let mut graph = ClaimGraph::new();
        graph
            .add_claim(
                ClaimNode::new(cid(1), "solo".into(), ClaimType::Measurement, 0)
                    .with_status(VerificationStatus::Confirmed),
            )
            .unwrap();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        let score = scorer
            .score(&graph, cid(1), 0, &graph.cluster_index(0), None)
            .unwrap();
        assert_eq!(score.components.credibility, 0.0);
        assert_eq!(score.components.citation, 0.0);
        assert!((score.composite - (0.2 * 0.65 + 0.2 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_links_after_t_ignored() {
        let graph = observation_graph();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        let mut late = graph;
        late.link(sid(1), cid(1), Relation::Supports, 1.0, 500).unwrap();

        let before = scorer.score(&late, cid(1), 100, &late.cluster_index(100), None).unwrap();
        let after = scorer.score(&late, cid(1), 500, &late.cluster_index(500), None).unwrap();
        assert!(after.components.citation > before.components.citation);
    }

    #[test]
    fn test_contradiction_lowers_score() {
        let mut graph = observation_graph();
        graph
            .add_claim(ClaimNode::new(cid(2), "C2".into(), ClaimType::Rebuttal, 0))
            .unwrap();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        let clean = scorer.score(&graph, cid(1), 0, &graph.cluster_index(0), None).unwrap();

        graph.contradict(cid(1), cid(2), 0.9, 0).unwrap();
        let contested = scorer.score(&graph, cid(1), 0, &graph.cluster_index(0), None).unwrap();
        assert!(contested.components.contradiction > 0.0);
        assert!(contested.composite < clean.composite);
    }

    #[test]
    fn test_contradicting_source_raises_penalty() {
        let with_third_source = || {
            let mut graph = observation_graph();
            graph
                .add_source(SourceNode::new(sid(3), "C".into(), SourceCategory::Document, 0.7, 0))
                .unwrap();
            graph
        };
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        let mut graph = with_third_source();
        let clean = scorer.score(&graph, cid(1), 0, &graph.cluster_index(0), None).unwrap();

        let mut neutral = with_third_source();
        neutral.link(sid(3), cid(1), Relation::Neutral, 1.0, 0).unwrap();
        let mentioned = scorer
            .score(&neutral, cid(1), 0, &neutral.cluster_index(0), None)
            .unwrap();
        assert_eq!(mentioned, clean);

        graph.link(sid(3), cid(1), Relation::Contradicts, 1.0, 0).unwrap();
        let disputed = scorer.score(&graph, cid(1), 0, &graph.cluster_index(0), None).unwrap();
        assert!((disputed.components.contradiction - 2f64.ln() / 6f64.ln()).abs() < 1e-12);
        assert!(disputed.composite < clean.composite);
        // contradicting links neither cite nor lend credibility
        assert_eq!(disputed.components.citation, clean.components.citation);
        assert_eq!(disputed.components.credibility, clean.components.credibility);
    }

    #[test]
    fn test_fast_edit_decay_bounded() {
        let graph = observation_graph();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        // a one-minute rewrite yields velocities far above one entropy per hour
        let score = scorer
            .score(&graph, cid(1), 0, &graph.cluster_index(0), Some(60.0))
            .unwrap();
        assert_eq!(score.components.mutation_decay, 1.0);
        // 0.34 with no drift, minus the full 0.1 decay weight
        assert!((score.composite - 0.24).abs() < 1e-12);
    }

    #[test]
    fn test_retracted_clamps_to_zero() {
        let mut graph = ClaimGraph::new();
        graph
            .add_claim(
                ClaimNode::new(cid(1), "withdrawn".into(), ClaimType::Retraction, 0)
                    .with_status(VerificationStatus::Retracted),
            )
            .unwrap();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        let score = scorer
            .score(&graph, cid(1), 0, &graph.cluster_index(0), Some(3.0))
            .unwrap();
        assert_eq!(score.composite, 0.0);
    }

    #[test]
    fn test_unknown_claim() {
        let graph = ClaimGraph::new();
        let scorer = ConfidenceScorer::new(ScorerConfig::default()).unwrap();
        assert!(matches!(
            scorer.score(&graph, cid(1), 0, &graph.cluster_index(0), None),
            Err(ScorerError::Graph(GraphError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let config = ScorerConfig {
            weights: ScoreWeights {
                prior: 0.9,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfidenceScorer::new(config),
            Err(ScorerError::InvalidConfig(_))
        ));
    }
}
