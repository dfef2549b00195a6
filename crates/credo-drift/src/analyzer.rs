//! Lineage drift analysis over the claim graph

use crate::report::{BranchingReport, LineageReport, LineageStep};
use crate::tokens::{edit_distribution, jaccard_similarity, tokenize};
use crate::DriftError;
use credo_domain::time::elapsed_hours;
use credo_domain::{ClaimId, ClaimNode, EditDistribution, MutationMetric, Timestamp};
use credo_graph::ClaimGraph;
use tracing::debug;

/// Drift of a single lineage version relative to its parent
#[derive(Debug, Clone, PartialEq)]
pub struct VersionDrift {
    /// Analysed version
    pub version_id: ClaimId,
    /// Number of ancestors
    pub depth: usize,
    /// Entropy of the edit distribution from the parent (0 for roots)
    pub entropy: f64,
    /// Entropy change per hour relative to the parent's own entropy
    pub drift_velocity: Option<f64>,
    /// Token-set Jaccard similarity with the parent
    pub lineage_similarity: Option<f64>,
    /// Edit-operation distribution from the parent
    pub distribution: EditDistribution,
}

/// Stateless analyzer reading mutation lineages from a [`ClaimGraph`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftAnalyzer;

impl DriftAnalyzer {
    /// Create an analyzer
    pub fn new() -> Self {
        Self
    }

    /// Entropy and distribution of one edit step (zero for a root)
    fn step(
        &self,
        graph: &ClaimGraph,
        node: &ClaimNode,
    ) -> Result<(f64, EditDistribution, Option<f64>), DriftError> {
        let Some(parent_id) = node.mutation_parent else {
            return Ok((0.0, EditDistribution::default(), None));
        };
        let parent = graph.claim(parent_id)?;
        let from = tokenize(&parent.content);
        let to = tokenize(&node.content);
        let distribution = edit_distribution(&from, &to);
        Ok((
            distribution.entropy(),
            distribution,
            Some(jaccard_similarity(&from, &to)),
        ))
    }

    /// Drift of a version relative to its parent
    pub fn version(
        &self,
        graph: &ClaimGraph,
        version: ClaimId,
    ) -> Result<VersionDrift, DriftError> {
        let node = graph.claim(version)?;
        let depth = graph.depth(version)?;
        let (entropy, distribution, lineage_similarity) = self.step(graph, node)?;

        let drift_velocity = match node.mutation_parent {
            None => None,
            Some(parent_id) => {
                let parent = graph.claim(parent_id)?;
                let (parent_entropy, _, _) = self.step(graph, parent)?;
                let hours = elapsed_hours(parent.created_at, node.created_at);
                if hours > 0.0 {
                    Some((entropy - parent_entropy) / hours)
                } else {
                    None
                }
            }
        };

        Ok(VersionDrift {
            version_id: version,
            depth,
            entropy,
            drift_velocity,
            lineage_similarity,
            distribution,
        })
    }

    /// Mutation metric for a claim's own edit at epoch `t`
    ///
    /// A root reports zero entropy and no similarity whatever its
    /// descendants look like.
    ///
    /// # Errors
    ///
    /// `NotVisible` when the claim was created after `t`.
    pub fn metric_at(
        &self,
        graph: &ClaimGraph,
        claim: ClaimId,
        t: Timestamp,
    ) -> Result<MutationMetric, DriftError> {
        if graph.claim(claim)?.created_at > t {
            return Err(DriftError::NotVisible { claim, at: t });
        }
        let drift = self.version(graph, claim)?;

        debug!(
            %claim,
            version = %drift.version_id,
            entropy = drift.entropy,
            drift_velocity = ?drift.drift_velocity,
            "Computed mutation metric"
        );

        Ok(MutationMetric {
            claim_id: claim,
            timestamp: t,
            version_id: drift.version_id,
            depth: drift.depth,
            entropy: drift.entropy,
            drift_velocity: drift.drift_velocity,
            lineage_similarity: drift.lineage_similarity,
            distribution: drift.distribution,
        })
    }

    /// Step-by-step statistics of the lineage ending at `claim`
    pub fn lineage_report(
        &self,
        graph: &ClaimGraph,
        claim: ClaimId,
    ) -> Result<LineageReport, DriftError> {
        let chain = graph.lineage(claim)?;
        let mut steps = Vec::with_capacity(chain.len().saturating_sub(1));
        for node in chain.iter().skip(1) {
            let drift = self.version(graph, node.id)?;
            steps.push(LineageStep {
                version_id: node.id,
                created_at: node.created_at,
                entropy: drift.entropy,
                similarity: drift.lineage_similarity.unwrap_or(1.0),
                drift_velocity: drift.drift_velocity,
            });
        }
        Ok(LineageReport::from_steps(claim, chain.len(), steps))
    }

    /// How many mutations descend from `claim`
    pub fn branching(
        &self,
        graph: &ClaimGraph,
        claim: ClaimId,
    ) -> Result<BranchingReport, DriftError> {
        graph.claim(claim)?;
        let direct_children = graph.children(claim).to_vec();
        let mut total = 0;
        let mut stack = direct_children.clone();
        while let Some(id) = stack.pop() {
            total += 1;
            stack.extend_from_slice(graph.children(id));
        }
        Ok(BranchingReport {
            claim_id: claim,
            direct_children,
            total_descendants: total,
        })
    }
}
