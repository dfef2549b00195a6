//! In-memory claim graph

use crate::{ClusterIndex, ContradictionCluster, GraphError};
use credo_domain::{
    ClaimId, ClaimNode, ContradictionEdge, EntityId, EntityNode, EvidenceLink, Relation, SourceId,
    SourceNode, Timestamp, VerificationStatus,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Node and edge counts of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStatistics {
    /// Number of claims
    pub claims: usize,
    /// Number of claims without a mutation parent
    pub root_claims: usize,
    /// Number of sources
    pub sources: usize,
    /// Number of entities
    pub entities: usize,
    /// Number of evidence links
    pub links: usize,
    /// Number of contradiction edges
    pub contradictions: usize,
    /// Number of claim → entity mentions
    pub mentions: usize,
    /// Deepest mutation lineage (ancestors of the deepest claim)
    pub max_lineage_depth: usize,
}

/// Typed evidence graph
///
/// Claims are kept in a `BTreeMap` so iteration is in id order, which keeps
/// every evaluation pass deterministic.
#[derive(Debug, Default)]
pub struct ClaimGraph {
    claims: BTreeMap<ClaimId, ClaimNode>,
    sources: BTreeMap<SourceId, SourceNode>,
    entities: BTreeMap<EntityId, EntityNode>,
    links: Vec<EvidenceLink>,
    links_by_claim: HashMap<ClaimId, Vec<usize>>,
    contradictions: Vec<ContradictionEdge>,
    children: HashMap<ClaimId, Vec<ClaimId>>,
    mentions: HashMap<EntityId, BTreeSet<ClaimId>>,
    mentions_by_claim: HashMap<ClaimId, BTreeSet<EntityId>>,
}

fn check_unit(what: &str, value: f64) -> Result<(), GraphError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GraphError::InvalidState(format!(
            "{} must be in [0.0, 1.0], got {}",
            what, value
        )))
    }
}

impl ClaimGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ---- ingestion ----

    /// Add a claim
    ///
    /// A claim with a `mutation_parent` is attached to that parent's lineage.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the mutation parent does not exist
    /// - `InvalidState` if the id is already taken, the claim predates its
    ///   parent, or the parent chain revisits the claim
    pub fn add_claim(&mut self, claim: ClaimNode) -> Result<(), GraphError> {
        if self.claims.contains_key(&claim.id) {
            return Err(GraphError::InvalidState(format!(
                "claim {} already exists",
                claim.id
            )));
        }

        if let Some(parent_id) = claim.mutation_parent {
            let parent = self
                .claims
                .get(&parent_id)
                .ok_or_else(|| GraphError::claim_not_found(parent_id))?;
            if claim.created_at < parent.created_at {
                return Err(GraphError::InvalidState(format!(
                    "claim {} created at {} predates its parent {} created at {}",
                    claim.id, claim.created_at, parent_id, parent.created_at
                )));
            }
            self.check_acyclic(claim.id, parent_id)?;
        }

        info!(
            claim = %claim.id,
            claim_type = %claim.claim_type,
            parent = ?claim.mutation_parent.map(|p| p.to_string()),
            "Added claim"
        );

        if let Some(parent_id) = claim.mutation_parent {
            self.children.entry(parent_id).or_default().push(claim.id);
        }
        self.claims.insert(claim.id, claim);
        Ok(())
    }

    /// Walk the chain above `parent` and reject it if it reaches `child`
    fn check_acyclic(&self, child: ClaimId, parent: ClaimId) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child || !seen.insert(id) {
                return Err(GraphError::InvalidState(format!(
                    "mutation of {} would revisit ancestor {}",
                    child, id
                )));
            }
            cursor = self.claims.get(&id).and_then(|c| c.mutation_parent);
        }
        Ok(())
    }

    /// Add a source
    ///
    /// # Errors
    ///
    /// `InvalidState` for a duplicate id or a credibility outside [0, 1].
    pub fn add_source(&mut self, source: SourceNode) -> Result<(), GraphError> {
        if self.sources.contains_key(&source.id) {
            return Err(GraphError::InvalidState(format!(
                "source {} already exists",
                source.id
            )));
        }
        check_unit("credibility", source.credibility)?;

        info!(source = %source.id, category = %source.category, "Added source");
        self.sources.insert(source.id, source);
        Ok(())
    }

    /// Add an entity
    pub fn add_entity(&mut self, entity: EntityNode) -> Result<(), GraphError> {
        if self.entities.contains_key(&entity.id) {
            return Err(GraphError::InvalidState(format!(
                "entity {} already exists",
                entity.id
            )));
        }

        info!(entity = %entity.id, kind = %entity.kind, "Added entity");
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    /// Link a source to a claim
    ///
    /// Repeated links between the same pair are kept as distinct
    /// observations.
    pub fn link(
        &mut self,
        source: SourceId,
        claim: ClaimId,
        relation: Relation,
        weight: f64,
        created_at: Timestamp,
    ) -> Result<(), GraphError> {
        if !self.sources.contains_key(&source) {
            return Err(GraphError::source_not_found(source));
        }
        if !self.claims.contains_key(&claim) {
            return Err(GraphError::claim_not_found(claim));
        }
        check_unit("link weight", weight)?;

        debug!(%source, %claim, %relation, weight, "Linked evidence");
        let idx = self.links.len();
        self.links
            .push(EvidenceLink::new(source, claim, relation, weight, created_at));
        self.links_by_claim.entry(claim).or_default().push(idx);
        Ok(())
    }

    /// Record that two claims contradict each other
    pub fn contradict(
        &mut self,
        claim_a: ClaimId,
        claim_b: ClaimId,
        weight: f64,
        created_at: Timestamp,
    ) -> Result<(), GraphError> {
        if claim_a == claim_b {
            return Err(GraphError::InvalidState(format!(
                "claim {} cannot contradict itself",
                claim_a
            )));
        }
        for id in [claim_a, claim_b] {
            if !self.claims.contains_key(&id) {
                return Err(GraphError::claim_not_found(id));
            }
        }
        check_unit("contradiction weight", weight)?;

        debug!(%claim_a, %claim_b, weight, "Recorded contradiction");
        self.contradictions
            .push(ContradictionEdge::new(claim_a, claim_b, weight, created_at));
        Ok(())
    }

    /// Record that a claim mentions an entity
    ///
    /// Mentioning the same entity twice is a no-op.
    pub fn mention(&mut self, claim: ClaimId, entity: EntityId) -> Result<(), GraphError> {
        if !self.claims.contains_key(&claim) {
            return Err(GraphError::claim_not_found(claim));
        }
        if !self.entities.contains_key(&entity) {
            return Err(GraphError::entity_not_found(entity));
        }
        self.mentions.entry(entity).or_default().insert(claim);
        self.mentions_by_claim.entry(claim).or_default().insert(entity);
        Ok(())
    }

    /// Create a corrected version of a claim with a fresh id
    ///
    /// The new claim inherits the parent's claim type and starts
    /// `Unverified`. The parent is left untouched.
    pub fn mutate_claim(
        &mut self,
        parent_id: ClaimId,
        new_text: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<ClaimNode, GraphError> {
        self.mutate_claim_with_id(parent_id, ClaimId::new(), new_text, created_at)
    }

    /// Create a corrected version of a claim under a caller-chosen id
    pub fn mutate_claim_with_id(
        &mut self,
        parent_id: ClaimId,
        id: ClaimId,
        new_text: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<ClaimNode, GraphError> {
        let parent = self
            .claims
            .get(&parent_id)
            .ok_or_else(|| GraphError::claim_not_found(parent_id))?;

        let child = ClaimNode::new(id, new_text.into(), parent.claim_type, created_at)
            .with_parent(parent_id);
        self.add_claim(child.clone())?;
        Ok(child)
    }

    /// Update a claim's verification status
    pub fn update_status(
        &mut self,
        claim: ClaimId,
        status: VerificationStatus,
    ) -> Result<(), GraphError> {
        let node = self
            .claims
            .get_mut(&claim)
            .ok_or_else(|| GraphError::claim_not_found(claim))?;
        info!(%claim, from = %node.status, to = %status, "Updated verification status");
        node.status = status;
        Ok(())
    }

    /// Replace a source's credibility prior
    pub fn set_source_credibility(
        &mut self,
        source: SourceId,
        credibility: f64,
    ) -> Result<(), GraphError> {
        check_unit("credibility", credibility)?;
        let node = self
            .sources
            .get_mut(&source)
            .ok_or_else(|| GraphError::source_not_found(source))?;
        info!(%source, from = node.credibility, to = credibility, "Updated source credibility");
        node.credibility = credibility;
        Ok(())
    }

    // ---- queries ----

    /// Look up a claim
    pub fn claim(&self, id: ClaimId) -> Result<&ClaimNode, GraphError> {
        self.claims
            .get(&id)
            .ok_or_else(|| GraphError::claim_not_found(id))
    }

    /// Look up a source
    pub fn source(&self, id: SourceId) -> Result<&SourceNode, GraphError> {
        self.sources
            .get(&id)
            .ok_or_else(|| GraphError::source_not_found(id))
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Result<&EntityNode, GraphError> {
        self.entities
            .get(&id)
            .ok_or_else(|| GraphError::entity_not_found(id))
    }

    /// Whether the claim exists
    pub fn contains_claim(&self, id: ClaimId) -> bool {
        self.claims.contains_key(&id)
    }

    /// All claims in id order
    pub fn claims(&self) -> impl Iterator<Item = &ClaimNode> {
        self.claims.values()
    }

    /// All sources in id order
    pub fn sources(&self) -> impl Iterator<Item = &SourceNode> {
        self.sources.values()
    }

    /// All contradiction edges in insertion order
    pub fn contradictions(&self) -> &[ContradictionEdge] {
        &self.contradictions
    }

    /// All evidence links touching a claim, in insertion order
    pub fn links_for(&self, claim: ClaimId) -> Vec<&EvidenceLink> {
        self.links_by_claim
            .get(&claim)
            .map(|idxs| idxs.iter().map(|&i| &self.links[i]).collect())
            .unwrap_or_default()
    }

    /// Supporting links of a claim created at or before `t`
    pub fn supporting_links_at(&self, claim: ClaimId, t: Timestamp) -> Vec<&EvidenceLink> {
        self.links_for(claim)
            .into_iter()
            .filter(|l| l.is_supporting() && l.created_at <= t)
            .collect()
    }

    /// Contradicting links of a claim created at or before `t`
    pub fn contradicting_links_at(&self, claim: ClaimId, t: Timestamp) -> Vec<&EvidenceLink> {
        self.links_for(claim)
            .into_iter()
            .filter(|l| l.is_contradicting() && l.created_at <= t)
            .collect()
    }

    /// Entities a claim mentions
    pub fn mentions_of(&self, claim: ClaimId) -> Vec<EntityId> {
        self.mentions_by_claim
            .get(&claim)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Claims that mention an entity, in id order
    pub fn claims_mentioning(&self, entity: EntityId) -> Result<Vec<ClaimId>, GraphError> {
        if !self.entities.contains_key(&entity) {
            return Err(GraphError::entity_not_found(entity));
        }
        Ok(self
            .mentions
            .get(&entity)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Direct mutations of a claim, in insertion order
    pub fn children(&self, claim: ClaimId) -> &[ClaimId] {
        self.children.get(&claim).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The mutation lineage of a claim, root first and ending with the claim
    pub fn lineage(&self, claim: ClaimId) -> Result<Vec<&ClaimNode>, GraphError> {
        let mut chain = Vec::new();
        let mut cursor = Some(claim);
        while let Some(id) = cursor {
            let node = self.claim(id)?;
            chain.push(node);
            cursor = node.mutation_parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Number of ancestors of a claim
    pub fn depth(&self, claim: ClaimId) -> Result<usize, GraphError> {
        Ok(self.lineage(claim)?.len() - 1)
    }

    /// Latest version of a claim visible at `t`
    ///
    /// Searches the claim and all its descendants for the one created most
    /// recently at or before `t`, breaking ties by the largest id. Returns
    /// `None` when the claim itself was created after `t`.
    pub fn lineage_head_at(
        &self,
        claim: ClaimId,
        t: Timestamp,
    ) -> Result<Option<&ClaimNode>, GraphError> {
        let start = self.claim(claim)?;
        if start.created_at > t {
            return Ok(None);
        }

        let mut head = start;
        let mut stack: Vec<ClaimId> = self.children(claim).to_vec();
        while let Some(id) = stack.pop() {
            let node = self.claim(id)?;
            if node.created_at > t {
                // children never predate their parents
                continue;
            }
            if (node.created_at, node.id) > (head.created_at, head.id) {
                head = node;
            }
            stack.extend_from_slice(self.children(id));
        }
        Ok(Some(head))
    }

    /// Contradiction clusters over every edge
    pub fn find_contradiction_clusters(&self) -> Vec<ContradictionCluster> {
        self.cluster_index(Timestamp::MAX).into_clusters()
    }

    /// Contradiction clusters over edges created at or before `t`
    pub fn find_contradiction_clusters_at(&self, t: Timestamp) -> Vec<ContradictionCluster> {
        self.cluster_index(t).into_clusters()
    }

    /// Claim → cluster index over edges created at or before `t`
    pub fn cluster_index(&self, t: Timestamp) -> ClusterIndex {
        ClusterIndex::build(self.contradictions.iter().filter(|e| e.created_at <= t), t)
    }

    /// Node and edge counts
    pub fn statistics(&self) -> GraphStatistics {
        let max_lineage_depth = self
            .claims
            .keys()
            .filter_map(|id| self.depth(*id).ok())
            .max()
            .unwrap_or(0);
        GraphStatistics {
            claims: self.claims.len(),
            root_claims: self.claims.values().filter(|c| c.is_root()).count(),
            sources: self.sources.len(),
            entities: self.entities.len(),
            links: self.links.len(),
            contradictions: self.contradictions.len(),
            mentions: self.mentions.values().map(BTreeSet::len).sum(),
            max_lineage_depth,
        }
    }
}
