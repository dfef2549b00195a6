//! Contradiction clusters
//!
//! Claims joined by a path of contradiction edges share a cluster,
//! regardless of edge weight. Clusters are computed with union-find over a
//! snapshot of the edges, so every claim in one evaluation epoch sees the
//! same partition.

use credo_domain::{ClaimId, ContradictionEdge, Timestamp};
use std::collections::HashMap;

/// Union-find with path halving and union by size
#[derive(Debug, Default)]
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn add(&mut self) -> usize {
        let idx = self.parent.len();
        self.parent.push(idx);
        self.size.push(1);
        idx
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

/// A disjoint group of mutually conflicting claims
#[derive(Debug, Clone, PartialEq)]
pub struct ContradictionCluster {
    /// Member claims, sorted by id
    pub members: Vec<ClaimId>,

    /// Member with the most incident edges (smallest id on ties)
    pub center: ClaimId,

    /// Sum of edge weights inside the cluster
    pub total_weight: f64,

    /// Number of edges inside the cluster
    pub edge_count: usize,
}

impl ContradictionCluster {
    /// Number of member claims (always >= 2)
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Log-scaled tension of the cluster, `ln(1 + total_weight)`
    pub fn tension(&self) -> f64 {
        self.total_weight.ln_1p()
    }

    /// Whether the claim is a member
    pub fn contains(&self, claim: ClaimId) -> bool {
        self.members.binary_search(&claim).is_ok()
    }
}

/// Partition of claims into contradiction clusters at one point in time
#[derive(Debug, Clone, Default)]
pub struct ClusterIndex {
    as_of: Timestamp,
    clusters: Vec<ContradictionCluster>,
    by_claim: HashMap<ClaimId, usize>,
}

impl ClusterIndex {
    /// Build the partition from the given edges
    ///
    /// Callers filter the edges to the snapshot they want; `as_of` is only
    /// recorded.
    pub fn build<'a, I>(edges: I, as_of: Timestamp) -> Self
    where
        I: IntoIterator<Item = &'a ContradictionEdge>,
    {
        let edges: Vec<&ContradictionEdge> = edges.into_iter().collect();
        let mut sets = DisjointSet::default();
        let mut slot: HashMap<ClaimId, usize> = HashMap::new();
        let mut claims: Vec<ClaimId> = Vec::new();

        let mut slot_of = |id: ClaimId, sets: &mut DisjointSet| -> usize {
            *slot.entry(id).or_insert_with(|| {
                claims.push(id);
                sets.add()
            })
        };

        let mut endpoints = Vec::with_capacity(edges.len());
        for edge in &edges {
            let a = slot_of(edge.claim_a, &mut sets);
            let b = slot_of(edge.claim_b, &mut sets);
            sets.union(a, b);
            endpoints.push((a, b));
        }

        // root -> (members, total weight, edge count)
        let mut groups: HashMap<usize, (Vec<usize>, f64, usize)> = HashMap::new();
        for idx in 0..claims.len() {
            let root = sets.find(idx);
            groups.entry(root).or_default().0.push(idx);
        }

        let mut degree = vec![0usize; claims.len()];
        for (edge, (a, b)) in edges.iter().zip(&endpoints) {
            degree[*a] += 1;
            degree[*b] += 1;
            let group = groups.entry(sets.find(*a)).or_default();
            group.1 += edge.weight;
            group.2 += 1;
        }

        let mut clusters: Vec<ContradictionCluster> = groups
            .into_values()
            .filter(|(members, _, _)| members.len() >= 2)
            .map(|(members, total_weight, edge_count)| {
                let center = members
                    .iter()
                    .map(|&i| (degree[i], claims[i]))
                    .max_by(|(da, ia), (db, ib)| da.cmp(db).then(ib.cmp(ia)))
                    .map(|(_, id)| id)
                    .unwrap_or(claims[members[0]]);
                let mut ids: Vec<ClaimId> = members.iter().map(|&i| claims[i]).collect();
                ids.sort();
                ContradictionCluster {
                    members: ids,
                    center,
                    total_weight,
                    edge_count,
                }
            })
            .collect();
        clusters.sort_by(|a, b| a.members[0].cmp(&b.members[0]));

        let mut by_claim = HashMap::new();
        for (idx, cluster) in clusters.iter().enumerate() {
            for member in &cluster.members {
                by_claim.insert(*member, idx);
            }
        }

        Self {
            as_of,
            clusters,
            by_claim,
        }
    }

    /// Snapshot time the index was built for
    pub fn as_of(&self) -> Timestamp {
        self.as_of
    }

    /// All clusters, ordered by their smallest member
    pub fn clusters(&self) -> &[ContradictionCluster] {
        &self.clusters
    }

    /// Consume the index, returning its clusters
    pub fn into_clusters(self) -> Vec<ContradictionCluster> {
        self.clusters
    }

    /// Cluster containing the claim, if any
    pub fn cluster_of(&self, claim: ClaimId) -> Option<&ContradictionCluster> {
        self.by_claim.get(&claim).map(|&idx| &self.clusters[idx])
    }

    /// Number of other claims sharing the claim's cluster (0 outside clusters)
    pub fn peer_count(&self, claim: ClaimId) -> usize {
        self.cluster_of(claim).map(|c| c.size() - 1).unwrap_or(0)
    }

    /// Sum of edge weights across all clusters
    pub fn total_weight(&self) -> f64 {
        self.clusters.iter().map(|c| c.total_weight).sum()
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether there are no clusters
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
