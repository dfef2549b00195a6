//! Input documents produced by ingestion adapters.
//!
//! Records arrive already validated upstream; conversion into domain types
//! and the graph's own checks happen here.

use crate::error::{CliError, Result};
use credo_domain::{
    ClaimId, ClaimNode, ClaimType, EntityId, EntityNode, Relation, SourceCategory, SourceId,
    SourceNode, Timestamp, VerificationStatus,
};
use credo_graph::ClaimGraph;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// A complete input document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputDocument {
    /// Sources
    pub sources: Vec<SourceInput>,
    /// Claims, in any order
    pub claims: Vec<ClaimInput>,
    /// Entities
    pub entities: Vec<EntityInput>,
    /// Evidence links
    pub links: Vec<LinkInput>,
    /// Contradiction edges
    pub contradictions: Vec<ContradictionInput>,
    /// Claim mentions of entities
    pub mentions: Vec<MentionInput>,
}

/// A source record.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceInput {
    /// UUID
    pub id: String,
    /// Title
    pub title: String,
    /// Category
    pub category: SourceCategory,
    /// Credibility prior in [0, 1]
    pub credibility: f64,
    /// Creation time (ms)
    #[serde(default)]
    pub created_at: Timestamp,
}

/// A claim record.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimInput {
    /// UUID
    pub id: String,
    /// Claim text
    pub content: String,
    /// Claim type
    pub claim_type: ClaimType,
    /// Verification status
    #[serde(default)]
    pub status: VerificationStatus,
    /// UUID of the version this claim corrects
    #[serde(default)]
    pub parent: Option<String>,
    /// Creation time (ms)
    #[serde(default)]
    pub created_at: Timestamp,
}

/// An entity record.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityInput {
    /// UUID
    pub id: String,
    /// Name
    pub name: String,
    /// Free-form kind (person, place, ...)
    #[serde(default)]
    pub kind: String,
    /// Creation time (ms)
    #[serde(default)]
    pub created_at: Timestamp,
}

/// An evidence link record.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkInput {
    /// Source UUID
    pub source: String,
    /// Claim UUID
    pub claim: String,
    /// Relation
    pub relation: Relation,
    /// Weight in [0, 1]
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Creation time (ms)
    #[serde(default)]
    pub created_at: Timestamp,
}

/// A contradiction record.
#[derive(Debug, Clone, Deserialize)]
pub struct ContradictionInput {
    /// First claim UUID
    pub claim_a: String,
    /// Second claim UUID
    pub claim_b: String,
    /// Weight in [0, 1]
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Creation time (ms)
    #[serde(default)]
    pub created_at: Timestamp,
}

/// A mention record.
#[derive(Debug, Clone, Deserialize)]
pub struct MentionInput {
    /// Claim UUID
    pub claim: String,
    /// Entity UUID
    pub entity: String,
}

fn default_weight() -> f64 {
    1.0
}

impl InputDocument {
    /// Read a document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a JSON document.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the evidence graph.
    ///
    /// Claims are inserted parents first regardless of document order.
    pub fn into_graph(self) -> Result<ClaimGraph> {
        let mut graph = ClaimGraph::new();

        for s in self.sources {
            graph.add_source(SourceNode::new(
                source_id(&s.id)?,
                s.title,
                s.category,
                s.credibility,
                s.created_at,
            ))?;
        }
        for e in self.entities {
            graph.add_entity(EntityNode::new(entity_id(&e.id)?, e.name, e.kind, e.created_at))?;
        }

        let mut pending = self
            .claims
            .into_iter()
            .map(|c| -> Result<ClaimNode> {
                let id = claim_id(&c.id)?;
                let parent = c.parent.as_deref().map(claim_id).transpose()?;
                let mut node = ClaimNode::new(id, c.content, c.claim_type, c.created_at)
                    .with_status(c.status);
                node.mutation_parent = parent;
                Ok(node)
            })
            .collect::<Result<Vec<_>>>()?;
        pending.sort_by_key(|c| (c.created_at, c.id));

        let mut inserted: HashSet<ClaimId> = HashSet::new();
        while !pending.is_empty() {
            let (ready, waiting): (Vec<_>, Vec<_>) = pending.into_iter().partition(|c| {
                c.mutation_parent.is_none_or(|p| inserted.contains(&p))
            });
            if ready.is_empty() {
                let ids: Vec<String> = waiting.iter().map(|c| c.id.to_string()).collect();
                return Err(CliError::InvalidInput(format!(
                    "claims with unknown or cyclic parents: {}",
                    ids.join(", ")
                )));
            }
            for claim in ready {
                inserted.insert(claim.id);
                graph.add_claim(claim)?;
            }
            pending = waiting;
        }

        for l in self.links {
            graph.link(
                source_id(&l.source)?,
                claim_id(&l.claim)?,
                l.relation,
                l.weight,
                l.created_at,
            )?;
        }
        for c in self.contradictions {
            graph.contradict(claim_id(&c.claim_a)?, claim_id(&c.claim_b)?, c.weight, c.created_at)?;
        }
        for m in self.mentions {
            graph.mention(claim_id(&m.claim)?, entity_id(&m.entity)?)?;
        }

        let stats = graph.statistics();
        info!(
            claims = stats.claims,
            sources = stats.sources,
            links = stats.links,
            contradictions = stats.contradictions,
            "Loaded input graph"
        );
        Ok(graph)
    }
}

/// Parse a claim id argument.
pub fn claim_id(s: &str) -> Result<ClaimId> {
    ClaimId::from_string(s).map_err(CliError::InvalidInput)
}

fn source_id(s: &str) -> Result<SourceId> {
    SourceId::from_string(s).map_err(CliError::InvalidInput)
}

fn entity_id(s: &str) -> Result<EntityId> {
    EntityId::from_string(s).map_err(CliError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "sources": [
            {"id": "00000000-0000-7000-8000-000000000011", "title": "harbor log",
             "category": "document", "credibility": 0.8},
            {"id": "00000000-0000-7000-8000-000000000012", "title": "witness post",
             "category": "social", "credibility": 0.6}
        ],
        "claims": [
            {"id": "00000000-0000-7000-8000-000000000002", "content": "the ship docked at nine",
             "claim_type": "observation", "parent": "00000000-0000-7000-8000-000000000001",
             "created_at": 3600000},
            {"id": "00000000-0000-7000-8000-000000000001", "content": "the ship docked at eight",
             "claim_type": "observation", "status": "disputed"}
        ],
        "entities": [
            {"id": "00000000-0000-7000-8000-000000000021", "name": "north pier", "kind": "place"}
        ],
        "links": [
            {"source": "00000000-0000-7000-8000-000000000011",
             "claim": "00000000-0000-7000-8000-000000000001", "relation": "supports"},
            {"source": "00000000-0000-7000-8000-000000000012",
             "claim": "00000000-0000-7000-8000-000000000001", "relation": "contradicts",
             "weight": 0.5}
        ],
        "mentions": [
            {"claim": "00000000-0000-7000-8000-000000000001",
             "entity": "00000000-0000-7000-8000-000000000021"}
        ]
    }"#;

    #[test]
    fn test_document_into_graph() {
        let graph = InputDocument::parse(DOC).unwrap().into_graph().unwrap();
        let stats = graph.statistics();
        assert_eq!(stats.claims, 2);
        assert_eq!(stats.root_claims, 1);
        assert_eq!(stats.links, 2);
        assert_eq!(stats.mentions, 1);

        let root = claim_id("00000000-0000-7000-8000-000000000001").unwrap();
        assert_eq!(graph.claim(root).unwrap().status, VerificationStatus::Disputed);
        assert_eq!(graph.children(root).len(), 1);
    }

    #[test]
    fn test_empty_document() {
        let graph = InputDocument::parse("{}").unwrap().into_graph().unwrap();
        assert_eq!(graph.statistics().claims, 0);
    }

    #[test]
    fn test_missing_parent() {
        let doc = r#"{"claims": [
            {"id": "00000000-0000-7000-8000-000000000002", "content": "x",
             "claim_type": "assertion", "parent": "00000000-0000-7000-8000-000000000009"}
        ]}"#;
        let result = InputDocument::parse(doc).unwrap().into_graph();
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_ids_and_types() {
        let doc = r#"{"claims": [{"id": "nope", "content": "x", "claim_type": "assertion"}]}"#;
        assert!(matches!(
            InputDocument::parse(doc).unwrap().into_graph(),
            Err(CliError::InvalidInput(_))
        ));
        let doc = r#"{"claims": [{"id": "00000000-0000-7000-8000-000000000002",
            "content": "x", "claim_type": "rumor"}]}"#;
        assert!(matches!(InputDocument::parse(doc), Err(CliError::Serialization(_))));
    }

    #[test]
    fn test_graph_rejects_bad_weight() {
        let doc = r#"{
            "sources": [{"id": "00000000-0000-7000-8000-000000000011", "title": "s",
                         "category": "document", "credibility": 0.8}],
            "claims": [{"id": "00000000-0000-7000-8000-000000000001", "content": "x",
                        "claim_type": "assertion"}],
            "links": [{"source": "00000000-0000-7000-8000-000000000011",
                       "claim": "00000000-0000-7000-8000-000000000001",
                       "relation": "supports", "weight": 1.5}]
        }"#;
        assert!(matches!(
            InputDocument::parse(doc).unwrap().into_graph(),
            Err(CliError::Graph(_))
        ));
    }
}
