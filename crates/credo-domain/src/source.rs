//! Source nodes
//!
//! A source asserts or disputes claims. Its credibility prior comes from an
//! external reputation subsystem and is read-only inside the core apart from
//! explicit updates through the graph.

use crate::{SourceId, Timestamp};
use std::fmt;

/// Category of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SourceCategory {
    /// Social media posts and comments
    Social,
    /// Articles, reports, filings
    Document,
    /// Peer-reviewed or preprint research
    Academic,
    /// Official government publications
    Government,
}

impl SourceCategory {
    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Social => "social",
            SourceCategory::Document => "document",
            SourceCategory::Academic => "academic",
            SourceCategory::Government => "government",
        }
    }

    /// Parse a category from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "social" => Some(SourceCategory::Social),
            "document" => Some(SourceCategory::Document),
            "academic" => Some(SourceCategory::Academic),
            "government" => Some(SourceCategory::Government),
            _ => None,
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source category: {}", s))
    }
}

/// A source node in the evidence graph
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    /// Unique identifier
    pub id: SourceId,

    /// Display title
    pub title: String,

    /// Source category
    pub category: SourceCategory,

    /// Credibility prior in [0.0, 1.0]
    pub credibility: f64,

    /// When this source was registered
    pub created_at: Timestamp,
}

impl SourceNode {
    /// Create a new source node
    pub fn new(
        id: SourceId,
        title: String,
        category: SourceCategory,
        credibility: f64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            category,
            credibility,
            created_at,
        }
    }

    /// Whether the credibility prior lies in [0.0, 1.0]
    pub fn has_valid_credibility(&self) -> bool {
        (0.0..=1.0).contains(&self.credibility)
    }
}
