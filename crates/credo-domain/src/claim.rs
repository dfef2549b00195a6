//! Claim module - the fundamental unit under evaluation

use crate::{ClaimId, Timestamp};
use std::fmt;

/// Kind of assertion a claim makes
///
/// The kind determines the claim's scoring prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClaimType {
    /// Something a witness or instrument reports having seen
    Observation,
    /// A quantitative reading
    Measurement,
    /// A proposed explanation
    Hypothesis,
    /// A bare statement without stated grounds
    Assertion,
    /// A conclusion drawn from other claims
    Derived,
    /// A statement about the future
    Prediction,
    /// A statement about past events from records
    Historical,
    /// A response disputing another claim
    Rebuttal,
    /// A withdrawal of an earlier claim
    Retraction,
}

impl ClaimType {
    /// All claim types, in declaration order
    pub const ALL: [ClaimType; 9] = [
        ClaimType::Observation,
        ClaimType::Measurement,
        ClaimType::Hypothesis,
        ClaimType::Assertion,
        ClaimType::Derived,
        ClaimType::Prediction,
        ClaimType::Historical,
        ClaimType::Rebuttal,
        ClaimType::Retraction,
    ];

    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Observation => "observation",
            ClaimType::Measurement => "measurement",
            ClaimType::Hypothesis => "hypothesis",
            ClaimType::Assertion => "assertion",
            ClaimType::Derived => "derived",
            ClaimType::Prediction => "prediction",
            ClaimType::Historical => "historical",
            ClaimType::Rebuttal => "rebuttal",
            ClaimType::Retraction => "retraction",
        }
    }

    /// Parse a claim type from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid claim type: {}", s))
    }
}

/// Verification status of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VerificationStatus {
    /// No verdict yet
    #[default]
    Unverified,
    /// Independently confirmed
    Confirmed,
    /// Actively disputed
    Disputed,
    /// Withdrawn by its originator
    Retracted,
}

impl VerificationStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Confirmed => "confirmed",
            VerificationStatus::Disputed => "disputed",
            VerificationStatus::Retracted => "retracted",
        }
    }

    /// Parse a status from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unverified" => Some(VerificationStatus::Unverified),
            "confirmed" => Some(VerificationStatus::Confirmed),
            "disputed" => Some(VerificationStatus::Disputed),
            "retracted" => Some(VerificationStatus::Retracted),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid verification status: {}", s))
    }
}

/// A claim node in the evidence graph
///
/// Claims are append-only. The verification status is the only field that
/// changes after creation; edits to the text create a new claim whose
/// `mutation_parent` points at the version it corrects.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimNode {
    /// Unique identifier
    pub id: ClaimId,

    /// Free-text content of the claim
    pub content: String,

    /// Kind of assertion
    pub claim_type: ClaimType,

    /// Current verification status
    pub status: VerificationStatus,

    /// The earlier version this claim mutates, if any
    pub mutation_parent: Option<ClaimId>,

    /// When this claim was created
    pub created_at: Timestamp,
}

impl ClaimNode {
    /// Create a new root claim with status `Unverified`
    pub fn new(id: ClaimId, content: String, claim_type: ClaimType, created_at: Timestamp) -> Self {
        Self {
            id,
            content,
            claim_type,
            status: VerificationStatus::Unverified,
            mutation_parent: None,
            created_at,
        }
    }

    /// Set the mutation parent
    pub fn with_parent(mut self, parent: ClaimId) -> Self {
        self.mutation_parent = Some(parent);
        self
    }

    /// Set the verification status
    pub fn with_status(mut self, status: VerificationStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether this claim starts a lineage
    pub fn is_root(&self) -> bool {
        self.mutation_parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_type_parse() {
        assert_eq!(ClaimType::parse("Observation"), Some(ClaimType::Observation));
        assert_eq!(ClaimType::parse("retraction"), Some(ClaimType::Retraction));
        assert_eq!(ClaimType::parse("rumor"), None);
        assert!("hypothesis".parse::<ClaimType>().is_ok());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(VerificationStatus::parse("CONFIRMED"), Some(VerificationStatus::Confirmed));
        assert!("supported".parse::<VerificationStatus>().is_err());
        assert_eq!(VerificationStatus::default(), VerificationStatus::Unverified);
    }

    #[test]
    fn test_claim_builder() {
        let parent = ClaimId::from_value(1);
        let claim = ClaimNode::new(
            ClaimId::from_value(2),
            "gravity failed on Aug 12".to_string(),
            ClaimType::Observation,
            1000,
        )
        .with_parent(parent)
        .with_status(VerificationStatus::Disputed);

        assert!(!claim.is_root());
        assert_eq!(claim.mutation_parent, Some(parent));
        assert_eq!(claim.status, VerificationStatus::Disputed);
    }
}
