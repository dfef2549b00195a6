//! Epoch selection and results

use crate::ErrorKind;
use credo_domain::{ClaimId, EpistemicAlert, StabilityState, Timestamp};

/// Claims an epoch evaluates
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClaimSelection {
    /// Every claim in the graph
    #[default]
    All,
    /// Only the listed claims
    Claims(Vec<ClaimId>),
}

impl ClaimSelection {
    /// Select a single claim
    pub fn one(claim: ClaimId) -> Self {
        ClaimSelection::Claims(vec![claim])
    }
}

/// Result of evaluating one claim
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimOutcome {
    /// Evaluated claim
    pub claim_id: ClaimId,
    /// Composite confidence
    pub confidence: f64,
    /// Entropy of the lineage head
    pub entropy: f64,
    /// State before the epoch
    pub from: StabilityState,
    /// State after the epoch
    pub state: StabilityState,
    /// Alerts that fired for the claim this epoch
    pub alerts: Vec<EpistemicAlert>,
}

impl ClaimOutcome {
    /// Whether the claim changed state
    pub fn transitioned(&self) -> bool {
        self.from != self.state
    }
}

/// A claim that could not be evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimFailure {
    /// Claim that failed
    pub claim_id: ClaimId,
    /// Coarse error kind
    pub kind: ErrorKind,
    /// Error message
    pub message: String,
}

/// Result of one evaluation epoch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpochReport {
    /// Evaluation timestamp
    pub epoch: Timestamp,
    /// Claims evaluated successfully
    pub evaluated: usize,
    /// Selected claims created after the epoch
    pub skipped: usize,
    /// Contradiction clusters at the epoch
    pub cluster_count: usize,
    /// Total contradiction weight at the epoch
    pub total_tension: f64,
    /// Per-claim results, in claim id order
    pub outcomes: Vec<ClaimOutcome>,
    /// Per-claim failures, in claim id order
    pub failures: Vec<ClaimFailure>,
    /// System-wide alerts that fired this epoch
    pub system_alerts: Vec<EpistemicAlert>,
}

impl EpochReport {
    /// Every alert that fired this epoch
    pub fn alerts(&self) -> impl Iterator<Item = &EpistemicAlert> {
        self.outcomes
            .iter()
            .flat_map(|o| o.alerts.iter())
            .chain(self.system_alerts.iter())
    }

    /// Outcome for a claim
    pub fn outcome(&self, claim: ClaimId) -> Option<&ClaimOutcome> {
        self.outcomes.iter().find(|o| o.claim_id == claim)
    }

    /// Number of claims that changed state
    pub fn transition_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.transitioned()).count()
    }

    /// Whether every selected, visible claim was evaluated
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
