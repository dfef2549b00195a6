//! Ordered classification history per claim

use crate::StabilityError;
use credo_domain::{ClaimId, StabilityClassification, StabilityState, Timestamp};
use std::collections::BTreeMap;
use tracing::info;

/// Classification entries per claim, ordered by timestamp
///
/// Recording an entry at the latest timestamp again replaces it, so an epoch
/// can be re-evaluated without duplicating history.
#[derive(Debug, Clone, Default)]
pub struct ClassificationHistory {
    by_claim: BTreeMap<ClaimId, Vec<StabilityClassification>>,
}

impl ClassificationHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append or replace an entry
    ///
    /// # Errors
    ///
    /// `InvalidState` when the entry predates the claim's latest entry,
    /// when its `from` state differs from the state it follows, or when the
    /// transition is not permitted.
    pub fn record(&mut self, entry: StabilityClassification) -> Result<(), StabilityError> {
        let preceding = self.next_from(entry.claim_id, entry.timestamp)?;
        if entry.from != preceding {
            return Err(StabilityError::InvalidState(format!(
                "classification for {} starts from {} but current state is {}",
                entry.claim_id, entry.from, preceding
            )));
        }
        if !entry.from.can_transition_to(entry.state) {
            return Err(StabilityError::InvalidState(format!(
                "transition {} -> {} is not permitted",
                entry.from, entry.state
            )));
        }

        if entry.is_transition() {
            info!(
                claim = %entry.claim_id,
                from = %entry.from,
                to = %entry.state,
                reason = %entry.reason,
                "Stability transition"
            );
        }

        let entries = self.by_claim.entry(entry.claim_id).or_default();
        let replace = entries
            .last()
            .is_some_and(|last| last.timestamp == entry.timestamp);
        if replace {
            if let Some(last) = entries.last_mut() {
                *last = entry;
            }
        } else {
            entries.push(entry);
        }
        Ok(())
    }

    /// State an entry recorded at `t` must start from
    ///
    /// At the latest timestamp this is the state before that entry, since
    /// recording replaces it.
    ///
    /// # Errors
    ///
    /// `InvalidState` when `t` predates the claim's latest entry.
    pub fn next_from(
        &self,
        claim: ClaimId,
        t: Timestamp,
    ) -> Result<StabilityState, StabilityError> {
        let entries = self.entries(claim);
        let preceding = match entries.last() {
            Some(last) if t < last.timestamp => {
                return Err(StabilityError::InvalidState(format!(
                    "classification for {} at {} predates latest entry at {}",
                    claim, t, last.timestamp
                )));
            }
            Some(last) if t == last.timestamp => {
                entries.len().checked_sub(2).map(|i| entries[i].state)
            }
            Some(last) => Some(last.state),
            None => None,
        };
        Ok(preceding.unwrap_or_default())
    }

    /// Current state of a claim (Stable when never classified)
    pub fn current(&self, claim: ClaimId) -> StabilityState {
        self.latest(claim).map(|e| e.state).unwrap_or_default()
    }

    /// State of a claim just before `t`
    pub fn state_before(&self, claim: ClaimId, t: Timestamp) -> StabilityState {
        self.entries(claim)
            .iter()
            .rev()
            .find(|e| e.timestamp < t)
            .map(|e| e.state)
            .unwrap_or_default()
    }

    /// Latest entry of a claim
    pub fn latest(&self, claim: ClaimId) -> Option<&StabilityClassification> {
        self.entries(claim).last()
    }

    /// Every entry of a claim, oldest first
    pub fn entries(&self, claim: ClaimId) -> &[StabilityClassification] {
        self.by_claim.get(&claim).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries that changed state, oldest first
    pub fn transitions(&self, claim: ClaimId) -> impl Iterator<Item = &StabilityClassification> {
        self.entries(claim).iter().filter(|e| e.is_transition())
    }

    /// Claims with at least one entry
    pub fn claims(&self) -> impl Iterator<Item = ClaimId> + '_ {
        self.by_claim.keys().copied()
    }

    /// Number of claims currently in each state
    pub fn state_counts(&self) -> BTreeMap<StabilityState, usize> {
        let mut counts: BTreeMap<StabilityState, usize> =
            StabilityState::ALL.iter().map(|s| (*s, 0)).collect();
        for entries in self.by_claim.values() {
            if let Some(last) = entries.last() {
                *counts.entry(last.state).or_default() += 1;
            }
        }
        counts
    }
}
