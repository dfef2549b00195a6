//! Individual score components
//!
//! Each function computes one raw component. They are combined by
//! [`ConfidenceScorer`](crate::ConfidenceScorer).

use credo_domain::{ClaimType, EvidenceLink, VerificationStatus};

/// Scoring prior for a claim type
pub fn prior_for(claim_type: ClaimType) -> f64 {
    match claim_type {
        ClaimType::Observation => 0.60,
        ClaimType::Measurement => 0.65,
        ClaimType::Hypothesis => 0.30,
        ClaimType::Assertion => 0.40,
        ClaimType::Derived => 0.50,
        ClaimType::Prediction => 0.25,
        ClaimType::Historical => 0.45,
        ClaimType::Rebuttal => 0.35,
        ClaimType::Retraction => 0.10,
    }
}

/// Signed verification modifier for a status
pub fn verification_modifier(status: VerificationStatus) -> f64 {
    match status {
        VerificationStatus::Confirmed => 1.0,
        VerificationStatus::Unverified => 0.0,
        VerificationStatus::Disputed => -0.5,
        VerificationStatus::Retracted => -1.0,
    }
}

/// Weight-averaged credibility of the sources behind supporting links
///
/// `credibility_of` resolves a link to its source's credibility. Returns 0.0
/// when there are no links or every weight is zero.
pub fn weighted_credibility<'a, I, F, E>(links: I, mut credibility_of: F) -> Result<f64, E>
where
    I: IntoIterator<Item = &'a EvidenceLink>,
    F: FnMut(&EvidenceLink) -> Result<f64, E>,
{
    let mut weighted = 0.0;
    let mut total = 0.0;
    for link in links {
        weighted += link.weight * credibility_of(link)?;
        total += link.weight;
    }
    if total > 0.0 {
        Ok((weighted / total).clamp(0.0, 1.0))
    } else {
        Ok(0.0)
    }
}

/// Citation density: `min(1, count / saturation)`
pub fn citation_density(supporting_links: usize, saturation: f64) -> f64 {
    (supporting_links as f64 / saturation).min(1.0)
}

/// Log-scaled contradiction penalty: `min(1, ln(1+k) / ln(1+saturation))`
///
/// `k` is the number of other claims in the claim's cluster plus the summed
/// weight of contradicting source links.
pub fn contradiction_penalty(peers: usize, contradicting_weight: f64, saturation: f64) -> f64 {
    let k = peers as f64 + contradicting_weight.max(0.0);
    if k <= 0.0 {
        return 0.0;
    }
    (k.ln_1p() / saturation.ln_1p()).min(1.0)
}

/// Mutation decay: `min(1, max(0, velocity) / saturation)`
///
/// Non-finite velocities count as no drift.
pub fn mutation_decay(drift_velocity: Option<f64>, saturation: f64) -> f64 {
    drift_velocity
        .filter(|v| v.is_finite())
        .map(|v| (v.max(0.0) / saturation).min(1.0))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credo_domain::{ClaimId, Relation, SourceId};

    fn link(source: u128, weight: f64) -> EvidenceLink {
        EvidenceLink::new(
            SourceId::from_value(source),
            ClaimId::from_value(1),
            Relation::Supports,
            weight,
            0,
        )
    }

    #[test]
    fn test_priors() {
        assert_eq!(prior_for(ClaimType::Observation), 0.60);
        assert_eq!(prior_for(ClaimType::Retraction), 0.10);
        for t in ClaimType::ALL {
            assert!((0.0..=1.0).contains(&prior_for(t)));
        }
    }

    #[test]
    fn test_verification_modifiers() {
        assert_eq!(verification_modifier(VerificationStatus::Confirmed), 1.0);
        assert_eq!(verification_modifier(VerificationStatus::Unverified), 0.0);
        assert_eq!(verification_modifier(VerificationStatus::Disputed), -0.5);
        assert_eq!(verification_modifier(VerificationStatus::Retracted), -1.0);
    }

    #[test]
    fn test_weighted_credibility() {
        let links = vec![link(1, 1.0), link(2, 1.0)];
        let cred = weighted_credibility(&links, |l| -> Result<f64, ()> {
            Ok(if l.source_id.value() == 1 { 0.8 } else { 0.6 })
        })
        .unwrap();
        assert!((cred - 0.7).abs() < 1e-12);

        let uneven = vec![link(1, 0.75), link(2, 0.25)];
        let cred = weighted_credibility(&uneven, |l| -> Result<f64, ()> {
            Ok(if l.source_id.value() == 1 { 0.8 } else { 0.4 })
        })
        .unwrap();
        assert!((cred - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_credibility_empty_or_zero_weight() {
        let none: Vec<EvidenceLink> = Vec::new();
        assert_eq!(weighted_credibility(&none, |_| -> Result<f64, ()> { Ok(1.0) }), Ok(0.0));

        let zero = vec![link(1, 0.0)];
        assert_eq!(weighted_credibility(&zero, |_| -> Result<f64, ()> { Ok(1.0) }), Ok(0.0));
    }

    #[test]
    fn test_citation_saturates() {
        assert_eq!(citation_density(0, 5.0), 0.0);
        assert!((citation_density(2, 5.0) - 0.4).abs() < 1e-12);
        assert_eq!(citation_density(50, 5.0), 1.0);
    }

    #[test]
    fn test_contradiction_penalty() {
        assert_eq!(contradiction_penalty(0, 0.0, 5.0), 0.0);
        assert!((contradiction_penalty(5, 0.0, 5.0) - 1.0).abs() < 1e-12);
        assert_eq!(contradiction_penalty(40, 0.0, 5.0), 1.0);
        let one = contradiction_penalty(1, 0.0, 5.0);
        assert!((one - 2f64.ln() / 6f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_contradicting_weight_adds_to_peers() {
        let sourced = contradiction_penalty(0, 1.0, 5.0);
        assert!((sourced - 2f64.ln() / 6f64.ln()).abs() < 1e-12);
        assert!(contradiction_penalty(1, 0.5, 5.0) > contradiction_penalty(1, 0.0, 5.0));
        assert_eq!(contradiction_penalty(0, -1.0, 5.0), 0.0);
    }

    #[test]
    fn test_mutation_decay_normalized() {
        assert_eq!(mutation_decay(None, 1.0), 0.0);
        assert_eq!(mutation_decay(Some(-0.4), 1.0), 0.0);
        assert!((mutation_decay(Some(0.3), 1.0) - 0.3).abs() < 1e-12);
        assert!((mutation_decay(Some(0.3), 2.0) - 0.15).abs() < 1e-12);
        assert_eq!(mutation_decay(Some(f64::NAN), 1.0), 0.0);
        // one-minute edit: velocity in the tens per hour
        assert_eq!(mutation_decay(Some(43.9), 1.0), 1.0);
        assert_eq!(mutation_decay(Some(f64::INFINITY), 1.0), 0.0);
    }
}
