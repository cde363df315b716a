//! Residual evaluation
//!
//! Re-scores a scenario after treatment. A one-sided re-assessment (only
//! probability or only impact) falls back to the inherent value on the
//! other axis, so a partial improvement is still measurable.

use register_types::asset::Asset;
use register_types::scenario::{ResidualAssessment, RiskScenario};

use crate::score;
use crate::severity::{self, RiskLevel};

/// Residual score, or `None` when neither residual axis is set
pub fn residual_score(scenario: &RiskScenario, asset: &Asset) -> Option<u8> {
    let residual = &scenario.residual;
    if !residual.is_assessed() {
        return None;
    }

    let probability = residual.residual_probability.unwrap_or(scenario.probability);
    let impact = residual
        .residual_impact
        .unwrap_or_else(|| score::impact_value(scenario, asset));

    Some(score::score(probability, impact))
}

/// Residual tier, undefined under the same condition as the score
pub fn residual_level(scenario: &RiskScenario, asset: &Asset) -> Option<RiskLevel> {
    residual_score(scenario, asset).map(severity::classify)
}

/// True when a residual tier exists and ranks strictly below the inherent tier
pub fn is_tier_reduced(scenario: &RiskScenario, asset: &Asset) -> bool {
    let inherent = score::inherent_level(scenario, asset);
    match residual_level(scenario, asset) {
        Some(residual) => severity::rank(Some(residual)) < severity::rank(Some(inherent)),
        None => false,
    }
}

/// Replace the residual record.
///
/// Both axes and `completed_at` are replaced as given. `last_review_at` is
/// only overwritten when the update carries a value; a blank review date
/// keeps the previous one. Returns the prior record.
pub fn apply_residual(
    scenario: &mut RiskScenario,
    update: ResidualAssessment,
) -> ResidualAssessment {
    let previous = scenario.residual.clone();
    scenario.residual = ResidualAssessment {
        residual_probability: update.residual_probability,
        residual_impact: update.residual_impact,
        completed_at: update.completed_at,
        last_review_at: update.last_review_at.or(previous.last_review_at),
    };
    previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use register_types::asset::{AssetCategory, CidRatings};
    use register_types::ids::{ThreatId, VulnerabilityId};
    use register_types::scenario::TreatmentStatus;

    fn critical_setup() -> (Asset, RiskScenario) {
        let asset = Asset::new("Customer database", AssetCategory::Data, 0)
            .with_ratings(CidRatings::new(3, 3, 3));
        let scenario = RiskScenario::new(
            asset.asset_id,
            ThreatId::new(),
            VulnerabilityId::new(),
            4,
            0,
        );
        (asset, scenario)
    }

    #[test]
    fn test_unassessed_is_undefined() {
        let (asset, scenario) = critical_setup();
        assert_eq!(residual_score(&scenario, &asset), None);
        assert_eq!(residual_level(&scenario, &asset), None);
        assert!(!is_tier_reduced(&scenario, &asset));
    }

    #[test]
    fn test_probability_only_uses_inherent_impact() {
        let (asset, mut scenario) = critical_setup();
        scenario.residual.residual_probability = Some(2);
        // 2 × asset impact 5
        assert_eq!(residual_score(&scenario, &asset), Some(10));
        assert_eq!(residual_level(&scenario, &asset), Some(RiskLevel::Medium));
    }

    #[test]
    fn test_impact_only_uses_inherent_probability() {
        let (asset, mut scenario) = critical_setup();
        scenario.residual.residual_impact = Some(1);
        assert_eq!(residual_score(&scenario, &asset), Some(4));
        // Inherent probability is not touched
        assert_eq!(scenario.probability, 4);
    }

    #[test]
    fn test_fallback_respects_impact_override() {
        let (asset, mut scenario) = critical_setup();
        scenario.impact_override = Some(2);
        scenario.residual.residual_probability = Some(3);
        assert_eq!(residual_score(&scenario, &asset), Some(6));
    }

    #[test]
    fn test_critical_to_medium_is_reduced() {
        let (asset, mut scenario) = critical_setup();
        scenario.residual.residual_probability = Some(2);
        scenario.residual.residual_impact = Some(3);
        assert_eq!(residual_score(&scenario, &asset), Some(6));
        assert!(is_tier_reduced(&scenario, &asset));
    }

    #[test]
    fn test_same_tier_is_not_reduced() {
        let (asset, mut scenario) = critical_setup();
        scenario.impact_override = Some(3);
        scenario.probability = 3;
        scenario.residual.residual_probability = Some(3);
        scenario.residual.residual_impact = Some(3);
        // inherent 9 Medium, residual 9 Medium
        assert!(!is_tier_reduced(&scenario, &asset));
    }

    #[test]
    fn test_apply_residual_keeps_review_when_blank() {
        let (_, mut scenario) = critical_setup();
        scenario.residual.last_review_at = Some(1708123456789000000);
        scenario.treatment.status = TreatmentStatus::Implemented;

        let previous = apply_residual(
            &mut scenario,
            ResidualAssessment {
                residual_probability: Some(1),
                residual_impact: None,
                completed_at: NaiveDate::from_ymd_opt(2024, 5, 1),
                last_review_at: None,
            },
        );

        assert_eq!(previous.residual_probability, None);
        assert_eq!(scenario.residual.residual_probability, Some(1));
        assert_eq!(scenario.residual.last_review_at, Some(1708123456789000000));
        assert_eq!(scenario.treatment.status, TreatmentStatus::Implemented);
    }

    #[test]
    fn test_apply_residual_clears_axes() {
        let (asset, mut scenario) = critical_setup();
        scenario.residual.residual_probability = Some(1);
        apply_residual(&mut scenario, ResidualAssessment::default());
        assert_eq!(residual_score(&scenario, &asset), None);
    }
}
