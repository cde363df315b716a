//! Treatment lifecycle
//!
//! The treatment plan is replaced as one record. Status is a label with no
//! enforced transition graph.

use register_types::scale;
use register_types::scenario::{RiskScenario, TreatmentPlan, TreatmentStrategy};

/// Replace the scenario's treatment plan.
///
/// Blank text fields are stored as unset and the proposed-control set is
/// replaced, never merged. Probability, impact override and residual
/// fields are left untouched. Returns the prior plan.
pub fn apply_treatment(scenario: &mut RiskScenario, plan: TreatmentPlan) -> TreatmentPlan {
    let normalized = TreatmentPlan {
        strategy: plan.strategy,
        proposed_controls: plan.proposed_controls,
        responsible: scale::normalize_text(plan.responsible),
        due_date: plan.due_date,
        status: plan.status,
        acceptance_justification: scale::normalize_text(plan.acceptance_justification),
        acceptance_approved_by: scale::normalize_text(plan.acceptance_approved_by),
    };
    std::mem::replace(&mut scenario.treatment, normalized)
}

/// Strategy, responsible and due date are all set
pub fn has_plan(plan: &TreatmentPlan) -> bool {
    plan.strategy.is_some() && scale::is_filled(&plan.responsible) && plan.due_date.is_some()
}

/// Accept strategy with both justification and approver recorded
pub fn is_justified_acceptance(plan: &TreatmentPlan) -> bool {
    plan.strategy == Some(TreatmentStrategy::Accept)
        && scale::is_filled(&plan.acceptance_justification)
        && scale::is_filled(&plan.acceptance_approved_by)
}

/// Accept strategy still missing justification or approver
pub fn needs_acceptance_record(plan: &TreatmentPlan) -> bool {
    plan.strategy == Some(TreatmentStrategy::Accept) && !is_justified_acceptance(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use register_types::ids::{AssetId, ControlId, ThreatId, VulnerabilityId};
    use register_types::scenario::{ResidualAssessment, TreatmentStatus};

    fn scenario() -> RiskScenario {
        RiskScenario::new(AssetId::new(), ThreatId::new(), VulnerabilityId::new(), 4, 0)
            .with_impact_override(3)
    }

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_replace_is_whole_record() {
        let mut s = scenario();
        let c1 = ControlId::new();
        let c2 = ControlId::new();

        apply_treatment(
            &mut s,
            TreatmentPlan::new(TreatmentStatus::InProgress)
                .with_strategy(TreatmentStrategy::Mitigate)
                .with_controls([c1, c2])
                .with_responsible("Security analyst")
                .with_due_date(due()),
        );
        assert_eq!(s.treatment.proposed_controls.len(), 2);

        let previous = apply_treatment(&mut s, TreatmentPlan::new(TreatmentStatus::Pending));
        assert_eq!(previous.strategy, Some(TreatmentStrategy::Mitigate));
        assert!(s.treatment.proposed_controls.is_empty());
        assert!(s.treatment.strategy.is_none());
        assert!(s.treatment.responsible.is_none());
    }

    #[test]
    fn test_treatment_leaves_scoring_fields_alone() {
        let mut s = scenario();
        s.residual = ResidualAssessment {
            residual_probability: Some(2),
            ..Default::default()
        };

        apply_treatment(
            &mut s,
            TreatmentPlan::new(TreatmentStatus::Implemented).with_strategy(TreatmentStrategy::Avoid),
        );

        assert_eq!(s.probability, 4);
        assert_eq!(s.impact_override, Some(3));
        assert_eq!(s.residual.residual_probability, Some(2));
    }

    #[test]
    fn test_blank_text_is_unset() {
        let mut s = scenario();
        let mut plan = TreatmentPlan::new(TreatmentStatus::Pending)
            .with_strategy(TreatmentStrategy::Accept)
            .with_acceptance("Low business value", "   ");
        plan.responsible = Some(String::new());

        apply_treatment(&mut s, plan);
        assert_eq!(s.treatment.acceptance_approved_by, None);
        assert_eq!(s.treatment.responsible, None);
    }

    #[test]
    fn test_has_plan_requires_all_three() {
        let full = TreatmentPlan::new(TreatmentStatus::Pending)
            .with_strategy(TreatmentStrategy::Transfer)
            .with_responsible("Insurance broker")
            .with_due_date(due());
        assert!(has_plan(&full));

        let mut missing_due = full.clone();
        missing_due.due_date = None;
        assert!(!has_plan(&missing_due));

        let mut missing_owner = full;
        missing_owner.responsible = None;
        assert!(!has_plan(&missing_owner));
    }

    #[test]
    fn test_acceptance_completeness() {
        let justified = TreatmentPlan::new(TreatmentStatus::Implemented)
            .with_strategy(TreatmentStrategy::Accept)
            .with_acceptance("Cost exceeds exposure", "CISO");
        assert!(is_justified_acceptance(&justified));
        assert!(!needs_acceptance_record(&justified));

        let mut no_approver = justified.clone();
        no_approver.acceptance_approved_by = Some(String::new());
        assert!(!is_justified_acceptance(&no_approver));
        assert!(needs_acceptance_record(&no_approver));

        let mitigate = TreatmentPlan::new(TreatmentStatus::Pending)
            .with_strategy(TreatmentStrategy::Mitigate)
            .with_acceptance("n/a", "n/a");
        assert!(!is_justified_acceptance(&mitigate));
        assert!(!needs_acceptance_record(&mitigate));
    }
}
