//! Portfolio indicators and ranking
//!
//! Cross-scenario KPIs for the dashboard plus the tier-first ranking used
//! for the top-risk list. Each indicator is computed independently over the
//! same read-only slice of views.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::severity;
use crate::treatment;
use crate::view::ScenarioView;

/// Dashboard indicator: label, formatted value, optional explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    pub note: Option<String>,
}

impl Kpi {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Raw counts behind the dashboard indicators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total: usize,
    pub elevated: usize,
    pub elevated_with_plan: usize,
    pub with_due_date: usize,
    pub on_time: usize,
    pub tier_reduced: usize,
    pub justified_acceptances: usize,
    pub incidents: usize,
}

impl PortfolioSummary {
    /// Share of High/Critical scenarios with a complete plan, e.g. "50%"
    pub fn plan_coverage(&self) -> String {
        percentage(self.elevated_with_plan, self.elevated)
    }

    /// Share of due-dated actions implemented on or before the due date
    pub fn on_time_rate(&self) -> String {
        percentage(self.on_time, self.with_due_date)
    }

    /// The six dashboard indicators, in display order
    pub fn kpis(&self) -> Vec<Kpi> {
        vec![
            Kpi::new("Risks (total)", self.total.to_string()),
            Kpi::new("% High/Critical with plan", self.plan_coverage())
                .with_note("Plan = strategy + responsible + due date"),
            Kpi::new("% actions on time", self.on_time_rate())
                .with_note("Implemented within the due date"),
            Kpi::new("Risks that dropped a tier", self.tier_reduced.to_string()),
            Kpi::new(
                "Risks accepted with justification",
                self.justified_acceptances.to_string(),
            ),
            Kpi::new("Incidents recorded", self.incidents.to_string()),
        ]
    }
}

// ── Indicators ───────────────────────────────────────────────────────────

/// Format `numerator / denominator` as a whole percentage.
///
/// Rounds half up. A zero denominator yields "0%".
pub fn percentage(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        return "0%".to_string();
    }
    let ratio = Decimal::from(numerator) * Decimal::ONE_HUNDRED / Decimal::from(denominator);
    let rounded = ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{}%", rounded.to_i64().unwrap_or_default())
}

/// Compute every indicator over the scenario set
pub fn summarize(views: &[ScenarioView<'_>]) -> PortfolioSummary {
    let elevated: Vec<_> = views
        .iter()
        .filter(|v| v.inherent_level().is_elevated())
        .collect();
    let elevated_with_plan = elevated
        .iter()
        .filter(|v| treatment::has_plan(&v.scenario.treatment))
        .count();

    let due: Vec<_> = views
        .iter()
        .filter(|v| v.scenario.treatment.due_date.is_some())
        .collect();
    let on_time = due.iter().filter(|v| is_on_time(v)).count();

    PortfolioSummary {
        total: views.len(),
        elevated: elevated.len(),
        elevated_with_plan,
        with_due_date: due.len(),
        on_time,
        tier_reduced: views.iter().filter(|v| v.is_tier_reduced()).count(),
        justified_acceptances: views
            .iter()
            .filter(|v| treatment::is_justified_acceptance(&v.scenario.treatment))
            .count(),
        incidents: views.iter().map(|v| v.incident_count).sum(),
    }
}

/// Implemented, with a completion date on or before the due date
pub fn is_on_time(view: &ScenarioView<'_>) -> bool {
    let plan = &view.scenario.treatment;
    match (plan.due_date, view.scenario.residual.completed_at) {
        (Some(due), Some(completed)) => plan.status.is_implemented() && completed <= due,
        _ => false,
    }
}

// ── Ranking ──────────────────────────────────────────────────────────────

/// Sort descending by (inherent tier rank, inherent score).
///
/// The sort is stable: scenarios with equal (rank, score) keep their input
/// order.
pub fn rank_scenarios<'a>(views: &[ScenarioView<'a>]) -> Vec<ScenarioView<'a>> {
    let mut ranked = views.to_vec();
    ranked.sort_by_key(|v| {
        std::cmp::Reverse((
            severity::rank(Some(v.inherent_level())),
            v.inherent_score(),
        ))
    });
    ranked
}

/// First `n` scenarios of the tier-first ranking
pub fn top_risks<'a>(views: &[ScenarioView<'a>], n: usize) -> Vec<ScenarioView<'a>> {
    let mut ranked = rank_scenarios(views);
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use register_types::asset::{Asset, AssetCategory, CidRatings};
    use register_types::catalog::{Threat, ThreatCategory, Vulnerability, VulnerabilityCategory};
    use register_types::scenario::{RiskScenario, TreatmentPlan, TreatmentStatus, TreatmentStrategy};

    struct Fixture {
        asset: Asset,
        threat: Threat,
        vulnerability: Vulnerability,
        scenarios: Vec<RiskScenario>,
        incidents: Vec<usize>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                asset: Asset::new("Customer database", AssetCategory::Data, 0)
                    .with_ratings(CidRatings::new(3, 3, 3)),
                threat: Threat::new("Unauthorized access", ThreatCategory::External),
                vulnerability: Vulnerability::new("Weak passwords", VulnerabilityCategory::Organizational),
                scenarios: Vec::new(),
                incidents: Vec::new(),
            }
        }

        /// Add a scenario whose inherent score is probability × impact
        fn add(&mut self, probability: u8, impact: u8) -> &mut RiskScenario {
            let s = RiskScenario::new(
                self.asset.asset_id,
                self.threat.threat_id,
                self.vulnerability.vulnerability_id,
                probability,
                0,
            )
            .with_impact_override(impact);
            self.scenarios.push(s);
            self.incidents.push(0);
            self.scenarios.last_mut().unwrap()
        }

        fn views(&self) -> Vec<ScenarioView<'_>> {
            self.scenarios
                .iter()
                .zip(&self.incidents)
                .map(|(scenario, count)| ScenarioView {
                    scenario,
                    asset: &self.asset,
                    threat: &self.threat,
                    vulnerability: &self.vulnerability,
                    incident_count: *count,
                })
                .collect()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_plan() -> TreatmentPlan {
        TreatmentPlan::new(TreatmentStatus::InProgress)
            .with_strategy(TreatmentStrategy::Mitigate)
            .with_responsible("Security analyst")
            .with_due_date(date(2024, 6, 30))
    }

    // ── percentage ──

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), "0%");
        assert_eq!(percentage(3, 0), "0%");
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(1, 2), "50%");
        assert_eq!(percentage(1, 3), "33%");
        assert_eq!(percentage(2, 3), "67%");
        // 12.5% → 13%
        assert_eq!(percentage(1, 8), "13%");
        // 62.5% → 63%
        assert_eq!(percentage(5, 8), "63%");
        assert_eq!(percentage(4, 4), "100%");
    }

    // ── plan coverage ──

    #[test]
    fn test_plan_coverage_half() {
        let mut f = Fixture::new();
        f.add(4, 5).treatment = full_plan(); // 20 Critical
        f.add(3, 4).treatment = full_plan(); // 12 High
        f.add(5, 5); // 25 Critical, no plan
        let mut partial = full_plan();
        partial.responsible = None;
        f.add(4, 4).treatment = partial; // 16 Critical, incomplete
        f.add(1, 1).treatment = full_plan(); // Low, excluded

        let summary = summarize(&f.views());
        assert_eq!(summary.elevated, 4);
        assert_eq!(summary.elevated_with_plan, 2);
        assert_eq!(summary.plan_coverage(), "50%");
    }

    #[test]
    fn test_plan_coverage_without_elevated_risks() {
        let mut f = Fixture::new();
        f.add(2, 2).treatment = full_plan();
        f.add(1, 5);
        let summary = summarize(&f.views());
        assert_eq!(summary.elevated, 0);
        assert_eq!(summary.plan_coverage(), "0%");
    }

    // ── on time ──

    #[test]
    fn test_on_time_boundary_inclusive() {
        let mut f = Fixture::new();

        let s = f.add(3, 3);
        s.treatment = full_plan();
        s.treatment.status = TreatmentStatus::Implemented;
        s.residual.completed_at = Some(date(2024, 6, 30));

        let s = f.add(3, 3);
        s.treatment = full_plan();
        s.treatment.status = TreatmentStatus::Implemented;
        s.residual.completed_at = Some(date(2024, 7, 1));

        let views = f.views();
        assert!(is_on_time(&views[0]));
        assert!(!is_on_time(&views[1]));
        assert_eq!(summarize(&views).on_time_rate(), "50%");
    }

    #[test]
    fn test_on_time_requires_implemented_and_completion() {
        let mut f = Fixture::new();

        let s = f.add(3, 3);
        s.treatment = full_plan(); // InProgress
        s.residual.completed_at = Some(date(2024, 6, 1));

        let s = f.add(3, 3);
        s.treatment = full_plan();
        s.treatment.status = TreatmentStatus::Implemented; // no completion date

        f.add(3, 3); // no due date, not in the denominator

        let summary = summarize(&f.views());
        assert_eq!(summary.with_due_date, 2);
        assert_eq!(summary.on_time, 0);
        assert_eq!(summary.on_time_rate(), "0%");
    }

    // ── reduction, acceptance, incidents ──

    #[test]
    fn test_tier_reduction_count() {
        let mut f = Fixture::new();
        let s = f.add(4, 5); // 20 Critical
        s.residual.residual_probability = Some(3);
        s.residual.residual_impact = Some(3); // 9 Medium

        let s = f.add(3, 3); // 9 Medium
        s.residual.residual_probability = Some(3); // 9 Medium

        f.add(5, 5); // not assessed

        assert_eq!(summarize(&f.views()).tier_reduced, 1);
    }

    #[test]
    fn test_justified_acceptance_count() {
        let mut f = Fixture::new();
        f.add(1, 2).treatment = TreatmentPlan::new(TreatmentStatus::Implemented)
            .with_strategy(TreatmentStrategy::Accept)
            .with_acceptance("Residual exposure is tolerable", "Risk committee");

        let mut missing_approver = TreatmentPlan::new(TreatmentStatus::Implemented)
            .with_strategy(TreatmentStrategy::Accept);
        missing_approver.acceptance_justification = Some("Tolerable".into());
        f.add(1, 2).treatment = missing_approver;

        assert_eq!(summarize(&f.views()).justified_acceptances, 1);
    }

    #[test]
    fn test_incident_sum_and_kpi_order() {
        let mut f = Fixture::new();
        f.add(2, 2);
        f.add(2, 3);
        f.incidents = vec![2, 3];

        let summary = summarize(&f.views());
        assert_eq!(summary.incidents, 5);

        let kpis = summary.kpis();
        assert_eq!(kpis.len(), 6);
        assert_eq!(kpis[0], Kpi::new("Risks (total)", "2"));
        assert_eq!(
            kpis[1].note.as_deref(),
            Some("Plan = strategy + responsible + due date")
        );
        assert_eq!(kpis[5].value, "5");
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = summarize(&[]);
        let values: Vec<_> = summary.kpis().into_iter().map(|k| k.value).collect();
        assert_eq!(values, vec!["0", "0%", "0%", "0", "0", "0"]);
    }

    // ── ranking ──

    #[test]
    fn test_rank_tier_first_then_score() {
        let mut f = Fixture::new();
        f.add(2, 5); // 10 Medium
        f.add(1, 3); // 3 Low
        f.add(4, 4); // 16 Critical
        f.add(3, 4); // 12 High
        f.add(5, 5); // 25 Critical

        let views = f.views();
        let scores: Vec<u8> = rank_scenarios(&views)
            .iter()
            .map(|v| v.inherent_score())
            .collect();
        assert_eq!(scores, vec![25, 16, 12, 10, 3]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let mut f = Fixture::new();
        f.add(4, 3); // 12
        f.add(3, 4); // 12
        f.add(2, 3); // 6
        f.add(6, 2); // 12

        let views = f.views();
        let ranked = rank_scenarios(&views);
        let ids: Vec<_> = ranked.iter().map(|v| v.scenario.scenario_id).collect();
        assert_eq!(
            ids,
            vec![
                f.scenarios[0].scenario_id,
                f.scenarios[1].scenario_id,
                f.scenarios[3].scenario_id,
                f.scenarios[2].scenario_id,
            ]
        );
    }

    #[test]
    fn test_top_risks_truncates() {
        let mut f = Fixture::new();
        for p in 1..=5 {
            f.add(p, 3);
        }
        let views = f.views();
        let top = top_risks(&views, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].inherent_score(), 15);

        assert_eq!(top_risks(&views, 10).len(), 5);
    }
}
