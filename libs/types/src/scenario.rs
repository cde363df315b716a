//! Risk scenario records
//!
//! A scenario composes exactly one asset, one threat and one vulnerability.
//! Treatment and residual fields are grouped into their own records so the
//! engine can replace each one as a whole.

use crate::errors::ValidationError;
use crate::ids::{AssetId, ControlId, ScenarioId, ThreatId, VulnerabilityId};
use crate::scale::{self, NAME_MAX_LEN};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Risk-response approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentStrategy {
    Mitigate,
    Transfer,
    Accept,
    Avoid,
}

impl fmt::Display for TreatmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TreatmentStrategy::Mitigate => "Mitigate",
            TreatmentStrategy::Transfer => "Transfer",
            TreatmentStrategy::Accept => "Accept",
            TreatmentStrategy::Avoid => "Avoid",
        };
        f.write_str(label)
    }
}

/// Treatment progress label
///
/// Any status may follow any other; only `Implemented` carries meaning
/// for the on-time indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentStatus {
    #[default]
    Pending,
    InProgress,
    Implemented,
}

impl TreatmentStatus {
    pub fn is_implemented(&self) -> bool {
        matches!(self, TreatmentStatus::Implemented)
    }
}

impl fmt::Display for TreatmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TreatmentStatus::Pending => "Pending",
            TreatmentStatus::InProgress => "In progress",
            TreatmentStatus::Implemented => "Implemented",
        };
        f.write_str(label)
    }
}

/// Full treatment record for a scenario
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub strategy: Option<TreatmentStrategy>,
    pub proposed_controls: BTreeSet<ControlId>,
    pub responsible: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TreatmentStatus,
    pub acceptance_justification: Option<String>,
    pub acceptance_approved_by: Option<String>,
}

impl TreatmentPlan {
    /// Start a plan with the given status and nothing else set
    pub fn new(status: TreatmentStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: TreatmentStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_controls(mut self, controls: impl IntoIterator<Item = ControlId>) -> Self {
        self.proposed_controls = controls.into_iter().collect();
        self
    }

    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = Some(responsible.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_acceptance(
        mut self,
        justification: impl Into<String>,
        approved_by: impl Into<String>,
    ) -> Self {
        self.acceptance_justification = Some(justification.into());
        self.acceptance_approved_by = Some(approved_by.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_length("responsible", self.responsible.as_deref(), NAME_MAX_LEN)?;
        scale::validate_length(
            "acceptance_approved_by",
            self.acceptance_approved_by.as_deref(),
            NAME_MAX_LEN,
        )
    }
}

/// Post-treatment re-assessment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResidualAssessment {
    pub residual_probability: Option<u8>,
    pub residual_impact: Option<u8>,
    pub completed_at: Option<NaiveDate>,
    pub last_review_at: Option<i64>, // Unix nanos
}

impl ResidualAssessment {
    /// True when at least one residual axis has been re-measured
    pub fn is_assessed(&self) -> bool {
        self.residual_probability.is_some() || self.residual_impact.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_optional_scale("residual_probability", self.residual_probability)?;
        scale::validate_optional_scale("residual_impact", self.residual_impact)?;
        Ok(())
    }
}

/// Editable free-text and impact-override fields of a scenario
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioNotes {
    pub impact_override: Option<u8>,
    pub existing_controls: Option<String>,
    pub observations: Option<String>,
}

/// Central register entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScenario {
    pub scenario_id: ScenarioId,
    pub asset_id: AssetId,
    pub threat_id: ThreatId,
    pub vulnerability_id: VulnerabilityId,
    pub probability: u8,
    pub impact_override: Option<u8>,
    pub existing_controls: Option<String>,
    pub observations: Option<String>,
    pub treatment: TreatmentPlan,
    pub residual: ResidualAssessment,
    pub created_at: i64, // Unix nanos
}

impl RiskScenario {
    /// Create a scenario with a pending, empty treatment plan
    pub fn new(
        asset_id: AssetId,
        threat_id: ThreatId,
        vulnerability_id: VulnerabilityId,
        probability: u8,
        timestamp: i64,
    ) -> Self {
        Self {
            scenario_id: ScenarioId::new(),
            asset_id,
            threat_id,
            vulnerability_id,
            probability,
            impact_override: None,
            existing_controls: None,
            observations: None,
            treatment: TreatmentPlan::default(),
            residual: ResidualAssessment::default(),
            created_at: timestamp,
        }
    }

    pub fn with_impact_override(mut self, impact: u8) -> Self {
        self.impact_override = Some(impact);
        self
    }

    pub fn with_notes(
        mut self,
        existing_controls: Option<&str>,
        observations: Option<&str>,
    ) -> Self {
        self.existing_controls = existing_controls.map(str::to_string);
        self.observations = observations.map(str::to_string);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_scale("probability", self.probability)?;
        scale::validate_optional_scale("impact_override", self.impact_override)?;
        self.treatment.validate()?;
        self.residual.validate()
    }
}
