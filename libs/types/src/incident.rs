//! Incident records
//!
//! An incident is an observed realization of a risk scenario.

use crate::errors::ValidationError;
use crate::ids::{IncidentId, ScenarioId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free severity label; not numerically scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: IncidentId,
    pub scenario_id: ScenarioId,
    pub date: NaiveDate,
    pub description: String,
    pub severity: Option<IncidentSeverity>,
}

impl Incident {
    pub fn new(scenario_id: ScenarioId, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            incident_id: IncidentId::new(),
            scenario_id,
            date,
            description: description.into(),
            severity: None,
        }
    }

    pub fn with_severity(mut self, severity: IncidentSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "description",
            });
        }
        Ok(())
    }
}
