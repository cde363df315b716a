//! Catalog records: threats, vulnerabilities and candidate controls
//!
//! Pure reference data with no derived behavior.

use crate::errors::ValidationError;
use crate::ids::{ControlId, ThreatId, VulnerabilityId};
use crate::scale::{self, CONTROL_NAME_MAX_LEN, NAME_MAX_LEN};
use serde::{Deserialize, Serialize};

/// Threat category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatCategory {
    External,
    Internal,
    HumanError,
    TechnicalFailure,
}

/// Vulnerability category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnerabilityCategory {
    Technological,
    Organizational,
    Process,
}

/// Control type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    Preventive,
    Detective,
    Corrective,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub threat_id: ThreatId,
    pub name: String,
    pub category: ThreatCategory,
    pub description: Option<String>,
}

impl Threat {
    pub fn new(name: impl Into<String>, category: ThreatCategory) -> Self {
        Self {
            threat_id: ThreatId::new(),
            name: name.into(),
            category,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_required_text("name", &self.name, NAME_MAX_LEN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub vulnerability_id: VulnerabilityId,
    pub name: String,
    pub category: VulnerabilityCategory,
    pub description: Option<String>,
}

impl Vulnerability {
    pub fn new(name: impl Into<String>, category: VulnerabilityCategory) -> Self {
        Self {
            vulnerability_id: VulnerabilityId::new(),
            name: name.into(),
            category,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_required_text("name", &self.name, NAME_MAX_LEN)
    }
}

/// Candidate mitigation, optionally tied to an external standard clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub control_id: ControlId,
    pub name: String,
    pub standard_reference: Option<String>,
    pub control_type: Option<ControlType>,
    pub description: Option<String>,
}

impl Control {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            control_id: ControlId::new(),
            name: name.into(),
            standard_reference: None,
            control_type: None,
            description: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.standard_reference = Some(reference.into());
        self
    }

    pub fn with_type(mut self, control_type: ControlType) -> Self {
        self.control_type = Some(control_type);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Display label, e.g. `MFA [ISO 27002:2022 - Access management]`
    pub fn label(&self) -> String {
        match self.standard_reference.as_deref() {
            Some(reference) if !reference.is_empty() => format!("{} [{}]", self.name, reference),
            _ => self.name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        scale::validate_required_text("name", &self.name, CONTROL_NAME_MAX_LEN)?;
        scale::validate_length(
            "standard_reference",
            self.standard_reference.as_deref(),
            NAME_MAX_LEN,
        )
    }
}
