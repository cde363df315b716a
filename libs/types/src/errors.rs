//! Error types for the risk register
//!
//! Error taxonomy using thiserror. Range problems inside the scoring
//! tables are clamped by the engine and never surface here; these errors
//! cover write-side validation and unresolved references.

use thiserror::Error;

/// Top-level register error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegisterError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Asset not found: {asset_id}")]
    AssetNotFound { asset_id: String },

    #[error("Threat not found: {threat_id}")]
    ThreatNotFound { threat_id: String },

    #[error("Vulnerability not found: {vulnerability_id}")]
    VulnerabilityNotFound { vulnerability_id: String },

    #[error("Control not found: {control_id}")]
    ControlNotFound { control_id: String },

    #[error("Risk scenario not found: {scenario_id}")]
    ScenarioNotFound { scenario_id: String },

    #[error("Incident not found: {incident_id}")]
    IncidentNotFound { incident_id: String },

    #[error("{kind} {id} is still referenced by {scenarios} risk scenario(s)")]
    InUse {
        kind: &'static str,
        id: String,
        scenarios: usize,
    },

    #[error("{kind} already registered: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },
}

/// Field-level validation errors raised when a record is written
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} is set through its own operation, not on creation")]
    NotOnCreate { field: &'static str },
}

impl From<serde_json::Error> for RegisterError {
    fn from(err: serde_json::Error) -> Self {
        RegisterError::Snapshot {
            message: err.to_string(),
        }
    }
}
