//! Register audit events
//!
//! Every mutating register operation appends one event so the surrounding
//! system can persist an audit trail of who-changed-what.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use register_types::scenario::TreatmentStatus;

/// Audit event emitted by the register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterEvent {
    pub event_id: Uuid,
    pub subject_id: Uuid,
    pub event_type: RegisterEventType,
    pub timestamp: i64,
}

/// Register event classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterEventType {
    AssetAdded,
    AssetUpdated,
    /// Deleting an asset removes its scenarios (and their incidents)
    AssetRemoved { cascaded_scenarios: usize },
    ThreatAdded,
    ThreatUpdated,
    ThreatRemoved,
    VulnerabilityAdded,
    VulnerabilityUpdated,
    VulnerabilityRemoved,
    ControlAdded,
    ControlUpdated,
    /// Deleting a control detaches it from every proposing scenario
    ControlRemoved { detached_from: usize },
    ScenarioCreated,
    ScenarioNotesEdited,
    TreatmentUpdated { status: TreatmentStatus },
    ResidualRecorded { assessed: bool },
    ScenarioRemoved { cascaded_incidents: usize },
    IncidentRegistered { scenario_id: Uuid },
    IncidentRemoved { scenario_id: Uuid },
}

impl RegisterEvent {
    pub fn new(subject_id: Uuid, event_type: RegisterEventType, timestamp: i64) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            subject_id,
            event_type,
            timestamp,
        }
    }
}
