//! In-memory risk register
//!
//! Owns the entity records, validates writes, enforces cascade rules and
//! round-trips through a JSON snapshot. Stands in for the storage layer:
//! all `&mut self` methods are the single writer, and each one either
//! applies completely or leaves the register untouched.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, TimeZone, Utc};
use register_types::asset::Asset;
use register_types::catalog::{Control, Threat, Vulnerability};
use register_types::errors::{RegisterError, ValidationError};
use register_types::ids::{AssetId, ControlId, IncidentId, ScenarioId, ThreatId, VulnerabilityId};
use register_types::incident::{Incident, IncidentSeverity};
use register_types::scale;
use register_types::scenario::{ResidualAssessment, RiskScenario, ScenarioNotes, TreatmentPlan};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::events::{RegisterEvent, RegisterEventType};
use crate::residual;
use crate::treatment;
use crate::view::ScenarioView;

/// Serializable form of the whole register
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    pub version: String,
    pub assets: Vec<Asset>,
    pub threats: Vec<Threat>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub controls: Vec<Control>,
    pub scenarios: Vec<RiskScenario>,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, Default)]
pub struct Register {
    assets: BTreeMap<AssetId, Asset>,
    threats: BTreeMap<ThreatId, Threat>,
    vulnerabilities: BTreeMap<VulnerabilityId, Vulnerability>,
    controls: BTreeMap<ControlId, Control>,
    // Insertion order is the input order for ranking ties
    scenarios: Vec<RiskScenario>,
    incidents: Vec<Incident>,
    events: Vec<RegisterEvent>,
}

fn asset_not_found(id: &AssetId) -> RegisterError {
    RegisterError::AssetNotFound {
        asset_id: id.to_string(),
    }
}

fn threat_not_found(id: &ThreatId) -> RegisterError {
    RegisterError::ThreatNotFound {
        threat_id: id.to_string(),
    }
}

fn vulnerability_not_found(id: &VulnerabilityId) -> RegisterError {
    RegisterError::VulnerabilityNotFound {
        vulnerability_id: id.to_string(),
    }
}

fn control_not_found(id: &ControlId) -> RegisterError {
    RegisterError::ControlNotFound {
        control_id: id.to_string(),
    }
}

fn duplicate(kind: &'static str, id: impl std::fmt::Display) -> RegisterError {
    RegisterError::Duplicate {
        kind,
        id: id.to_string(),
    }
}

fn scenario_not_found(id: &ScenarioId) -> RegisterError {
    RegisterError::ScenarioNotFound {
        scenario_id: id.to_string(),
    }
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, subject_id: uuid::Uuid, event_type: RegisterEventType, timestamp: i64) {
        self.events
            .push(RegisterEvent::new(subject_id, event_type, timestamp));
    }

    // ── Assets ──────────────────────────────────────────────────────────

    pub fn add_asset(&mut self, asset: Asset, timestamp: i64) -> Result<AssetId, RegisterError> {
        asset.validate()?;
        let asset_id = asset.asset_id;
        if self.assets.contains_key(&asset_id) {
            return Err(duplicate("Asset", asset_id));
        }
        info!(%asset_id, name = %asset.name, "Asset added");
        self.assets.insert(asset_id, asset);
        self.record(*asset_id.as_uuid(), RegisterEventType::AssetAdded, timestamp);
        Ok(asset_id)
    }

    /// Replace an asset's fields; `created_at` is kept from the stored record
    pub fn update_asset(&mut self, mut asset: Asset, timestamp: i64) -> Result<(), RegisterError> {
        asset.validate()?;
        let asset_id = asset.asset_id;
        let existing = self
            .assets
            .get_mut(&asset_id)
            .ok_or_else(|| asset_not_found(&asset_id))?;
        asset.created_at = existing.created_at;
        *existing = asset;
        info!(%asset_id, "Asset updated");
        self.record(*asset_id.as_uuid(), RegisterEventType::AssetUpdated, timestamp);
        Ok(())
    }

    /// Remove an asset together with its scenarios and their incidents.
    /// Returns the number of scenarios removed.
    pub fn remove_asset(&mut self, asset_id: &AssetId, timestamp: i64) -> Result<usize, RegisterError> {
        if !self.assets.contains_key(asset_id) {
            return Err(asset_not_found(asset_id));
        }

        let doomed: Vec<ScenarioId> = self
            .scenarios
            .iter()
            .filter(|s| s.asset_id == *asset_id)
            .map(|s| s.scenario_id)
            .collect();
        for scenario_id in &doomed {
            self.remove_scenario(scenario_id, timestamp)?;
        }

        self.assets.remove(asset_id);
        info!(%asset_id, cascaded_scenarios = doomed.len(), "Asset removed");
        self.record(
            *asset_id.as_uuid(),
            RegisterEventType::AssetRemoved {
                cascaded_scenarios: doomed.len(),
            },
            timestamp,
        );
        Ok(doomed.len())
    }

    // ── Threats & vulnerabilities ───────────────────────────────────────

    pub fn add_threat(&mut self, threat: Threat, timestamp: i64) -> Result<ThreatId, RegisterError> {
        threat.validate()?;
        let threat_id = threat.threat_id;
        if self.threats.contains_key(&threat_id) {
            return Err(duplicate("Threat", threat_id));
        }
        self.threats.insert(threat_id, threat);
        self.record(*threat_id.as_uuid(), RegisterEventType::ThreatAdded, timestamp);
        Ok(threat_id)
    }

    pub fn update_threat(&mut self, threat: Threat, timestamp: i64) -> Result<(), RegisterError> {
        threat.validate()?;
        let threat_id = threat.threat_id;
        let existing = self
            .threats
            .get_mut(&threat_id)
            .ok_or_else(|| threat_not_found(&threat_id))?;
        *existing = threat;
        self.record(*threat_id.as_uuid(), RegisterEventType::ThreatUpdated, timestamp);
        Ok(())
    }

    /// Remove a threat no scenario references
    pub fn remove_threat(&mut self, threat_id: &ThreatId, timestamp: i64) -> Result<(), RegisterError> {
        if !self.threats.contains_key(threat_id) {
            return Err(threat_not_found(threat_id));
        }
        let users = self.scenarios.iter().filter(|s| s.threat_id == *threat_id).count();
        if users > 0 {
            return Err(RegisterError::InUse {
                kind: "Threat",
                id: threat_id.to_string(),
                scenarios: users,
            });
        }
        self.threats.remove(threat_id);
        self.record(*threat_id.as_uuid(), RegisterEventType::ThreatRemoved, timestamp);
        Ok(())
    }

    pub fn add_vulnerability(
        &mut self,
        vulnerability: Vulnerability,
        timestamp: i64,
    ) -> Result<VulnerabilityId, RegisterError> {
        vulnerability.validate()?;
        let vulnerability_id = vulnerability.vulnerability_id;
        if self.vulnerabilities.contains_key(&vulnerability_id) {
            return Err(duplicate("Vulnerability", vulnerability_id));
        }
        self.vulnerabilities.insert(vulnerability_id, vulnerability);
        self.record(
            *vulnerability_id.as_uuid(),
            RegisterEventType::VulnerabilityAdded,
            timestamp,
        );
        Ok(vulnerability_id)
    }

    pub fn update_vulnerability(
        &mut self,
        vulnerability: Vulnerability,
        timestamp: i64,
    ) -> Result<(), RegisterError> {
        vulnerability.validate()?;
        let vulnerability_id = vulnerability.vulnerability_id;
        let existing = self
            .vulnerabilities
            .get_mut(&vulnerability_id)
            .ok_or_else(|| vulnerability_not_found(&vulnerability_id))?;
        *existing = vulnerability;
        self.record(
            *vulnerability_id.as_uuid(),
            RegisterEventType::VulnerabilityUpdated,
            timestamp,
        );
        Ok(())
    }

    /// Remove a vulnerability no scenario references
    pub fn remove_vulnerability(
        &mut self,
        vulnerability_id: &VulnerabilityId,
        timestamp: i64,
    ) -> Result<(), RegisterError> {
        if !self.vulnerabilities.contains_key(vulnerability_id) {
            return Err(vulnerability_not_found(vulnerability_id));
        }
        let users = self
            .scenarios
            .iter()
            .filter(|s| s.vulnerability_id == *vulnerability_id)
            .count();
        if users > 0 {
            return Err(RegisterError::InUse {
                kind: "Vulnerability",
                id: vulnerability_id.to_string(),
                scenarios: users,
            });
        }
        self.vulnerabilities.remove(vulnerability_id);
        self.record(
            *vulnerability_id.as_uuid(),
            RegisterEventType::VulnerabilityRemoved,
            timestamp,
        );
        Ok(())
    }

    // ── Controls ────────────────────────────────────────────────────────

    pub fn add_control(&mut self, control: Control, timestamp: i64) -> Result<ControlId, RegisterError> {
        control.validate()?;
        let control_id = control.control_id;
        if self.controls.contains_key(&control_id) {
            return Err(duplicate("Control", control_id));
        }
        self.controls.insert(control_id, control);
        self.record(*control_id.as_uuid(), RegisterEventType::ControlAdded, timestamp);
        Ok(control_id)
    }

    pub fn update_control(&mut self, control: Control, timestamp: i64) -> Result<(), RegisterError> {
        control.validate()?;
        let control_id = control.control_id;
        let existing = self
            .controls
            .get_mut(&control_id)
            .ok_or_else(|| control_not_found(&control_id))?;
        *existing = control;
        self.record(*control_id.as_uuid(), RegisterEventType::ControlUpdated, timestamp);
        Ok(())
    }

    /// Remove a control and detach it from every scenario proposing it.
    /// Returns the number of scenarios it was detached from.
    pub fn remove_control(&mut self, control_id: &ControlId, timestamp: i64) -> Result<usize, RegisterError> {
        if self.controls.remove(control_id).is_none() {
            return Err(control_not_found(control_id));
        }
        let mut detached_from = 0;
        for scenario in &mut self.scenarios {
            if scenario.treatment.proposed_controls.remove(control_id) {
                detached_from += 1;
            }
        }
        info!(%control_id, detached_from, "Control removed");
        self.record(
            *control_id.as_uuid(),
            RegisterEventType::ControlRemoved { detached_from },
            timestamp,
        );
        Ok(detached_from)
    }

    // ── Scenarios ───────────────────────────────────────────────────────

    fn check_references(&self, scenario: &RiskScenario) -> Result<(), RegisterError> {
        if !self.assets.contains_key(&scenario.asset_id) {
            return Err(asset_not_found(&scenario.asset_id));
        }
        if !self.threats.contains_key(&scenario.threat_id) {
            return Err(threat_not_found(&scenario.threat_id));
        }
        if !self.vulnerabilities.contains_key(&scenario.vulnerability_id) {
            return Err(vulnerability_not_found(&scenario.vulnerability_id));
        }
        self.check_controls(&scenario.treatment)
    }

    fn check_controls(&self, plan: &TreatmentPlan) -> Result<(), RegisterError> {
        match plan
            .proposed_controls
            .iter()
            .find(|id| !self.controls.contains_key(id))
        {
            Some(missing) => Err(control_not_found(missing)),
            None => Ok(()),
        }
    }

    fn scenario_mut(&mut self, scenario_id: &ScenarioId) -> Result<&mut RiskScenario, RegisterError> {
        self.scenarios
            .iter_mut()
            .find(|s| s.scenario_id == *scenario_id)
            .ok_or_else(|| scenario_not_found(scenario_id))
    }

    /// Register a new scenario. Asset, threat and vulnerability must exist.
    ///
    /// The treatment plan and residual record must still be empty; they are
    /// filled through `set_treatment` and `set_residual`.
    pub fn create_scenario(
        &mut self,
        mut scenario: RiskScenario,
        timestamp: i64,
    ) -> Result<ScenarioId, RegisterError> {
        if scenario.treatment != TreatmentPlan::default() {
            return Err(ValidationError::NotOnCreate { field: "treatment" }.into());
        }
        if scenario.residual != ResidualAssessment::default() {
            return Err(ValidationError::NotOnCreate { field: "residual" }.into());
        }
        scenario.validate()?;
        self.check_references(&scenario)?;
        if self.scenario(&scenario.scenario_id).is_some() {
            return Err(duplicate("Risk scenario", scenario.scenario_id));
        }
        scenario.existing_controls = scale::normalize_text(scenario.existing_controls.take());
        scenario.observations = scale::normalize_text(scenario.observations.take());

        let scenario_id = scenario.scenario_id;
        info!(
            %scenario_id,
            asset_id = %scenario.asset_id,
            probability = scenario.probability,
            "Risk scenario created"
        );
        self.scenarios.push(scenario);
        self.record(*scenario_id.as_uuid(), RegisterEventType::ScenarioCreated, timestamp);
        Ok(scenario_id)
    }

    /// Edit the impact override and free-text notes of a scenario
    pub fn edit_scenario_notes(
        &mut self,
        scenario_id: &ScenarioId,
        notes: ScenarioNotes,
        timestamp: i64,
    ) -> Result<(), RegisterError> {
        scale::validate_optional_scale("impact_override", notes.impact_override)?;
        let scenario = self.scenario_mut(scenario_id)?;
        scenario.impact_override = notes.impact_override;
        scenario.existing_controls = scale::normalize_text(notes.existing_controls);
        scenario.observations = scale::normalize_text(notes.observations);
        self.record(*scenario_id.as_uuid(), RegisterEventType::ScenarioNotesEdited, timestamp);
        Ok(())
    }

    /// Replace the treatment plan as one record.
    ///
    /// Every proposed control must exist; otherwise nothing changes.
    pub fn set_treatment(
        &mut self,
        scenario_id: &ScenarioId,
        plan: TreatmentPlan,
        timestamp: i64,
    ) -> Result<(), RegisterError> {
        plan.validate()?;
        self.check_controls(&plan)?;

        let scenario = self.scenario_mut(scenario_id)?;
        treatment::apply_treatment(scenario, plan);
        let current = &scenario.treatment;
        let status = current.status;

        if treatment::needs_acceptance_record(current) {
            warn!(
                %scenario_id,
                "Accepted risk is missing its justification or approver"
            );
        }
        info!(
            %scenario_id,
            ?status,
            strategy = ?current.strategy,
            controls = current.proposed_controls.len(),
            "Treatment updated"
        );
        self.record(
            *scenario_id.as_uuid(),
            RegisterEventType::TreatmentUpdated { status },
            timestamp,
        );
        Ok(())
    }

    /// Record a residual re-assessment
    pub fn set_residual(
        &mut self,
        scenario_id: &ScenarioId,
        update: ResidualAssessment,
        timestamp: i64,
    ) -> Result<(), RegisterError> {
        update.validate()?;
        let scenario = self.scenario_mut(scenario_id)?;
        residual::apply_residual(scenario, update);
        let assessed = scenario.residual.is_assessed();

        info!(%scenario_id, assessed, "Residual assessment recorded");
        self.record(
            *scenario_id.as_uuid(),
            RegisterEventType::ResidualRecorded { assessed },
            timestamp,
        );
        Ok(())
    }

    /// Remove a scenario and its incidents. Proposed controls are detached,
    /// never deleted. Returns the number of incidents removed.
    pub fn remove_scenario(&mut self, scenario_id: &ScenarioId, timestamp: i64) -> Result<usize, RegisterError> {
        let index = self
            .scenarios
            .iter()
            .position(|s| s.scenario_id == *scenario_id)
            .ok_or_else(|| scenario_not_found(scenario_id))?;
        self.scenarios.remove(index);

        let before = self.incidents.len();
        self.incidents.retain(|i| i.scenario_id != *scenario_id);
        let cascaded_incidents = before - self.incidents.len();

        info!(%scenario_id, cascaded_incidents, "Risk scenario removed");
        self.record(
            *scenario_id.as_uuid(),
            RegisterEventType::ScenarioRemoved { cascaded_incidents },
            timestamp,
        );
        Ok(cascaded_incidents)
    }

    // ── Incidents ───────────────────────────────────────────────────────

    /// Register an incident against a scenario. The date defaults to the
    /// calendar day of `timestamp`.
    pub fn register_incident(
        &mut self,
        scenario_id: &ScenarioId,
        date: Option<NaiveDate>,
        description: &str,
        severity: Option<IncidentSeverity>,
        timestamp: i64,
    ) -> Result<IncidentId, RegisterError> {
        if self.scenario(scenario_id).is_none() {
            return Err(scenario_not_found(scenario_id));
        }

        let date = date.unwrap_or_else(|| Utc.timestamp_nanos(timestamp).date_naive());
        let mut incident = Incident::new(*scenario_id, date, description.trim());
        incident.severity = severity;
        incident.validate()?;

        let incident_id = incident.incident_id;
        info!(%incident_id, %scenario_id, %date, "Incident registered");
        self.incidents.push(incident);
        self.record(
            *incident_id.as_uuid(),
            RegisterEventType::IncidentRegistered {
                scenario_id: *scenario_id.as_uuid(),
            },
            timestamp,
        );
        Ok(incident_id)
    }

    pub fn remove_incident(&mut self, incident_id: &IncidentId, timestamp: i64) -> Result<(), RegisterError> {
        let index = self
            .incidents
            .iter()
            .position(|i| i.incident_id == *incident_id)
            .ok_or_else(|| RegisterError::IncidentNotFound {
                incident_id: incident_id.to_string(),
            })?;
        let incident = self.incidents.remove(index);
        self.record(
            *incident_id.as_uuid(),
            RegisterEventType::IncidentRemoved {
                scenario_id: *incident.scenario_id.as_uuid(),
            },
            timestamp,
        );
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn asset(&self, asset_id: &AssetId) -> Option<&Asset> {
        self.assets.get(asset_id)
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn threat(&self, threat_id: &ThreatId) -> Option<&Threat> {
        self.threats.get(threat_id)
    }

    pub fn vulnerability(&self, vulnerability_id: &VulnerabilityId) -> Option<&Vulnerability> {
        self.vulnerabilities.get(vulnerability_id)
    }

    pub fn control(&self, control_id: &ControlId) -> Option<&Control> {
        self.controls.get(control_id)
    }

    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.controls.values()
    }

    pub fn scenario(&self, scenario_id: &ScenarioId) -> Option<&RiskScenario> {
        self.scenarios.iter().find(|s| s.scenario_id == *scenario_id)
    }

    /// Scenarios in insertion order
    pub fn scenarios(&self) -> &[RiskScenario] {
        &self.scenarios
    }

    pub fn incidents_for<'a>(&'a self, scenario_id: &'a ScenarioId) -> impl Iterator<Item = &'a Incident> {
        self.incidents
            .iter()
            .filter(move |i| i.scenario_id == *scenario_id)
    }

    /// Proposed controls of a scenario, resolved to their records
    pub fn proposed_controls(&self, scenario_id: &ScenarioId) -> Result<Vec<&Control>, RegisterError> {
        let scenario = self
            .scenario(scenario_id)
            .ok_or_else(|| scenario_not_found(scenario_id))?;
        scenario
            .treatment
            .proposed_controls
            .iter()
            .map(|id| self.controls.get(id).ok_or_else(|| control_not_found(id)))
            .collect()
    }

    pub fn events(&self) -> &[RegisterEvent] {
        &self.events
    }

    /// Take the pending audit events, leaving the log empty
    pub fn drain_events(&mut self) -> Vec<RegisterEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Views ───────────────────────────────────────────────────────────

    fn view_with_count<'a>(
        &'a self,
        scenario: &'a RiskScenario,
        incident_count: usize,
    ) -> Result<ScenarioView<'a>, RegisterError> {
        Ok(ScenarioView {
            scenario,
            asset: self
                .assets
                .get(&scenario.asset_id)
                .ok_or_else(|| asset_not_found(&scenario.asset_id))?,
            threat: self
                .threats
                .get(&scenario.threat_id)
                .ok_or_else(|| threat_not_found(&scenario.threat_id))?,
            vulnerability: self
                .vulnerabilities
                .get(&scenario.vulnerability_id)
                .ok_or_else(|| vulnerability_not_found(&scenario.vulnerability_id))?,
            incident_count,
        })
    }

    /// Resolve one scenario with its references
    pub fn resolve(&self, scenario_id: &ScenarioId) -> Result<ScenarioView<'_>, RegisterError> {
        let scenario = self
            .scenario(scenario_id)
            .ok_or_else(|| scenario_not_found(scenario_id))?;
        let count = self.incidents_for(scenario_id).count();
        self.view_with_count(scenario, count)
    }

    /// Resolve every scenario, in insertion order
    pub fn views(&self) -> Result<Vec<ScenarioView<'_>>, RegisterError> {
        let mut counts: HashMap<ScenarioId, usize> = HashMap::new();
        for incident in &self.incidents {
            *counts.entry(incident.scenario_id).or_default() += 1;
        }

        self.scenarios
            .iter()
            .map(|s| {
                let count = counts.get(&s.scenario_id).copied().unwrap_or(0);
                self.view_with_count(s, count)
            })
            .collect()
    }

    // ── Snapshot ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            version: crate::VERSION.to_string(),
            assets: self.assets.values().cloned().collect(),
            threats: self.threats.values().cloned().collect(),
            vulnerabilities: self.vulnerabilities.values().cloned().collect(),
            controls: self.controls.values().cloned().collect(),
            scenarios: self.scenarios.clone(),
            incidents: self.incidents.clone(),
        }
    }

    /// Rebuild a register from a snapshot, checking every record and
    /// reference. The event log starts empty.
    pub fn from_snapshot(snapshot: RegisterSnapshot) -> Result<Self, RegisterError> {
        let mut register = Register::new();

        for asset in snapshot.assets {
            asset.validate()?;
            let asset_id = asset.asset_id;
            if register.assets.insert(asset_id, asset).is_some() {
                return Err(duplicate("Asset", asset_id));
            }
        }
        for threat in snapshot.threats {
            threat.validate()?;
            let threat_id = threat.threat_id;
            if register.threats.insert(threat_id, threat).is_some() {
                return Err(duplicate("Threat", threat_id));
            }
        }
        for vulnerability in snapshot.vulnerabilities {
            vulnerability.validate()?;
            let vulnerability_id = vulnerability.vulnerability_id;
            if register
                .vulnerabilities
                .insert(vulnerability_id, vulnerability)
                .is_some()
            {
                return Err(duplicate("Vulnerability", vulnerability_id));
            }
        }
        for control in snapshot.controls {
            control.validate()?;
            let control_id = control.control_id;
            if register.controls.insert(control_id, control).is_some() {
                return Err(duplicate("Control", control_id));
            }
        }
        for scenario in snapshot.scenarios {
            scenario.validate()?;
            register.check_references(&scenario)?;
            if register.scenario(&scenario.scenario_id).is_some() {
                return Err(duplicate("Risk scenario", scenario.scenario_id));
            }
            register.scenarios.push(scenario);
        }
        for incident in snapshot.incidents {
            incident.validate()?;
            if register.scenario(&incident.scenario_id).is_none() {
                return Err(scenario_not_found(&incident.scenario_id));
            }
            if register
                .incidents
                .iter()
                .any(|i| i.incident_id == incident.incident_id)
            {
                return Err(duplicate("Incident", incident.incident_id));
            }
            register.incidents.push(incident);
        }

        debug!(
            scenarios = register.scenarios.len(),
            incidents = register.incidents.len(),
            "Register restored from snapshot"
        );
        Ok(register)
    }

    pub fn to_json(&self) -> Result<String, RegisterError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, RegisterError> {
        let snapshot: RegisterSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}
