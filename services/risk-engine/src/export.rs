//! Register export
//!
//! Flattens resolved scenarios into register rows and serializes them to
//! JSON for external consumption.

use register_types::ids::ScenarioId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::ScenarioView;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize register export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write register export: {0}")]
    Io(#[from] std::io::Error),
}

/// One line of the register table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRow {
    pub scenario_id: ScenarioId,
    pub asset: String,
    pub threat: String,
    pub vulnerability: String,
    pub probability: u8,
    pub impact: u8,
    pub score: u8,
    pub level: String,
    pub strategy: String,
    pub status: String,
}

impl RegisterRow {
    pub fn from_view(view: &ScenarioView<'_>, placeholder: &str) -> Self {
        let treatment = &view.scenario.treatment;
        Self {
            scenario_id: view.scenario.scenario_id,
            asset: view.asset.name.clone(),
            threat: view.threat.name.clone(),
            vulnerability: view.vulnerability.name.clone(),
            probability: view.scenario.probability,
            impact: view.impact_value(),
            score: view.inherent_score(),
            level: view.inherent_level().label().to_string(),
            strategy: treatment
                .strategy
                .map_or_else(|| placeholder.to_string(), |s| s.to_string()),
            status: treatment.status.to_string(),
        }
    }
}

/// Complete register export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterExport {
    pub version: String,
    pub generated_at: i64, // Unix nanos
    pub rows: Vec<RegisterRow>,
}

/// Build the export with rows sorted by raw inherent score, highest first.
///
/// Tier rank plays no part here; equal scores keep input order.
pub fn build_register(views: &[ScenarioView<'_>], placeholder: &str, timestamp: i64) -> RegisterExport {
    let mut ordered = views.to_vec();
    ordered.sort_by_key(|v| std::cmp::Reverse(v.inherent_score()));

    RegisterExport {
        version: crate::VERSION.to_string(),
        generated_at: timestamp,
        rows: ordered
            .iter()
            .map(|v| RegisterRow::from_view(v, placeholder))
            .collect(),
    }
}

/// Serialize the export as pretty JSON
pub fn export_json(export: &RegisterExport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(export)?)
}

/// Write the export to a file path
pub fn write_to_file(export: &RegisterExport, path: &str) -> Result<(), ExportError> {
    let json = export_json(export)?;
    std::fs::write(path, json)?;
    Ok(())
}
