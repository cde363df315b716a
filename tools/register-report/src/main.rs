mod config;
mod seed;

use std::path::Path;

use anyhow::Context;
use config::ReportConfig;
use risk_engine::engine::RiskEngine;
use risk_engine::export;
use risk_engine::register::Register;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ReportConfig::from_env()?;
    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    info!(snapshot = %config.snapshot_path, export = %config.export_path, "Starting register report");

    let register = load_or_seed(&config.snapshot_path, now)?;
    let engine = RiskEngine::with_config(config.engine_config());

    let dashboard = engine.dashboard(&register)?;
    for kpi in &dashboard.kpis {
        info!(label = %kpi.label, value = %kpi.value, "KPI");
    }
    for (position, row) in dashboard.top_risks.iter().enumerate() {
        info!(
            position = position + 1,
            asset = %row.asset,
            threat = %row.threat,
            score = row.score,
            level = %row.level,
            "Top risk"
        );
    }
    debug!(dashboard = %serde_json::to_string(&dashboard)?, "Dashboard payload");

    let register_export = engine.export_register(&register, now)?;
    export::write_to_file(&register_export, &config.export_path)
        .with_context(|| format!("writing export to {}", config.export_path))?;
    info!(rows = register_export.rows.len(), path = %config.export_path, "Register exported");

    Ok(())
}

/// Load the snapshot, or seed a demo register and persist it
fn load_or_seed(path: &str, timestamp: i64) -> Result<Register, anyhow::Error> {
    if Path::new(path).exists() {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading snapshot {path}"))?;
        let register = Register::from_json(&json).with_context(|| format!("decoding snapshot {path}"))?;
        info!(scenarios = register.scenarios().len(), "Register loaded");
        return Ok(register);
    }

    let register = seed::seed_register(timestamp)?;
    std::fs::write(path, register.to_json()?).with_context(|| format!("writing snapshot {path}"))?;
    info!(scenarios = register.scenarios().len(), path, "Seeded demo register");
    Ok(register)
}
