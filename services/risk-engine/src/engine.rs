//! Risk Engine — orchestrator
//!
//! Resolves scenarios out of a register and runs them through scoring,
//! classification, residual evaluation and portfolio aggregation.

use register_types::errors::RegisterError;
use register_types::ids::ScenarioId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::export::{self, RegisterExport, RegisterRow};
use crate::portfolio::{self, Kpi, PortfolioSummary};
use crate::register::Register;
use crate::view::Assessment;

/// Risk engine configuration
#[derive(Debug, Clone)]
pub struct RiskEngineConfig {
    /// Number of scenarios on the dashboard's top-risk list
    pub top_n: usize,
    /// Strategy column text for scenarios without a strategy
    pub strategy_placeholder: String,
}

impl Default for RiskEngineConfig {
    fn default() -> Self {
        Self {
            top_n: 8,
            strategy_placeholder: "-".to_string(),
        }
    }
}

/// Dashboard content: indicators plus the highest-ranked scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub kpis: Vec<Kpi>,
    pub top_risks: Vec<RegisterRow>,
}

/// Risk engine service
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: RiskEngineConfig,
}

impl RiskEngine {
    /// Create a new risk engine with default configuration
    pub fn new() -> Self {
        Self {
            config: RiskEngineConfig::default(),
        }
    }

    /// Create a new risk engine with custom configuration
    pub fn with_config(config: RiskEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskEngineConfig {
        &self.config
    }

    /// Derived values for a single scenario
    pub fn assess(&self, register: &Register, scenario_id: &ScenarioId) -> Result<Assessment, RegisterError> {
        let assessment = register.resolve(scenario_id)?.assessment();
        debug!(
            %scenario_id,
            score = assessment.inherent_score,
            level = %assessment.inherent_level,
            residual = ?assessment.residual_score,
            "Scenario assessed"
        );
        Ok(assessment)
    }

    /// Raw portfolio counts
    pub fn portfolio(&self, register: &Register) -> Result<PortfolioSummary, RegisterError> {
        let views = register.views()?;
        let summary = portfolio::summarize(&views);
        debug!(
            total = summary.total,
            elevated = summary.elevated,
            tier_reduced = summary.tier_reduced,
            incidents = summary.incidents,
            "Portfolio summarized"
        );
        Ok(summary)
    }

    /// KPIs and the top-N list under the tier-first ordering
    pub fn dashboard(&self, register: &Register) -> Result<Dashboard, RegisterError> {
        let views = register.views()?;
        let kpis = portfolio::summarize(&views).kpis();
        let top_risks = portfolio::top_risks(&views, self.config.top_n)
            .iter()
            .map(|v| RegisterRow::from_view(v, &self.config.strategy_placeholder))
            .collect::<Vec<_>>();

        debug!(
            scenarios = views.len(),
            shown = top_risks.len(),
            "Dashboard built"
        );
        Ok(Dashboard { kpis, top_risks })
    }

    /// Every scenario under the tier-first ordering, untruncated
    pub fn ranked(&self, register: &Register) -> Result<Vec<RegisterRow>, RegisterError> {
        let views = register.views()?;
        Ok(portfolio::rank_scenarios(&views)
            .iter()
            .map(|v| RegisterRow::from_view(v, &self.config.strategy_placeholder))
            .collect())
    }

    /// Register export ordered by raw score
    pub fn export_register(&self, register: &Register, timestamp: i64) -> Result<RegisterExport, RegisterError> {
        let views = register.views()?;
        let export = export::build_register(&views, &self.config.strategy_placeholder, timestamp);
        debug!(rows = export.rows.len(), "Register export built");
        Ok(export)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}
