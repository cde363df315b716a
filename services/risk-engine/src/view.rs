//! Resolved scenario view
//!
//! A scenario together with the records it references, already loaded.
//! Every derived value the dashboard and export need hangs off this view.

use register_types::asset::Asset;
use register_types::catalog::{Threat, Vulnerability};
use register_types::scenario::RiskScenario;
use serde::Serialize;

use crate::residual;
use crate::score;
use crate::severity::RiskLevel;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioView<'a> {
    pub scenario: &'a RiskScenario,
    pub asset: &'a Asset,
    pub threat: &'a Threat,
    pub vulnerability: &'a Vulnerability,
    pub incident_count: usize,
}

impl<'a> ScenarioView<'a> {
    pub fn impact_value(&self) -> u8 {
        score::impact_value(self.scenario, self.asset)
    }

    pub fn inherent_score(&self) -> u8 {
        score::inherent_score(self.scenario, self.asset)
    }

    pub fn inherent_level(&self) -> RiskLevel {
        score::inherent_level(self.scenario, self.asset)
    }

    pub fn residual_score(&self) -> Option<u8> {
        residual::residual_score(self.scenario, self.asset)
    }

    pub fn residual_level(&self) -> Option<RiskLevel> {
        residual::residual_level(self.scenario, self.asset)
    }

    pub fn is_tier_reduced(&self) -> bool {
        residual::is_tier_reduced(self.scenario, self.asset)
    }

    /// Snapshot of every derived value
    pub fn assessment(&self) -> Assessment {
        Assessment {
            impact: self.impact_value(),
            inherent_score: self.inherent_score(),
            inherent_level: self.inherent_level(),
            residual_score: self.residual_score(),
            residual_level: self.residual_level(),
            tier_reduced: self.is_tier_reduced(),
        }
    }
}

/// Derived values for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub impact: u8,
    pub inherent_score: u8,
    pub inherent_level: RiskLevel,
    pub residual_score: Option<u8>,
    pub residual_level: Option<RiskLevel>,
    pub tier_reduced: bool,
}
