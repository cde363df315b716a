//! Score calculator
//!
//! `score = probability × impact`, both on the 1-5 scale, giving 1-25.

use register_types::asset::Asset;
use register_types::scenario::RiskScenario;

use crate::impact;
use crate::severity::{self, RiskLevel};

/// Combine probability and impact into a severity score.
///
/// Pure and total; no rounding. Saturates instead of overflowing if a
/// caller passes values far outside the documented scale.
pub fn score(probability: u8, impact: u8) -> u8 {
    probability.saturating_mul(impact)
}

/// Impact for this scenario: the override when present, else the asset's
/// base impact. Overrides are clamped to 1-5.
pub fn impact_value(scenario: &RiskScenario, asset: &Asset) -> u8 {
    match scenario.impact_override {
        Some(value) => impact::clamp_scale(value),
        None => impact::base_impact(asset),
    }
}

/// Inherent score before any treatment
pub fn inherent_score(scenario: &RiskScenario, asset: &Asset) -> u8 {
    score(scenario.probability, impact_value(scenario, asset))
}

/// Inherent tier before any treatment
pub fn inherent_level(scenario: &RiskScenario, asset: &Asset) -> RiskLevel {
    severity::classify(inherent_score(scenario, asset))
}
