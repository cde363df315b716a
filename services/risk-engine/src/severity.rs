//! Severity classifier
//!
//! Maps a 1-25 score onto the ordered Low < Medium < High < Critical tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier of a scored risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// score <= 5
    Low,
    /// 6 <= score <= 10
    Medium,
    /// 11 <= score <= 15
    High,
    /// score >= 16
    Critical,
}

/// Upper bound (inclusive) of each tier
static TIER_BOUNDS: [(u8, RiskLevel); 4] = [
    (5, RiskLevel::Low),
    (10, RiskLevel::Medium),
    (15, RiskLevel::High),
    (u8::MAX, RiskLevel::Critical),
];

impl RiskLevel {
    /// Ordinal used for sorting: Low=1 … Critical=4
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }

    /// High or Critical
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score into its tier (boundaries inclusive)
pub fn classify(score: u8) -> RiskLevel {
    TIER_BOUNDS
        .iter()
        .find(|(upper, _)| score <= *upper)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::Critical)
}

/// Rank of an optional tier; an undefined tier ranks 0
pub fn rank(level: Option<RiskLevel>) -> u8 {
    level.map_or(0, |l| l.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(1), RiskLevel::Low);
        assert_eq!(classify(5), RiskLevel::Low);
        assert_eq!(classify(6), RiskLevel::Medium);
        assert_eq!(classify(10), RiskLevel::Medium);
        assert_eq!(classify(11), RiskLevel::High);
        assert_eq!(classify(15), RiskLevel::High);
        assert_eq!(classify(16), RiskLevel::Critical);
        assert_eq!(classify(25), RiskLevel::Critical);
    }

    #[test]
    fn test_rank_order() {
        assert_eq!(rank(Some(RiskLevel::Low)), 1);
        assert_eq!(rank(Some(RiskLevel::Medium)), 2);
        assert_eq!(rank(Some(RiskLevel::High)), 3);
        assert_eq!(rank(Some(RiskLevel::Critical)), 4);
        assert_eq!(rank(None), 0);
        assert!(RiskLevel::Low < RiskLevel::Critical);
    }

    #[test]
    fn test_elevated() {
        assert!(!RiskLevel::Medium.is_elevated());
        assert!(RiskLevel::High.is_elevated());
        assert!(RiskLevel::Critical.is_elevated());
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(RiskLevel::Critical.to_string(), "Critical");
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }

    proptest! {
        #[test]
        fn classify_is_monotonic(score in 1u8..25) {
            prop_assert!(classify(score) <= classify(score + 1));
            prop_assert!(classify(score).rank() <= classify(score + 1).rank());
        }
    }
}
