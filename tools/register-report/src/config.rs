//! Report configuration parsed from environment variables.

use std::env;

use risk_engine::engine::RiskEngineConfig;
use thiserror::Error;

pub const SNAPSHOT_VAR: &str = "RISKGUARD_SNAPSHOT";
pub const EXPORT_VAR: &str = "RISKGUARD_EXPORT";
pub const TOP_N_VAR: &str = "RISKGUARD_TOP_N";

const DEFAULT_SNAPSHOT: &str = "register.json";
const DEFAULT_EXPORT: &str = "register-export.json";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidTopN { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Register snapshot to load, or to create from seed data
    pub snapshot_path: String,
    /// Destination of the register export
    pub export_path: String,
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            snapshot_path: DEFAULT_SNAPSHOT.to_string(),
            export_path: DEFAULT_EXPORT.to_string(),
            top_n: RiskEngineConfig::default().top_n,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let top_n = match get(TOP_N_VAR) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidTopN {
                        var: TOP_N_VAR,
                        value: raw,
                    })
                }
            },
            None => defaults.top_n,
        };

        Ok(Self {
            snapshot_path: get(SNAPSHOT_VAR).unwrap_or(defaults.snapshot_path),
            export_path: get(EXPORT_VAR).unwrap_or(defaults.export_path),
            top_n,
        })
    }

    pub fn engine_config(&self) -> RiskEngineConfig {
        RiskEngineConfig {
            top_n: self.top_n,
            ..RiskEngineConfig::default()
        }
    }
}
