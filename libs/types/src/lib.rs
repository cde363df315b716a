//! Types library for the risk register
//!
//! This library provides the record definitions shared by the scoring
//! engine and the reporting tools.
//!
//! # Modules
//! - `ids`: Unique identifiers (AssetId, ThreatId, ScenarioId, ...)
//! - `scale`: Rating bounds and write-side validation helpers
//! - `asset`: Assets and their CID ratings
//! - `catalog`: Threats, vulnerabilities and candidate controls
//! - `scenario`: Risk scenarios, treatment plans and residual assessments
//! - `incident`: Recorded incidents
//! - `errors`: Error taxonomy

pub mod ids;
pub mod scale;
pub mod asset;
pub mod catalog;
pub mod scenario;
pub mod incident;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::asset::*;
    pub use crate::catalog::*;
    pub use crate::scenario::*;
    pub use crate::incident::*;
    pub use crate::errors::*;
}
