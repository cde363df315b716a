//! Risk Engine Service
//!
//! Scores and classifies information-security risk scenarios, tracks their
//! treatment and residual evaluation, and aggregates the portfolio into
//! dashboard indicators and a ranked register.
//!
//! Computation modules are pure functions over resolved records; the
//! [`register::Register`] owns the records and [`engine::RiskEngine`] ties
//! the two together.

pub mod impact;
pub mod score;
pub mod severity;
pub mod treatment;
pub mod residual;
pub mod view;
pub mod portfolio;
pub mod events;
pub mod register;
pub mod export;
pub mod engine;

/// Engine version string carried by snapshots and exports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
