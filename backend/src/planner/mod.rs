//! Planning run orchestration
//!
//! Ties the forecaster and the scenario simulator together behind a
//! validated configuration.

pub mod config;
pub mod engine;
pub mod fingerprint;

pub use config::PlannerConfig;
pub use engine::{PlanOutput, Planner, PlanningError};
pub use fingerprint::compute_config_hash;
