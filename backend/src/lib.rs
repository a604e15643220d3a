//! Workforce Planner Core - Rust Engine
//!
//! Contact-center capacity planning: forecasts interval-level demand per
//! (channel, queue), converts it into required staff with Erlang-C queueing
//! and evaluates what-if staffing scenarios against the forecast.
//!
//! # Architecture
//!
//! - **core**: Interval discretization and parameter errors
//! - **models**: Record types, scenarios, channel discipline
//! - **queueing**: Erlang-C service level and speed of answer
//! - **staffing**: Minimum agents for a target, shrinkage conversion
//! - **forecast**: Seasonal-trend forecaster and accuracy scoring
//! - **simulation**: Two-pass scenario simulator and KPI roll-up
//! - **planner**: Validated end-to-end planning run
//!
//! # Critical Invariants
//!
//! 1. Agent counts are integers; fractional staff never leaves the solver
//! 2. Unstable queues (traffic ≥ agents) are modeled values, not errors
//! 3. Output order is deterministic regardless of parallelism

// Module declarations
pub mod core;
pub mod forecast;
pub mod models;
pub mod planner;
pub mod queueing;
pub mod simulation;
pub mod staffing;

// Re-exports for convenience
pub use core::{IntervalLength, ParameterError};
pub use forecast::{ModelQuality, SeriesModel};
pub use models::{
    discipline_map, ChannelDiscipline, DisciplineAssignment, ForecastRecord, IntervalRecord,
    Scenario, ScenarioOutcomeRecord, SeriesKey, StaffingRecord,
};
pub use planner::{compute_config_hash, PlanOutput, Planner, PlannerConfig, PlanningError};
pub use queueing::ErlangResult;
pub use simulation::KpiSummaryRow;
pub use staffing::{SolverConfig, StaffingResult};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn wfm_planner_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::planner::PyPlanner>()?;
    m.add_function(wrap_pyfunction!(ffi::planner::run_plan_json, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::planner::erlang_summary, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::planner::required_agents, m)?)?;
    Ok(())
}
