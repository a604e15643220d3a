//! PyO3 wrapper for Planner
//!
//! This module provides the Python interface to the planning engine.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::models::{discipline_map, DisciplineAssignment, IntervalRecord, StaffingRecord};
use crate::planner::{PlanOutput, Planner as RustPlanner, PlannerConfig};
use crate::queueing::erlang_metrics;
use crate::staffing::{required_agents_realtime, required_agents_throughput, SolverConfig};

use super::types::{
    erlang_result_to_py, parse_discipline, parse_planner_config, staffing_result_to_py,
    value_error,
};

fn run_from_json(
    planner: &RustPlanner,
    intervals_json: &str,
    staffing_json: &str,
    disciplines_json: &str,
) -> PyResult<PlanOutput> {
    let intervals: Vec<IntervalRecord> = serde_json::from_str(intervals_json).map_err(value_error)?;
    let staffing: Vec<StaffingRecord> = serde_json::from_str(staffing_json).map_err(value_error)?;
    let assignments: Vec<DisciplineAssignment> =
        serde_json::from_str(disciplines_json).map_err(value_error)?;
    planner
        .run(&intervals, &staffing, &discipline_map(assignments))
        .map_err(value_error)
}

/// Python wrapper for Rust Planner
///
/// # Example (from Python)
///
/// ```python
/// from wfm_planner_core_rs import Planner
///
/// planner = Planner({"interval_minutes": 60, "horizon_days": 7})
/// result = json.loads(planner.run_json(intervals, staffing, disciplines))
/// print(result["unmet_target_intervals"])
/// ```
#[pyclass(name = "Planner")]
pub struct PyPlanner {
    inner: RustPlanner,
}

#[pymethods]
impl PyPlanner {
    /// Create a planner; omitted keys take their defaults
    ///
    /// # Errors
    ///
    /// Raises ValueError if any configuration value is invalid
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let rust_config = match config {
            Some(py_config) => parse_planner_config(py_config)?,
            None => PlannerConfig::default(),
        };
        let inner = RustPlanner::new(rust_config).map_err(value_error)?;
        Ok(PyPlanner { inner })
    }

    /// SHA-256 of the canonical configuration
    fn config_hash(&self) -> String {
        self.inner.config_hash().to_string()
    }

    fn interval_minutes(&self) -> u32 {
        self.inner.interval().minutes()
    }

    /// Run a full plan over JSON record arrays, returning the plan as JSON
    fn run_json(
        &self,
        py: Python<'_>,
        intervals_json: &str,
        staffing_json: &str,
        disciplines_json: &str,
    ) -> PyResult<String> {
        let output = py.allow_threads(|| {
            run_from_json(&self.inner, intervals_json, staffing_json, disciplines_json)
        })?;
        serde_json::to_string(&output).map_err(value_error)
    }
}

/// One-shot planning run from JSON payloads
///
/// `config_json` holds a `PlannerConfig` (every key optional).
#[pyfunction]
pub fn run_plan_json(
    py: Python<'_>,
    config_json: &str,
    intervals_json: &str,
    staffing_json: &str,
    disciplines_json: &str,
) -> PyResult<String> {
    let config: PlannerConfig = serde_json::from_str(config_json).map_err(value_error)?;
    let planner = RustPlanner::new(config).map_err(value_error)?;
    let output = py.allow_threads(|| {
        run_from_json(&planner, intervals_json, staffing_json, disciplines_json)
    })?;
    serde_json::to_string(&output).map_err(value_error)
}

/// Erlang-C metrics for one interval
#[pyfunction]
#[pyo3(signature = (contacts, aht_seconds, agents, threshold_seconds=20.0, interval_seconds=3600))]
pub fn erlang_summary(
    py: Python<'_>,
    contacts: f64,
    aht_seconds: f64,
    agents: u32,
    threshold_seconds: f64,
    interval_seconds: u32,
) -> PyResult<Py<PyDict>> {
    let result = erlang_metrics(contacts, interval_seconds, aht_seconds, agents, threshold_seconds)
        .map_err(value_error)?;
    erlang_result_to_py(py, &result)
}

/// Minimum staffing for one interval
#[pyfunction]
#[pyo3(signature = (
    contacts,
    aht_seconds,
    target=0.8,
    threshold_seconds=20.0,
    shrinkage=0.3,
    interval_seconds=3600,
    discipline="real_time",
    productivity=1.0,
))]
#[allow(clippy::too_many_arguments)]
pub fn required_agents(
    py: Python<'_>,
    contacts: f64,
    aht_seconds: f64,
    target: f64,
    threshold_seconds: f64,
    shrinkage: f64,
    interval_seconds: u32,
    discipline: &str,
    productivity: f64,
) -> PyResult<Py<PyDict>> {
    let solver = SolverConfig::default();
    let result = if parse_discipline(discipline)?.is_realtime() {
        required_agents_realtime(
            contacts,
            interval_seconds,
            aht_seconds,
            threshold_seconds,
            target,
            shrinkage,
            &solver,
        )
    } else {
        required_agents_throughput(
            contacts,
            interval_seconds,
            aht_seconds,
            shrinkage,
            productivity,
            &solver,
        )
    }
    .map_err(value_error)?;
    staffing_result_to_py(py, &result)
}
