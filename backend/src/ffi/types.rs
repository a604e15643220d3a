//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::models::Scenario;
use crate::planner::PlannerConfig;
use crate::queueing::ErlangResult;
use crate::simulation::{ReferenceDefaults, ServiceTargets};
use crate::staffing::{ShrinkageClamp, SolverConfig, StaffingResult};
use crate::ChannelDiscipline;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing, or the conversion error
/// if the value has the wrong type.
fn extract_required<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract a field with a default value if missing.
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

fn sub_dict<'py>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<Bound<'py, PyDict>>> {
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.downcast_into()?)),
        None => Ok(None),
    }
}

/// Map any displayable error to a Python ValueError
pub fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to PlannerConfig
///
/// Every key is optional and falls back to the planner default. Validation
/// happens when the planner is built, not here.
///
/// ```python
/// config = {
///     "interval_minutes": 30,
///     "horizon_days": 14,
///     "targets": {"realtime": 0.9},
///     "scenarios": [{"id": "surge", "name": "Surge", "demand_multiplier": 1.3}],
/// }
/// ```
pub fn parse_planner_config(py_config: &Bound<'_, PyDict>) -> PyResult<PlannerConfig> {
    let defaults = PlannerConfig::default();

    let targets = match sub_dict(py_config, "targets")? {
        Some(py_targets) => ServiceTargets {
            realtime: extract_with_default(&py_targets, "realtime", defaults.targets.realtime)?,
            throughput: extract_with_default(
                &py_targets,
                "throughput",
                defaults.targets.throughput,
            )?,
        },
        None => defaults.targets,
    };

    let solver = match sub_dict(py_config, "solver")? {
        Some(py_solver) => SolverConfig {
            max_agents: extract_with_default(
                &py_solver,
                "max_agents",
                defaults.solver.max_agents,
            )?,
            shrinkage_clamp: match sub_dict(&py_solver, "shrinkage_clamp")? {
                Some(py_clamp) => parse_clamp(&py_clamp, ShrinkageClamp::CONVERSION)?,
                None => ShrinkageClamp::CONVERSION,
            },
        },
        None => defaults.solver.clone(),
    };

    let scenario_shrinkage = match sub_dict(py_config, "scenario_shrinkage")? {
        Some(py_clamp) => parse_clamp(&py_clamp, ShrinkageClamp::SCENARIO)?,
        None => defaults.scenario_shrinkage,
    };

    let reference_defaults = match sub_dict(py_config, "reference_defaults")? {
        Some(py_refs) => parse_reference_defaults(&py_refs)?,
        None => defaults.reference_defaults.clone(),
    };

    let scenarios = match py_config.get_item("scenarios")? {
        Some(py_scenarios) => {
            let list: Bound<'_, PyList> = py_scenarios.downcast_into()?;
            let mut scenarios = Vec::with_capacity(list.len());
            for item in list.iter() {
                let scenario_dict: Bound<'_, PyDict> = item.downcast_into()?;
                scenarios.push(parse_scenario(&scenario_dict)?);
            }
            scenarios
        }
        None => defaults.scenarios.clone(),
    };

    Ok(PlannerConfig {
        interval_minutes: extract_with_default(
            py_config,
            "interval_minutes",
            defaults.interval_minutes,
        )?,
        horizon_days: extract_with_default(py_config, "horizon_days", defaults.horizon_days)?,
        holdout_days: extract_with_default(py_config, "holdout_days", defaults.holdout_days)?,
        targets,
        productivity: extract_with_default(py_config, "productivity", defaults.productivity)?,
        solver,
        scenario_shrinkage,
        reference_defaults,
        scenarios,
    })
}

fn parse_clamp(py_clamp: &Bound<'_, PyDict>, default: ShrinkageClamp) -> PyResult<ShrinkageClamp> {
    Ok(ShrinkageClamp {
        lower: extract_with_default(py_clamp, "lower", default.lower)?,
        upper: extract_with_default(py_clamp, "upper", default.upper)?,
    })
}

fn parse_reference_defaults(py_refs: &Bound<'_, PyDict>) -> PyResult<ReferenceDefaults> {
    let defaults = ReferenceDefaults::default();
    let discipline = match py_refs.get_item("discipline")? {
        Some(value) => parse_discipline(&value.extract::<String>()?)?,
        None => defaults.discipline,
    };
    Ok(ReferenceDefaults {
        shrinkage_rate: extract_with_default(py_refs, "shrinkage_rate", defaults.shrinkage_rate)?,
        cost_per_hour: extract_with_default(py_refs, "cost_per_hour", defaults.cost_per_hour)?,
        aht_seconds: extract_with_default(py_refs, "aht_seconds", defaults.aht_seconds)?,
        sla_threshold_seconds: extract_with_default(
            py_refs,
            "sla_threshold_seconds",
            defaults.sla_threshold_seconds,
        )?,
        discipline,
    })
}

/// Accepts the serialized names plus a few common spellings
pub fn parse_discipline(value: &str) -> PyResult<ChannelDiscipline> {
    match value {
        "real_time" | "realtime" | "RealTime" => Ok(ChannelDiscipline::RealTime),
        "throughput" | "Throughput" => Ok(ChannelDiscipline::Throughput),
        other => Err(PyValueError::new_err(format!(
            "Invalid discipline: '{}'. Must be 'real_time' or 'throughput'",
            other
        ))),
    }
}

fn parse_scenario(py_scenario: &Bound<'_, PyDict>) -> PyResult<Scenario> {
    let id: String = extract_required(py_scenario, "id")?;
    let name: String = extract_with_default(py_scenario, "name", id.clone())?;
    Ok(Scenario::new(id, name)
        .with_demand_multiplier(extract_with_default(py_scenario, "demand_multiplier", 1.0)?)
        .with_shrinkage_delta(extract_with_default(py_scenario, "shrinkage_delta", 0.0)?)
        .with_wage_multiplier(extract_with_default(py_scenario, "wage_multiplier", 1.0)?)
        .with_staffing_buffer(extract_with_default(py_scenario, "staffing_buffer", 0.0)?))
}

// ========================================================================
// Result Converters
// ========================================================================

pub fn erlang_result_to_py(py: Python<'_>, result: &ErlangResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("traffic_erlangs", result.traffic_erlangs)?;
    dict.set_item("agents", result.agents)?;
    dict.set_item("prob_wait", result.prob_wait)?;
    dict.set_item("asa_seconds", result.asa_seconds)?;
    dict.set_item("service_level", result.service_level)?;
    Ok(dict.unbind())
}

pub fn staffing_result_to_py(py: Python<'_>, result: &StaffingResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("available_agents", result.available_agents)?;
    dict.set_item("scheduled_agents", result.scheduled_agents)?;
    dict.set_item("target_met", result.target_met)?;
    Ok(dict.unbind())
}
