//! Planner configuration
//!
//! Every field has a default, so a configuration file only needs to name
//! what it changes:
//!
//! ```toml
//! interval_minutes = 30
//! horizon_days = 14
//!
//! [targets]
//! realtime = 0.9
//!
//! [[scenarios]]
//! id = "base"
//! name = "Baseline"
//! staffing_buffer = 0.08
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{IntervalLength, ParameterError};
use crate::forecast::ForecastConfig;
use crate::models::{default_catalog, validate_catalog, Scenario};
use crate::simulation::{ReferenceDefaults, ServiceTargets, SimulationConfig};
use crate::staffing::{ShrinkageClamp, SolverConfig};

use super::engine::PlanningError;

/// Complete planning-run configuration
///
/// # Fields
///
/// * `interval_minutes` - Interval length (15, 30, 60, 480, 720 or 1440)
/// * `horizon_days` - Days to forecast past the last observation
/// * `holdout_days` - Trailing days withheld for accuracy scoring
/// * `targets` - Service-level target per channel discipline
/// * `productivity` - Throughput-channel productivity factor
/// * `solver` - Agent ceiling and conversion shrinkage bounds
/// * `scenario_shrinkage` - Bounds for scenario-adjusted shrinkage
/// * `reference_defaults` - Metadata for series without history
/// * `scenarios` - Scenario catalog evaluated against the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub interval_minutes: u32,
    pub horizon_days: u32,
    pub holdout_days: u32,
    pub targets: ServiceTargets,
    pub productivity: f64,
    pub solver: SolverConfig,
    pub scenario_shrinkage: ShrinkageClamp,
    pub reference_defaults: ReferenceDefaults,
    pub scenarios: Vec<Scenario>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
            horizon_days: 28,
            holdout_days: 14,
            targets: ServiceTargets::default(),
            productivity: 1.0,
            solver: SolverConfig::default(),
            scenario_shrinkage: ShrinkageClamp::SCENARIO,
            reference_defaults: ReferenceDefaults::default(),
            scenarios: default_catalog(),
        }
    }
}

impl PlannerConfig {
    /// Parse from TOML; omitted fields keep their defaults
    ///
    /// # Example
    /// ```
    /// use wfm_planner_core_rs::PlannerConfig;
    ///
    /// let config = PlannerConfig::from_toml_str("interval_minutes = 30\n").unwrap();
    /// assert_eq!(config.interval_minutes, 30);
    /// assert_eq!(config.horizon_days, 28);
    /// assert_eq!(config.scenarios.len(), 7);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, PlanningError> {
        Ok(toml::from_str(source)?)
    }

    pub fn interval(&self) -> Result<IntervalLength, ParameterError> {
        IntervalLength::from_minutes(self.interval_minutes)
    }

    /// Check every parameter before any work is done
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.forecast_config()?.validate()?;
        self.targets.validate()?;
        if !(self.productivity > 0.0 && self.productivity.is_finite()) {
            return Err(ParameterError::NonPositive {
                name: "productivity",
                value: self.productivity,
            });
        }
        self.solver.validate()?;
        self.scenario_shrinkage.validate("scenario shrinkage")?;
        self.validate_reference_defaults()?;
        validate_catalog(&self.scenarios)
    }

    fn validate_reference_defaults(&self) -> Result<(), ParameterError> {
        let defaults = &self.reference_defaults;
        if !(defaults.aht_seconds > 0.0 && defaults.aht_seconds.is_finite()) {
            return Err(ParameterError::NonPositiveAht(defaults.aht_seconds));
        }
        if defaults.sla_threshold_seconds.is_nan() || defaults.sla_threshold_seconds < 0.0 {
            return Err(ParameterError::NegativeThreshold(
                defaults.sla_threshold_seconds,
            ));
        }
        if !(0.0..1.0).contains(&defaults.shrinkage_rate) {
            return Err(ParameterError::InvalidTarget {
                name: "default shrinkage rate",
                value: defaults.shrinkage_rate,
            });
        }
        if defaults.cost_per_hour.is_nan() || defaults.cost_per_hour < 0.0 {
            return Err(ParameterError::NonPositive {
                name: "default cost_per_hour",
                value: defaults.cost_per_hour,
            });
        }
        Ok(())
    }

    /// Forecaster settings (requires a valid interval)
    pub fn forecast_config(&self) -> Result<ForecastConfig, ParameterError> {
        Ok(ForecastConfig {
            interval: self.interval()?,
            horizon_days: self.horizon_days,
            holdout_days: self.holdout_days,
        })
    }

    /// Simulator settings (requires a valid interval)
    pub fn simulation_config(&self) -> Result<SimulationConfig, ParameterError> {
        Ok(SimulationConfig {
            interval: self.interval()?,
            targets: self.targets,
            solver: self.solver.clone(),
            scenario_shrinkage: self.scenario_shrinkage,
            productivity: self.productivity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unsupported_interval_rejected() {
        let config = PlannerConfig {
            interval_minutes: 45,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ParameterError::UnsupportedInterval { minutes: 45 })
        );
    }

    #[test]
    fn test_scenarios_replace_default_catalog() {
        let config = PlannerConfig::from_toml_str(
            r#"
            [[scenarios]]
            id = "surge"
            name = "Surge"
            demand_multiplier = 1.3
            "#,
        )
        .unwrap();
        assert_eq!(config.scenarios.len(), 1);
        assert_eq!(config.scenarios[0].demand_multiplier, 1.3);
        assert_eq!(config.scenarios[0].staffing_buffer, 0.0);
    }

    #[test]
    fn test_partial_solver_table_keeps_defaults() {
        let config = PlannerConfig::from_toml_str("[solver]\nmax_agents = 200\n").unwrap();
        assert_eq!(config.solver.max_agents, 200);
        assert_eq!(config.solver.shrinkage_clamp, ShrinkageClamp::CONVERSION);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            PlannerConfig::from_toml_str("interval_minutes = \"hourly\""),
            Err(PlanningError::Config(_))
        ));
    }
}
