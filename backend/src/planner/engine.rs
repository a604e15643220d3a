//! Planner Engine
//!
//! Runs a complete planning pass over one interval length:
//!
//! ```text
//! 1. Validate configuration (abort on any invalid parameter)
//! 2. Check every input row uses the configured interval length
//! 3. Forecast each series (parallel per series)
//! 4. Build reference metadata (fallback defaults for unknown series)
//! 5. Simulate the scenario catalog (parallel per scenario)
//! 6. Roll outcomes up into daily KPIs
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use wfm_planner_core_rs::{Planner, PlannerConfig};
//!
//! let planner = Planner::new(PlannerConfig::default()).unwrap();
//! let output = planner.run(&[], &[], &HashMap::new()).unwrap();
//! assert!(output.forecasts.is_empty());
//! assert_eq!(output.config_hash.len(), 64);
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{IntervalLength, ParameterError};
use crate::forecast::{forecast_all, ForecastRun, ModelQuality};
use crate::models::{
    ChannelDiscipline, ForecastRecord, IntervalRecord, ScenarioOutcomeRecord, SeriesKey,
    StaffingRecord,
};
use crate::simulation::{simulate, summarize, KpiSummaryRow, ReferenceTable};

use super::config::PlannerConfig;
use super::fingerprint::compute_config_hash;

/// Errors that abort a planning run
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("Invalid parameter: {0}")]
    Parameter(#[from] ParameterError),

    #[error("{kind} record for {series} at {timestamp} has interval length {found} min, expected {expected} min")]
    IntervalMismatch {
        kind: &'static str,
        series: SeriesKey,
        timestamp: NaiveDateTime,
        expected: u32,
        found: u32,
    },

    #[error("Invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Plan was produced with config {found}, expected {expected}")]
    ConfigMismatch { expected: String, found: String },
}

/// Everything a planning run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutput {
    pub run_id: Uuid,
    /// SHA-256 of the canonical configuration
    pub config_hash: String,
    pub interval_minutes: u32,
    pub forecasts: Vec<ForecastRecord>,
    pub quality: Vec<ModelQuality>,
    pub outcomes: Vec<ScenarioOutcomeRecord>,
    pub kpis: Vec<KpiSummaryRow>,
    /// Outcome rows where the solver returned its ceiling
    pub unmet_target_intervals: usize,
    /// Forecast series simulated with fallback reference metadata
    pub fallback_series: Vec<SeriesKey>,
}

impl PlanOutput {
    /// Confirm this output was produced by `config`
    pub fn verify_config(&self, config: &PlannerConfig) -> Result<(), PlanningError> {
        let expected = compute_config_hash(config)?;
        if expected != self.config_hash {
            return Err(PlanningError::ConfigMismatch {
                expected,
                found: self.config_hash.clone(),
            });
        }
        Ok(())
    }
}

/// Validated planner ready to run
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    interval: IntervalLength,
    config_hash: String,
}

impl Planner {
    /// Create a planner from configuration
    ///
    /// # Errors
    /// * `Parameter` - any configuration value is invalid
    pub fn new(config: PlannerConfig) -> Result<Self, PlanningError> {
        config.validate()?;
        let interval = config.interval()?;
        let config_hash = compute_config_hash(&config)?;
        Ok(Self {
            config,
            interval,
            config_hash,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn interval(&self) -> IntervalLength {
        self.interval
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    fn check_interval(
        &self,
        kind: &'static str,
        rows: impl Iterator<Item = (SeriesKey, NaiveDateTime, u32)>,
    ) -> Result<(), PlanningError> {
        let expected = self.interval.minutes();
        for (series, timestamp, found) in rows {
            if found != expected {
                return Err(PlanningError::IntervalMismatch {
                    kind,
                    series,
                    timestamp,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Forecast every series in `history`
    pub fn forecast(&self, history: &[IntervalRecord]) -> Result<ForecastRun, PlanningError> {
        self.check_interval(
            "interval",
            history
                .iter()
                .map(|r| (r.series_key(), r.timestamp, r.interval_length)),
        )?;
        Ok(forecast_all(history, &self.config.forecast_config()?))
    }

    /// Simulate the configured scenario catalog against `forecasts`
    pub fn simulate(
        &self,
        forecasts: &[ForecastRecord],
        references: &ReferenceTable,
    ) -> Result<Vec<ScenarioOutcomeRecord>, PlanningError> {
        Ok(simulate(
            forecasts,
            &self.config.scenarios,
            references,
            &self.config.simulation_config()?,
        )?)
    }

    /// Reference metadata from historical records
    pub fn references(
        &self,
        history: &[IntervalRecord],
        staffing: &[StaffingRecord],
        disciplines: &HashMap<SeriesKey, ChannelDiscipline>,
    ) -> ReferenceTable {
        ReferenceTable::build(
            history,
            staffing,
            disciplines,
            self.config.reference_defaults.clone(),
        )
    }

    /// Run forecasting, simulation and KPI roll-up end to end
    ///
    /// # Errors
    /// * `IntervalMismatch` - an input row has a different interval length
    /// * `Parameter` - a solver parameter is invalid
    pub fn run(
        &self,
        history: &[IntervalRecord],
        staffing: &[StaffingRecord],
        disciplines: &HashMap<SeriesKey, ChannelDiscipline>,
    ) -> Result<PlanOutput, PlanningError> {
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            interval_minutes = self.interval.minutes(),
            intervals = history.len(),
            staffing = staffing.len(),
            scenarios = self.config.scenarios.len(),
            "starting planning run"
        );

        self.check_interval(
            "staffing",
            staffing
                .iter()
                .map(|r| (r.series_key(), r.timestamp, r.interval_length)),
        )?;
        let forecast_run = self.forecast(history)?;
        info!(
            series = forecast_run.models.len(),
            forecasts = forecast_run.forecasts.len(),
            scored = forecast_run.quality.len(),
            "forecasting complete"
        );

        let references = self.references(history, staffing, disciplines);
        debug!(series = references.len(), "reference metadata built");
        let outcomes = self.simulate(&forecast_run.forecasts, &references)?;
        let kpis = summarize(&outcomes);

        let unmet_target_intervals = outcomes.iter().filter(|o| !o.required_target_met).count();
        let fallback_series: Vec<SeriesKey> = forecast_run
            .models
            .keys()
            .filter(|key| references.resolve(key).fallback)
            .cloned()
            .collect();

        info!(
            %run_id,
            outcomes = outcomes.len(),
            kpi_rows = kpis.len(),
            unmet_target_intervals,
            fallback_series = fallback_series.len(),
            "planning run complete"
        );

        Ok(PlanOutput {
            run_id,
            config_hash: self.config_hash.clone(),
            interval_minutes: self.interval.minutes(),
            forecasts: forecast_run.forecasts,
            quality: forecast_run.quality,
            outcomes,
            kpis,
            unmet_target_intervals,
            fallback_series,
        })
    }
}
