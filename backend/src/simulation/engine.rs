//! Scenario Simulator engine
//!
//! Evaluates every forecast interval under every scenario in two passes:
//!
//! ```text
//! For each (scenario, forecast interval):
//! 1. Resolve reference metadata (fallback defaults when missing)
//! 2. Apply levers: demand × multiplier, shrinkage + delta (clamped), cost × wage
//! 3. Required pass: solver → required scheduled agents (+ diagnostic SL/ASA)
//! 4. Planned pass: ceil(required × (1 + buffer)) scheduled,
//!    floor(planned × (1 − shrinkage)) available → achieved SL/ASA, labor cost
//! 5. Staffing gap = planned − required
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::core::{IntervalLength, ParameterError};
use crate::models::{ChannelDiscipline, ForecastRecord, Scenario, ScenarioOutcomeRecord};
use crate::queueing::erlang_metrics;
use crate::staffing::{
    ceil_agents, floor_agents, required_agents_realtime, required_agents_throughput,
    throughput_service_level, ShrinkageClamp, SolverConfig,
};

use super::reference::{ReferenceTable, SeriesReference};

/// Handle time and threshold never drop below one second in simulation
const MIN_SECONDS: f64 = 1.0;

/// Service-level target per channel discipline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceTargets {
    /// Share of contacts answered within the threshold
    pub realtime: f64,
    /// Share of demand the capacity can work within the interval
    pub throughput: f64,
}

impl Default for ServiceTargets {
    fn default() -> Self {
        Self {
            realtime: 0.80,
            throughput: 1.0,
        }
    }
}

impl ServiceTargets {
    pub fn for_discipline(&self, discipline: ChannelDiscipline) -> f64 {
        match discipline {
            ChannelDiscipline::RealTime => self.realtime,
            ChannelDiscipline::Throughput => self.throughput,
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("realtime service target", self.realtime),
            ("throughput service target", self.throughput),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParameterError::InvalidTarget { name, value });
            }
        }
        Ok(())
    }
}

/// Simulation parameters shared by every scenario
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub interval: IntervalLength,
    pub targets: ServiceTargets,
    pub solver: SolverConfig,
    /// Bounds for base shrinkage + scenario delta
    pub scenario_shrinkage: ShrinkageClamp,
    /// Contacts worked per agent-interval relative to AHT (throughput only)
    pub productivity: f64,
}

impl SimulationConfig {
    pub fn new(interval: IntervalLength) -> Self {
        Self {
            interval,
            targets: ServiceTargets::default(),
            solver: SolverConfig::default(),
            scenario_shrinkage: ShrinkageClamp::SCENARIO,
            productivity: 1.0,
        }
    }
}

/// Service outcome at a given available-agent count
struct ServiceOutcome {
    service_level: f64,
    asa_seconds: Option<f64>,
}

/// Scenario-adjusted inputs for one interval
struct AdjustedInterval<'a> {
    reference: &'a SeriesReference,
    offered: f64,
    shrinkage: f64,
    cost_per_hour: f64,
    aht_seconds: f64,
    threshold_seconds: f64,
}

impl AdjustedInterval<'_> {
    fn service_at(
        &self,
        available: u32,
        config: &SimulationConfig,
    ) -> Result<ServiceOutcome, ParameterError> {
        let interval_seconds = config.interval.seconds();
        match self.reference.discipline {
            ChannelDiscipline::RealTime => {
                let metrics = erlang_metrics(
                    self.offered,
                    interval_seconds,
                    self.aht_seconds,
                    available,
                    self.threshold_seconds,
                )?;
                Ok(ServiceOutcome {
                    service_level: metrics.service_level,
                    asa_seconds: Some(metrics.asa_seconds),
                })
            }
            ChannelDiscipline::Throughput => Ok(ServiceOutcome {
                service_level: throughput_service_level(
                    available,
                    self.offered,
                    interval_seconds,
                    self.aht_seconds,
                ),
                asa_seconds: None,
            }),
        }
    }
}

/// Evaluate one forecast interval under one scenario
///
/// # Errors
/// Only parameter errors from the solver (e.g. an out-of-range target).
pub fn simulate_interval(
    forecast: &ForecastRecord,
    scenario: &Scenario,
    reference: &SeriesReference,
    config: &SimulationConfig,
) -> Result<ScenarioOutcomeRecord, ParameterError> {
    let adjusted = AdjustedInterval {
        reference,
        offered: (forecast.forecast_offered * scenario.demand_multiplier).max(0.0),
        shrinkage: config
            .scenario_shrinkage
            .apply(reference.shrinkage_rate + scenario.shrinkage_delta),
        cost_per_hour: reference.cost_per_hour * scenario.wage_multiplier,
        aht_seconds: reference.aht_seconds.max(MIN_SECONDS),
        threshold_seconds: reference.sla_threshold_seconds.max(MIN_SECONDS),
    };
    let interval_seconds = config.interval.seconds();
    let discipline = reference.discipline;

    // Required pass
    let required = match discipline {
        ChannelDiscipline::RealTime => required_agents_realtime(
            adjusted.offered,
            interval_seconds,
            adjusted.aht_seconds,
            adjusted.threshold_seconds,
            config.targets.realtime,
            adjusted.shrinkage,
            &config.solver,
        )?,
        ChannelDiscipline::Throughput => required_agents_throughput(
            adjusted.offered,
            interval_seconds,
            adjusted.aht_seconds,
            adjusted.shrinkage,
            config.productivity,
            &config.solver,
        )?,
    };
    let required_service = adjusted.service_at(required.available_agents, config)?;

    // Planned pass
    let planned_scheduled =
        ceil_agents(required.scheduled_agents as f64 * (1.0 + scenario.staffing_buffer));
    let planned_available = floor_agents(planned_scheduled as f64 * (1.0 - adjusted.shrinkage));
    let planned_service = adjusted.service_at(planned_available, config)?;

    Ok(ScenarioOutcomeRecord {
        scenario_id: scenario.id.clone(),
        scenario_name: scenario.name.clone(),
        timestamp: forecast.timestamp,
        channel: forecast.channel.clone(),
        queue: forecast.queue.clone(),
        discipline,
        interval_length: forecast.interval_length,
        forecast_offered: adjusted.offered,
        scenario_shrinkage: adjusted.shrinkage,
        scenario_cost_per_hour: adjusted.cost_per_hour,
        service_target: config.targets.for_discipline(discipline),
        required_agents_available: required.available_agents,
        required_agents_scheduled: required.scheduled_agents,
        required_target_met: required.target_met,
        required_service_level: required_service.service_level,
        required_asa_seconds: required_service.asa_seconds,
        planned_agents_scheduled: planned_scheduled,
        planned_agents_available: planned_available,
        achieved_service_level: planned_service.service_level,
        achieved_asa_seconds: planned_service.asa_seconds,
        planned_labor_cost: planned_scheduled as f64
            * adjusted.cost_per_hour
            * config.interval.hours(),
        staffing_gap: planned_scheduled as i64 - required.scheduled_agents as i64,
        reference_fallback: reference.fallback,
    })
}

/// Evaluate the full (scenario × forecast) cross product
///
/// Scenarios run in parallel over the shared, read-only forecast and
/// reference data. Output is grouped by scenario in catalog order, then in
/// forecast order.
pub fn simulate(
    forecasts: &[ForecastRecord],
    catalog: &[Scenario],
    references: &ReferenceTable,
    config: &SimulationConfig,
) -> Result<Vec<ScenarioOutcomeRecord>, ParameterError> {
    let missing: BTreeSet<_> = forecasts
        .iter()
        .map(ForecastRecord::series_key)
        .filter(|key| references.resolve(key).fallback)
        .collect();
    for key in &missing {
        warn!(series = %key, "reference metadata missing or incomplete, using defaults");
    }

    let per_scenario: Vec<Vec<ScenarioOutcomeRecord>> = catalog
        .par_iter()
        .map(|scenario| {
            forecasts
                .iter()
                .map(|forecast| {
                    let reference = references.resolve(&forecast.series_key());
                    simulate_interval(forecast, scenario, reference, config)
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<_, _>>()?;

    let outcomes: Vec<ScenarioOutcomeRecord> = per_scenario.into_iter().flatten().collect();

    let unmet = outcomes.iter().filter(|o| !o.required_target_met).count();
    if unmet > 0 {
        warn!(
            intervals = unmet,
            ceiling = config.solver.max_agents,
            "service target not reachable within the agent ceiling"
        );
    }
    info!(
        scenarios = catalog.len(),
        intervals = forecasts.len(),
        rows = outcomes.len(),
        "scenario simulation complete"
    );

    Ok(outcomes)
}
