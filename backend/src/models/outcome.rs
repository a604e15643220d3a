//! Scenario outcome record
//!
//! One row per (scenario, forecast interval). Both the required pass and the
//! planned pass are kept: the first answers how many agents a perfect
//! scheduler would need, the second what service the buffered, rounded
//! schedule actually delivers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::series::ChannelDiscipline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcomeRecord {
    pub scenario_id: String,
    pub scenario_name: String,
    pub timestamp: NaiveDateTime,
    pub channel: String,
    pub queue: String,
    pub discipline: ChannelDiscipline,
    /// Interval length in minutes
    pub interval_length: u32,

    /// Forecast volume after the demand multiplier
    pub forecast_offered: f64,
    pub scenario_shrinkage: f64,
    pub scenario_cost_per_hour: f64,
    /// Service-level target for this channel's discipline
    pub service_target: f64,

    // Required pass
    pub required_agents_available: u32,
    pub required_agents_scheduled: u32,
    /// `false` when the solver hit its ceiling without meeting the target
    pub required_target_met: bool,
    pub required_service_level: f64,
    /// `None` for throughput channels
    pub required_asa_seconds: Option<f64>,

    // Planned pass
    pub planned_agents_scheduled: u32,
    pub planned_agents_available: u32,
    pub achieved_service_level: f64,
    /// `None` for throughput channels; may be +∞ for a saturated queue
    pub achieved_asa_seconds: Option<f64>,
    pub planned_labor_cost: f64,

    /// planned − required scheduled agents (positive = overstaffed)
    pub staffing_gap: i64,

    /// Reference metadata was missing and defaults were used
    pub reference_fallback: bool,
}
