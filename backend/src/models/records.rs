//! Interval-level input and output records
//!
//! IntervalRecord and StaffingRecord are produced by the ingestion stage and
//! are read-only here. ForecastRecord is produced by the forecaster and never
//! mutated afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::series::SeriesKey;

/// Aggregated contact demand and service outcome for one interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    /// Interval start
    pub timestamp: NaiveDateTime,
    /// Interval length in minutes
    pub interval_length: u32,
    pub channel: String,
    pub queue: String,
    pub offered_count: f64,
    pub handled_count: f64,
    pub abandoned_count: f64,
    /// Average handle time (seconds)
    pub average_handle_time: f64,
    /// Average speed of answer (seconds)
    pub average_speed_of_answer: f64,
    pub service_level: f64,
    /// Service level threshold (seconds)
    pub sla_threshold: f64,
}

impl IntervalRecord {
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(self.channel.clone(), self.queue.clone())
    }
}

/// Staffing snapshot for one interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingRecord {
    pub timestamp: NaiveDateTime,
    /// Interval length in minutes
    pub interval_length: u32,
    pub channel: String,
    pub queue: String,
    pub agents_scheduled: u32,
    pub shrinkage_rate: f64,
    pub agents_available: u32,
    pub cost_per_hour: f64,
}

impl StaffingRecord {
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(self.channel.clone(), self.queue.clone())
    }

    /// Whether `agents_available == floor(agents_scheduled × (1 − shrinkage_rate))`
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use wfm_planner_core_rs::StaffingRecord;
    ///
    /// let record = StaffingRecord {
    ///     timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
    ///     interval_length: 60,
    ///     channel: "voice".to_string(),
    ///     queue: "billing".to_string(),
    ///     agents_scheduled: 10,
    ///     shrinkage_rate: 0.3,
    ///     agents_available: 7,
    ///     cost_per_hour: 24.0,
    /// };
    /// assert!(record.is_consistent());
    /// ```
    pub fn is_consistent(&self) -> bool {
        let expected = crate::staffing::apply_shrinkage(self.agents_scheduled, self.shrinkage_rate);
        expected == self.agents_available
    }
}

/// Projected offered volume for one future interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: NaiveDateTime,
    pub channel: String,
    pub queue: String,
    pub forecast_offered: f64,
    /// Interval length in minutes
    pub interval_length: u32,
}

impl ForecastRecord {
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(self.channel.clone(), self.queue.clone())
    }
}
