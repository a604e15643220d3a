//! Seasonal-Trend Forecaster
//!
//! Fits one [`SeriesModel`] per (channel, queue) series on a training window,
//! scores it on the trailing holdout window and projects interval-level
//! demand over the forecast horizon.
//!
//! # Key Principles
//!
//! 1. **Series independence**: each series is fit and projected on its own,
//!    so series fan out across the rayon pool.
//! 2. **Robust shape**: the seasonal profile uses the median, not the mean.
//! 3. **Explicit model ownership**: fitted models are returned keyed by
//!    series, never kept as hidden state.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use wfm_planner_core_rs::forecast::{forecast_all, ForecastConfig};
//! use wfm_planner_core_rs::{IntervalLength, IntervalRecord};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let history: Vec<IntervalRecord> = (0..21 * 24)
//!     .map(|h| IntervalRecord {
//!         timestamp: start + Duration::hours(h),
//!         interval_length: 60,
//!         channel: "voice".to_string(),
//!         queue: "billing".to_string(),
//!         offered_count: 10.0,
//!         handled_count: 10.0,
//!         abandoned_count: 0.0,
//!         average_handle_time: 300.0,
//!         average_speed_of_answer: 12.0,
//!         service_level: 0.85,
//!         sla_threshold: 20.0,
//!     })
//!     .collect();
//!
//! let config = ForecastConfig {
//!     interval: IntervalLength::from_minutes(60).unwrap(),
//!     horizon_days: 7,
//!     holdout_days: 7,
//! };
//! let run = forecast_all(&history, &config);
//! assert_eq!(run.forecasts.len(), 7 * 24);
//! assert!((run.forecasts[0].forecast_offered - 10.0).abs() < 1e-9);
//! ```

pub mod model;
pub mod quality;

pub use model::{SeriesModel, MIN_TREND_DAYS};
pub use quality::{accuracy, ModelQuality};

use chrono::Duration;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::{IntervalLength, ParameterError};
use crate::models::{ForecastRecord, IntervalRecord, SeriesKey};

/// Forecasting window configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub interval: IntervalLength,
    /// Days projected past the last observed interval
    pub horizon_days: u32,
    /// Trailing days withheld from training and used for scoring
    pub holdout_days: u32,
}

/// Longest accepted horizon or holdout window (about a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.horizon_days == 0 {
            return Err(ParameterError::NonPositive {
                name: "horizon_days",
                value: 0.0,
            });
        }
        for (name, value) in [
            ("horizon_days", self.horizon_days),
            ("holdout_days", self.holdout_days),
        ] {
            if value > MAX_WINDOW_DAYS {
                return Err(ParameterError::OutOfRange {
                    name,
                    value,
                    max: MAX_WINDOW_DAYS,
                });
            }
        }
        Ok(())
    }
}

/// Everything produced for one series
#[derive(Debug, Clone)]
pub struct SeriesForecast {
    pub key: SeriesKey,
    pub model: SeriesModel,
    pub forecasts: Vec<ForecastRecord>,
    /// `None` when the holdout window is empty
    pub quality: Option<ModelQuality>,
}

/// Output of a forecasting run over all series
#[derive(Debug, Clone, Default)]
pub struct ForecastRun {
    pub models: BTreeMap<SeriesKey, SeriesModel>,
    /// Ordered by series, then timestamp
    pub forecasts: Vec<ForecastRecord>,
    pub quality: Vec<ModelQuality>,
}

/// Group interval records by series, each group sorted by timestamp
pub fn group_by_series(records: &[IntervalRecord]) -> BTreeMap<SeriesKey, Vec<&IntervalRecord>> {
    let mut groups: BTreeMap<SeriesKey, Vec<&IntervalRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.series_key()).or_default().push(record);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|record| record.timestamp);
    }
    groups
}

/// Fit, score and project one series
///
/// `history` must be sorted by timestamp and belong to `key`.
pub fn forecast_series(
    key: &SeriesKey,
    history: &[&IntervalRecord],
    config: &ForecastConfig,
) -> SeriesForecast {
    let Some(last) = history.last().map(|record| record.timestamp) else {
        return SeriesForecast {
            key: key.clone(),
            model: SeriesModel::fit(&[], config.interval),
            forecasts: Vec::new(),
            quality: None,
        };
    };

    // A cutoff before the calendar's start withholds the whole history
    let split = match last.checked_sub_signed(Duration::days(i64::from(config.holdout_days))) {
        Some(cutoff) => history.partition_point(|record| record.timestamp <= cutoff),
        None => 0,
    };
    let (training, holdout) = history.split_at(split);

    let model = SeriesModel::fit(training, config.interval);

    let quality = if holdout.is_empty() {
        None
    } else {
        let actual: Vec<f64> = holdout.iter().map(|record| record.offered_count).collect();
        let predicted: Vec<f64> = holdout
            .iter()
            .map(|record| model.project(&record.timestamp))
            .collect();
        accuracy(&actual, &predicted).map(|(mape, rmse)| ModelQuality {
            channel: key.channel.clone(),
            queue: key.queue.clone(),
            mape,
            rmse,
            holdout_days: config.holdout_days,
        })
    };

    let step_minutes = config.interval.step().num_minutes();
    // Stops early if the horizon runs off the end of the calendar
    let forecasts = (1..=config.interval.intervals_in_days(config.horizon_days))
        .map_while(|i| {
            let offset = i64::try_from(i).ok()?.checked_mul(step_minutes)?;
            let timestamp = last.checked_add_signed(Duration::try_minutes(offset)?)?;
            Some(ForecastRecord {
                timestamp,
                channel: key.channel.clone(),
                queue: key.queue.clone(),
                forecast_offered: model.project(&timestamp),
                interval_length: config.interval.minutes(),
            })
        })
        .collect();

    debug!(
        series = %key,
        training = training.len(),
        holdout = holdout.len(),
        slope = model.trend_slope,
        intercept = model.trend_intercept,
        "fitted series model"
    );

    SeriesForecast {
        key: key.clone(),
        model,
        forecasts,
        quality,
    }
}

/// Forecast every series in `history`
///
/// Series are processed in parallel; output order is deterministic (series
/// key, then timestamp).
pub fn forecast_all(history: &[IntervalRecord], config: &ForecastConfig) -> ForecastRun {
    let groups: Vec<(SeriesKey, Vec<&IntervalRecord>)> =
        group_by_series(history).into_iter().collect();

    let per_series: Vec<SeriesForecast> = groups
        .par_iter()
        .map(|(key, records)| forecast_series(key, records, config))
        .collect();

    let mut run = ForecastRun::default();
    for series in per_series {
        run.forecasts.extend(series.forecasts);
        run.quality.extend(series.quality);
        run.models.insert(series.key, series.model);
    }
    run
}
