//! Seasonal-trend series model
//!
//! A model is fit from one series' training intervals and then projected onto
//! arbitrary future timestamps:
//!
//! ```text
//! forecast(t) = profile[dow(t), bucket(t)]
//!             × projected_daily_total(t) / expected_daily_total[dow(t)]
//! ```
//!
//! The profile carries the intraday and weekly shape; the trend carries the
//! level.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::core::{day_of_week, IntervalLength};
use crate::models::IntervalRecord;

/// Days of history required before a slope is estimated
pub const MIN_TREND_DAYS: usize = 7;

/// Trailing window (days) averaged into `base_level`
const BASE_LEVEL_WINDOW: usize = 28;

/// Lower bound for normalizers that would otherwise divide by zero
const NORMALIZER_FLOOR: f64 = 1e-6;

/// Profile slot: (day of week with Monday = 0, intraday bucket)
pub type ProfileSlot = (u32, u32);

/// Fitted seasonal profile and linear trend for one series
///
/// Day indices run from `trend_origin`, so holdout and horizon projections
/// continue the fitted line instead of restarting it at day zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesModel {
    /// Median offered volume per (day_of_week, bucket)
    pub seasonal_profile: BTreeMap<ProfileSlot, f64>,

    /// Daily-total change per day
    pub trend_slope: f64,

    /// Daily total at the trend origin
    pub trend_intercept: f64,

    /// Mean daily total over the last four weeks of training
    pub base_level: f64,

    /// Calendar day with index 0 in the trend fit (`None` when untrained)
    pub trend_origin: Option<NaiveDate>,

    interval: IntervalLength,
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Ordinary least squares of `y` on `0, 1, 2, ...`; `(slope, intercept)`
fn fit_linear_trend(totals: &[f64]) -> (f64, f64) {
    let n = totals.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = totals.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in totals.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, y_mean - slope * x_mean)
}

/// Daily totals for every calendar day from the first to the last training day
///
/// Days without any interval count as zero volume.
fn daily_totals(training: &[&IntervalRecord]) -> Option<(NaiveDate, Vec<f64>)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in training {
        *by_day.entry(record.timestamp.date()).or_insert(0.0) += record.offered_count;
    }

    let first = *by_day.keys().next()?;
    let last = *by_day.keys().next_back()?;
    let totals = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| by_day.get(&day).copied().unwrap_or(0.0))
        .collect();
    Some((first, totals))
}

impl SeriesModel {
    /// Fit profile and trend from training intervals
    ///
    /// Fewer than [`MIN_TREND_DAYS`] days of history give a flat trend at the
    /// mean daily total.
    pub fn fit(training: &[&IntervalRecord], interval: IntervalLength) -> Self {
        let mut slots: BTreeMap<ProfileSlot, Vec<f64>> = BTreeMap::new();
        for record in training {
            let slot = (
                day_of_week(&record.timestamp),
                interval.bucket_of(&record.timestamp),
            );
            slots.entry(slot).or_default().push(record.offered_count);
        }
        let seasonal_profile = slots
            .into_iter()
            .map(|(slot, mut volumes)| (slot, median(&mut volumes)))
            .collect();

        let (trend_origin, trend_slope, trend_intercept, base_level) =
            match daily_totals(training) {
                Some((origin, totals)) => {
                    let (slope, intercept) = if totals.len() >= MIN_TREND_DAYS {
                        fit_linear_trend(&totals)
                    } else {
                        (0.0, totals.iter().sum::<f64>() / totals.len() as f64)
                    };
                    let recent = &totals[totals.len().saturating_sub(BASE_LEVEL_WINDOW)..];
                    let base = recent.iter().sum::<f64>() / recent.len() as f64;
                    (Some(origin), slope, intercept, base.max(NORMALIZER_FLOOR))
                }
                None => (None, 0.0, 0.0, 1.0),
            };

        Self {
            seasonal_profile,
            trend_slope,
            trend_intercept,
            base_level,
            trend_origin,
            interval,
        }
    }

    /// Sum of profile volumes for one weekday (1.0 when the weekday is absent)
    pub fn expected_daily_total(&self, dow: u32) -> f64 {
        let mut slots = self
            .seasonal_profile
            .range((dow, 0)..=(dow, u32::MAX))
            .peekable();
        if slots.peek().is_none() {
            return 1.0;
        }
        slots.map(|(_, volume)| volume).sum::<f64>().max(NORMALIZER_FLOOR)
    }

    /// Trend daily total on the given day, floored at zero
    pub fn projected_daily_total(&self, day: NaiveDate) -> f64 {
        let index = match self.trend_origin {
            Some(origin) => (day - origin).num_days() as f64,
            None => 0.0,
        };
        (self.trend_intercept + self.trend_slope * index).max(0.0)
    }

    /// Forecast offered volume for the interval starting at `timestamp`
    ///
    /// Slots never seen in training forecast zero.
    pub fn project(&self, timestamp: &NaiveDateTime) -> f64 {
        let dow = day_of_week(timestamp);
        let slot = (dow, self.interval.bucket_of(timestamp));
        let Some(&profile) = self.seasonal_profile.get(&slot) else {
            return 0.0;
        };
        profile * self.projected_daily_total(timestamp.date()) / self.expected_daily_total(dow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_linear_trend_exact_line() {
        let totals: Vec<f64> = (0..10).map(|d| 100.0 + 5.0 * d as f64).collect();
        let (slope, intercept) = fit_linear_trend(&totals);
        assert!((slope - 5.0).abs() < 1e-9);
        assert!((intercept - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_has_flat_trend() {
        let (slope, intercept) = fit_linear_trend(&[42.0]);
        assert_eq!(slope, 0.0);
        assert_eq!(intercept, 42.0);
    }
}
