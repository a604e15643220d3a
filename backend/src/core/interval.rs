//! Interval discretization
//!
//! A planning run works on fixed-length intervals that tile a calendar day.
//! This module maps timestamps onto intraday buckets and validates that the
//! configured interval length is one of the supported subdivisions.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::error::ParameterError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Validated interval length
///
/// # Example
/// ```
/// use wfm_planner_core_rs::IntervalLength;
///
/// let interval = IntervalLength::from_minutes(30).unwrap();
/// assert_eq!(interval.seconds(), 1800);
/// assert_eq!(interval.buckets_per_day(), 48);
///
/// assert!(IntervalLength::from_minutes(45).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IntervalLength {
    minutes: u32,
}

impl IntervalLength {
    /// Interval lengths a run may be configured with
    pub const SUPPORTED_MINUTES: [u32; 6] = [15, 30, 60, 480, 720, 1440];

    /// Create an interval length from minutes
    ///
    /// # Errors
    /// * `NonPositiveInterval` - `minutes` is zero
    /// * `UnsupportedInterval` - not one of [`Self::SUPPORTED_MINUTES`]
    pub fn from_minutes(minutes: u32) -> Result<Self, ParameterError> {
        if minutes == 0 {
            return Err(ParameterError::NonPositiveInterval);
        }
        if !Self::SUPPORTED_MINUTES.contains(&minutes) {
            return Err(ParameterError::UnsupportedInterval { minutes });
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.minutes * 60
    }

    /// Interval length in hours (used for labor cost)
    pub fn hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }

    /// Number of intervals that tile one day
    pub fn buckets_per_day(&self) -> u32 {
        MINUTES_PER_DAY / self.minutes
    }

    /// Intraday bucket index of a timestamp (0-indexed)
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use wfm_planner_core_rs::IntervalLength;
    ///
    /// let interval = IntervalLength::from_minutes(15).unwrap();
    /// let ts = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(9, 40, 0).unwrap();
    /// assert_eq!(interval.bucket_of(&ts), 38);
    /// ```
    pub fn bucket_of(&self, timestamp: &NaiveDateTime) -> u32 {
        let minutes_from_midnight = timestamp.hour() * 60 + timestamp.minute();
        minutes_from_midnight / self.minutes
    }

    /// Duration of one interval
    pub fn step(&self) -> Duration {
        Duration::minutes(self.minutes as i64)
    }

    /// Number of intervals covering `days` whole days
    pub fn intervals_in_days(&self, days: u32) -> usize {
        days as usize * self.buckets_per_day() as usize
    }
}

impl TryFrom<u32> for IntervalLength {
    type Error = ParameterError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes)
    }
}

impl From<IntervalLength> for u32 {
    fn from(interval: IntervalLength) -> Self {
        interval.minutes
    }
}

/// Day of week with Monday = 0 ... Sunday = 6
pub fn day_of_week(timestamp: &NaiveDateTime) -> u32 {
    timestamp.weekday().num_days_from_monday()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_zero_minutes_rejected() {
        assert_eq!(
            IntervalLength::from_minutes(0),
            Err(ParameterError::NonPositiveInterval)
        );
    }

    #[test]
    fn test_daily_interval_has_single_bucket() {
        let interval = IntervalLength::from_minutes(1440).unwrap();
        assert_eq!(interval.buckets_per_day(), 1);
        assert_eq!(interval.bucket_of(&ts(1, 23, 59)), 0);
    }

    #[test]
    fn test_day_of_week_monday_is_zero() {
        // 2024-01-01 was a Monday
        assert_eq!(day_of_week(&ts(1, 0, 0)), 0);
        assert_eq!(day_of_week(&ts(7, 12, 0)), 6);
    }
}
