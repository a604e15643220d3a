//! Holdout accuracy metrics

use serde::{Deserialize, Serialize};

/// Denominator floor for percentage errors on zero-volume intervals
const MAPE_EPSILON: f64 = 1e-6;

/// Forecast accuracy for one series on its holdout window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelQuality {
    pub channel: String,
    pub queue: String,
    /// Mean absolute percentage error (fraction, not percent)
    pub mape: f64,
    /// Root mean squared error in contacts per interval
    pub rmse: f64,
    pub holdout_days: u32,
}

/// `(mape, rmse)` of `predicted` against `actual`; `None` when empty
///
/// # Example
/// ```
/// use wfm_planner_core_rs::forecast::accuracy;
///
/// let (mape, rmse) = accuracy(&[100.0, 50.0], &[90.0, 55.0]).unwrap();
/// assert!((mape - 0.1).abs() < 1e-12);
/// assert!((rmse - 62.5_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> Option<(f64, f64)> {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return None;
    }
    let (mut abs_pct, mut squared) = (0.0, 0.0);
    for (a, p) in actual.iter().zip(predicted) {
        let err = a - p;
        abs_pct += err.abs() / a.abs().max(MAPE_EPSILON);
        squared += err * err;
    }
    Some((abs_pct / n as f64, (squared / n as f64).sqrt()))
}
