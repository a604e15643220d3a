//! Erlang-C formulas
//!
//! The probability of waiting is derived from the Erlang-B blocking
//! probability, which satisfies the recursion
//!
//! ```text
//! B(0) = 1
//! B(k) = a·B(k−1) / (k + a·B(k−1))
//! C(n) = n·B(n) / (n − a·(1 − B(n)))
//! ```
//!
//! No factorials or powers of `a` are formed, so agent counts in the
//! thousands stay finite.

use serde::{Deserialize, Serialize};

use crate::core::ParameterError;

/// Queue metrics for one interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErlangResult {
    pub traffic_erlangs: f64,
    pub agents: u32,
    pub prob_wait: f64,
    pub asa_seconds: f64,
    pub service_level: f64,
}

/// Erlang-B blocking probabilities for increasing agent counts
///
/// Yields `(n, B(n))` for `n = 1, 2, ...`. The staffing solver walks this
/// sequence once instead of recomputing each candidate from scratch.
///
/// # Example
/// ```
/// use wfm_planner_core_rs::queueing::ErlangB;
///
/// let (n, b) = ErlangB::new(1.0).next().unwrap();
/// assert_eq!(n, 1);
/// assert!((b - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ErlangB {
    traffic: f64,
    agents: u32,
    blocking: f64,
}

impl ErlangB {
    pub fn new(traffic: f64) -> Self {
        Self {
            traffic,
            agents: 0,
            blocking: 1.0,
        }
    }
}

impl Iterator for ErlangB {
    type Item = (u32, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.agents = self.agents.checked_add(1)?;
        let weighted = self.traffic * self.blocking;
        self.blocking = weighted / (self.agents as f64 + weighted);
        Some((self.agents, self.blocking))
    }
}

/// Offered workload in Erlangs: `contacts × aht / interval_seconds`
///
/// A zero interval is treated as one second.
pub fn traffic_erlangs(contacts: f64, aht_seconds: f64, interval_seconds: u32) -> f64 {
    contacts * aht_seconds / interval_seconds.max(1) as f64
}

/// `true` when the queue cannot drain (no agents, or load meets capacity)
fn is_saturated(traffic: f64, agents: u32) -> bool {
    agents == 0 || traffic.is_nan() || traffic >= agents as f64
}

/// Erlang-C wait probability given the Erlang-B value at `agents`
pub(crate) fn prob_wait_from_blocking(traffic: f64, agents: u32, blocking: f64) -> f64 {
    let n = agents as f64;
    let denom = n - traffic * (1.0 - blocking);
    if denom <= 0.0 {
        return 1.0;
    }
    let pw = n * blocking / denom;
    if pw.is_finite() {
        pw.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Probability that an arriving contact has to wait
///
/// Returns 1.0 when the queue is idle-degenerate (`traffic ≤ 0`), has no
/// agents, or is saturated.
///
/// # Example
/// ```
/// use wfm_planner_core_rs::queueing::prob_wait;
///
/// let pw = prob_wait(8.0, 10);
/// assert!(pw > 0.0 && pw < 1.0);
/// assert_eq!(prob_wait(12.0, 10), 1.0);
/// ```
pub fn prob_wait(traffic: f64, agents: u32) -> f64 {
    if is_saturated(traffic, agents) || traffic <= 0.0 {
        return 1.0;
    }
    match ErlangB::new(traffic).nth(agents as usize - 1) {
        Some((_, blocking)) => prob_wait_from_blocking(traffic, agents, blocking),
        None => 1.0,
    }
}

fn validate_aht(aht_seconds: f64) -> Result<(), ParameterError> {
    if aht_seconds > 0.0 && aht_seconds.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonPositiveAht(aht_seconds))
    }
}

fn validate_threshold(threshold_seconds: f64) -> Result<(), ParameterError> {
    if threshold_seconds >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NegativeThreshold(threshold_seconds))
    }
}

/// Average speed of answer in seconds: `prob_wait × aht / (agents − traffic)`
///
/// # Errors
/// * `NonPositiveAht` - `aht_seconds` is not a positive finite number
pub fn asa_seconds(traffic: f64, agents: u32, aht_seconds: f64) -> Result<f64, ParameterError> {
    validate_aht(aht_seconds)?;
    if agents == 0 {
        return Ok(f64::INFINITY);
    }
    if traffic <= 0.0 {
        return Ok(0.0);
    }
    if is_saturated(traffic, agents) {
        return Ok(f64::INFINITY);
    }
    let pw = prob_wait(traffic, agents);
    Ok(asa_from_prob_wait(traffic, agents, aht_seconds, pw))
}

pub(crate) fn asa_from_prob_wait(traffic: f64, agents: u32, aht_seconds: f64, pw: f64) -> f64 {
    pw * aht_seconds / (agents as f64 - traffic)
}

/// Probability that a contact waits no longer than `threshold_seconds`
///
/// `1 − prob_wait × exp(−(agents − traffic) × threshold / aht)`, clamped to
/// `[0, 1]`.
///
/// # Errors
/// * `NonPositiveAht` - `aht_seconds` is not a positive finite number
/// * `NegativeThreshold` - `threshold_seconds` is negative
///
/// # Example
/// ```
/// use wfm_planner_core_rs::queueing::service_level;
///
/// let sl = service_level(8.0, 10, 300.0, 20.0).unwrap();
/// assert!(sl > 0.0 && sl < 1.0);
/// assert_eq!(service_level(12.0, 10, 300.0, 20.0).unwrap(), 0.0);
/// ```
pub fn service_level(
    traffic: f64,
    agents: u32,
    aht_seconds: f64,
    threshold_seconds: f64,
) -> Result<f64, ParameterError> {
    validate_aht(aht_seconds)?;
    validate_threshold(threshold_seconds)?;
    if agents == 0 {
        return Ok(0.0);
    }
    if traffic <= 0.0 {
        return Ok(1.0);
    }
    if is_saturated(traffic, agents) {
        return Ok(0.0);
    }
    let pw = prob_wait(traffic, agents);
    Ok(service_level_from_prob_wait(
        traffic,
        agents,
        aht_seconds,
        threshold_seconds,
        pw,
    ))
}

pub(crate) fn service_level_from_prob_wait(
    traffic: f64,
    agents: u32,
    aht_seconds: f64,
    threshold_seconds: f64,
    pw: f64,
) -> f64 {
    let exponent = -(agents as f64 - traffic) * (threshold_seconds / aht_seconds);
    (1.0 - pw * exponent.exp()).clamp(0.0, 1.0)
}

/// Full queue summary for `contacts` arriving in one interval
///
/// # Example
/// ```
/// use wfm_planner_core_rs::queueing::erlang_metrics;
///
/// // 96 calls of 300 s in a 1 h interval is 8 Erlangs
/// let result = erlang_metrics(96.0, 3600, 300.0, 10, 20.0).unwrap();
/// assert!((result.traffic_erlangs - 8.0).abs() < 1e-12);
/// assert!(result.asa_seconds.is_finite());
/// ```
pub fn erlang_metrics(
    contacts: f64,
    interval_seconds: u32,
    aht_seconds: f64,
    agents: u32,
    threshold_seconds: f64,
) -> Result<ErlangResult, ParameterError> {
    validate_aht(aht_seconds)?;
    validate_threshold(threshold_seconds)?;
    let traffic = traffic_erlangs(contacts, aht_seconds, interval_seconds);
    Ok(ErlangResult {
        traffic_erlangs: traffic,
        agents,
        prob_wait: prob_wait(traffic, agents),
        asa_seconds: asa_seconds(traffic, agents, aht_seconds)?,
        service_level: service_level(traffic, agents, aht_seconds, threshold_seconds)?,
    })
}
