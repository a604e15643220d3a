//! Staffing Solver
//!
//! Converts demand into an agent requirement for each channel discipline:
//!
//! - **Real-time**: the smallest agent count whose Erlang-C service level
//!   meets the target, searched from `ceil(traffic)` up to a ceiling.
//! - **Throughput**: `ceil(work_seconds / interval_seconds / productivity)`.
//!
//! Both express the requirement as *available* agents first and then gross it
//! up to *scheduled* agents by dividing by `(1 − shrinkage)`.
//!
//! # Unmet Targets
//!
//! When no count up to the ceiling meets the target the ceiling is returned
//! with `target_met = false`. Callers must surface that flag; the count is a
//! bound, not a solution.

use serde::{Deserialize, Serialize};

use crate::core::ParameterError;
use crate::queueing::erlang_c::{prob_wait_from_blocking, service_level_from_prob_wait};
use crate::queueing::{traffic_erlangs, ErlangB};

/// Default search ceiling for real-time requirements
pub const DEFAULT_MAX_AGENTS: u32 = 500;

/// Productivity never drops below this floor in throughput sizing
pub const MIN_PRODUCTIVITY: f64 = 0.1;

/// Absorbs binary floating-point error before rounding agent counts
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// Round up, ignoring representation error just above an integer
pub(crate) fn ceil_agents(value: f64) -> u32 {
    let rounded = (value - ROUNDING_TOLERANCE).ceil();
    if rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Round down, ignoring representation error just below an integer
pub(crate) fn floor_agents(value: f64) -> u32 {
    let rounded = (value + ROUNDING_TOLERANCE).floor();
    if rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Closed interval a shrinkage rate is clamped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShrinkageClamp {
    pub lower: f64,
    pub upper: f64,
}

impl ShrinkageClamp {
    /// Bounds used when converting available to scheduled agents
    pub const CONVERSION: ShrinkageClamp = ShrinkageClamp {
        lower: 0.0,
        upper: 0.95,
    };

    /// Bounds for scenario-adjusted shrinkage
    pub const SCENARIO: ShrinkageClamp = ShrinkageClamp {
        lower: 0.0,
        upper: 0.70,
    };

    pub fn apply(&self, shrinkage: f64) -> f64 {
        if shrinkage.is_nan() {
            return self.lower;
        }
        shrinkage.max(self.lower).min(self.upper)
    }

    /// Bounds must satisfy `0 ≤ lower ≤ upper < 1`
    pub fn validate(&self, name: &'static str) -> Result<(), ParameterError> {
        let ok = self.lower >= 0.0 && self.lower <= self.upper && self.upper < 1.0;
        if ok {
            Ok(())
        } else {
            Err(ParameterError::InvalidClamp {
                name,
                lower: self.lower,
                upper: self.upper,
            })
        }
    }
}

impl Default for ShrinkageClamp {
    fn default() -> Self {
        Self::CONVERSION
    }
}

/// Solver limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Largest real-time agent count searched
    pub max_agents: u32,

    /// Shrinkage bounds for the available → scheduled conversion
    pub shrinkage_clamp: ShrinkageClamp,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_agents: DEFAULT_MAX_AGENTS,
            shrinkage_clamp: ShrinkageClamp::CONVERSION,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_agents == 0 {
            return Err(ParameterError::NonPositive {
                name: "max_agents",
                value: 0.0,
            });
        }
        self.shrinkage_clamp.validate("conversion shrinkage")
    }
}

/// Agent requirement for one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingResult {
    /// Agents that must be on the phones (after shrinkage)
    pub available_agents: u32,

    /// Agents that must be rostered (before shrinkage)
    pub scheduled_agents: u32,

    /// `false` when the real-time target could not be met under the ceiling
    pub target_met: bool,
}

/// Outcome of a service-level search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaSearch {
    pub agents: u32,
    pub target_met: bool,
}

fn validate_target(target: f64) -> Result<(), ParameterError> {
    if (0.0..=1.0).contains(&target) {
        Ok(())
    } else {
        Err(ParameterError::InvalidTarget {
            name: "service level target",
            value: target,
        })
    }
}

fn validate_handle_time(aht_seconds: f64, threshold_seconds: f64) -> Result<(), ParameterError> {
    if aht_seconds.is_nan() || aht_seconds <= 0.0 || aht_seconds.is_infinite() {
        return Err(ParameterError::NonPositiveAht(aht_seconds));
    }
    if threshold_seconds.is_nan() || threshold_seconds < 0.0 {
        return Err(ParameterError::NegativeThreshold(threshold_seconds));
    }
    Ok(())
}

/// Smallest agent count in `[max(1, ceil(traffic)), max_agents]` whose
/// service level meets `target`
///
/// Candidates are scanned in increasing order while the Erlang-B recursion is
/// advanced once per count, so ties always resolve to the smaller count.
///
/// # Errors
/// * `NonPositiveAht`, `NegativeThreshold`, `InvalidTarget`
///
/// # Example
/// ```
/// use wfm_planner_core_rs::staffing::required_agents_for_sla;
///
/// let search = required_agents_for_sla(8.0, 300.0, 20.0, 0.8, 500).unwrap();
/// assert!(search.target_met);
/// assert_eq!(search.agents, 12);
/// ```
pub fn required_agents_for_sla(
    traffic: f64,
    aht_seconds: f64,
    threshold_seconds: f64,
    target: f64,
    max_agents: u32,
) -> Result<SlaSearch, ParameterError> {
    validate_handle_time(aht_seconds, threshold_seconds)?;
    validate_target(target)?;

    let start = if traffic > 0.0 && traffic < u32::MAX as f64 {
        (traffic.ceil() as u32).max(1)
    } else {
        1
    };

    if traffic <= 0.0 && start <= max_agents {
        // Idle queue: service level is 1 for any staffed count
        return Ok(SlaSearch {
            agents: start,
            target_met: true,
        });
    }

    if !traffic.is_nan() {
        for (agents, blocking) in ErlangB::new(traffic).take(max_agents as usize) {
            if agents < start || traffic >= agents as f64 {
                continue;
            }
            let pw = prob_wait_from_blocking(traffic, agents, blocking);
            let sl =
                service_level_from_prob_wait(traffic, agents, aht_seconds, threshold_seconds, pw);
            if sl >= target {
                return Ok(SlaSearch {
                    agents,
                    target_met: true,
                });
            }
        }
    }

    Ok(SlaSearch {
        agents: max_agents,
        target_met: false,
    })
}

/// Scheduled agents needed so that `available` remain after shrinkage
///
/// # Example
/// ```
/// use wfm_planner_core_rs::staffing::{scheduled_from_available, ShrinkageClamp};
///
/// assert_eq!(scheduled_from_available(7, 0.3, &ShrinkageClamp::CONVERSION), 10);
/// // Shrinkage is clamped to 0.95
/// assert_eq!(scheduled_from_available(1, 0.99, &ShrinkageClamp::CONVERSION), 20);
/// ```
pub fn scheduled_from_available(available: u32, shrinkage: f64, clamp: &ShrinkageClamp) -> u32 {
    let rate = clamp.apply(shrinkage);
    ceil_agents(available as f64 / (1.0 - rate).max(f64::EPSILON))
}

/// Available agents left from `scheduled` after shrinkage (clamped to `[0, 0.95]`)
///
/// Inverse of [`scheduled_from_available`] within rounding.
pub fn apply_shrinkage(scheduled: u32, shrinkage: f64) -> u32 {
    apply_shrinkage_clamped(scheduled, shrinkage, &ShrinkageClamp::CONVERSION)
}

pub fn apply_shrinkage_clamped(scheduled: u32, shrinkage: f64, clamp: &ShrinkageClamp) -> u32 {
    let rate = clamp.apply(shrinkage);
    floor_agents(scheduled as f64 * (1.0 - rate))
}

/// Real-time requirement for `contacts` arriving in one interval
///
/// # Example
/// ```
/// use wfm_planner_core_rs::staffing::{required_agents_realtime, SolverConfig};
///
/// // 8 Erlangs, 80% in 20 s, 30% shrinkage
/// let result =
///     required_agents_realtime(96.0, 3600, 300.0, 20.0, 0.8, 0.3, &SolverConfig::default()).unwrap();
/// assert_eq!(result.available_agents, 12);
/// assert_eq!(result.scheduled_agents, 18);
/// ```
pub fn required_agents_realtime(
    contacts: f64,
    interval_seconds: u32,
    aht_seconds: f64,
    threshold_seconds: f64,
    target: f64,
    shrinkage: f64,
    config: &SolverConfig,
) -> Result<StaffingResult, ParameterError> {
    if interval_seconds == 0 {
        return Err(ParameterError::NonPositiveInterval);
    }
    let traffic = traffic_erlangs(contacts, aht_seconds, interval_seconds);
    let search = required_agents_for_sla(
        traffic,
        aht_seconds,
        threshold_seconds,
        target,
        config.max_agents,
    )?;
    Ok(StaffingResult {
        available_agents: search.agents,
        scheduled_agents: scheduled_from_available(search.agents, shrinkage, &config.shrinkage_clamp),
        target_met: search.target_met,
    })
}

/// Throughput requirement: enough capacity to work every contact in the interval
///
/// # Example
/// ```
/// use wfm_planner_core_rs::staffing::{required_agents_throughput, SolverConfig};
///
/// // 30 emails × 600 s = 5 agent-hours of work in a 1 h interval
/// let result =
///     required_agents_throughput(30.0, 3600, 600.0, 0.0, 1.0, &SolverConfig::default()).unwrap();
/// assert_eq!(result.available_agents, 5);
/// assert_eq!(result.scheduled_agents, 5);
/// ```
pub fn required_agents_throughput(
    contacts: f64,
    interval_seconds: u32,
    aht_seconds: f64,
    shrinkage: f64,
    productivity: f64,
    config: &SolverConfig,
) -> Result<StaffingResult, ParameterError> {
    if interval_seconds == 0 {
        return Err(ParameterError::NonPositiveInterval);
    }
    if aht_seconds.is_nan() || aht_seconds <= 0.0 || aht_seconds.is_infinite() {
        return Err(ParameterError::NonPositiveAht(aht_seconds));
    }
    let productivity = if productivity.is_nan() {
        MIN_PRODUCTIVITY
    } else {
        productivity.max(MIN_PRODUCTIVITY)
    };
    let work = traffic_erlangs(contacts.max(0.0), aht_seconds, interval_seconds);
    let available = ceil_agents(work / productivity);
    Ok(StaffingResult {
        available_agents: available,
        scheduled_agents: scheduled_from_available(available, shrinkage, &config.shrinkage_clamp),
        target_met: true,
    })
}

/// Share of demand the given capacity can work within the interval, capped at 1
///
/// Used as the throughput-channel stand-in for service level. Zero demand is
/// fully served.
pub fn throughput_service_level(
    available_agents: u32,
    contacts: f64,
    interval_seconds: u32,
    aht_seconds: f64,
) -> f64 {
    if contacts <= 0.0 {
        return 1.0;
    }
    let capacity = available_agents as f64 * interval_seconds as f64 / aht_seconds;
    (capacity / contacts).clamp(0.0, 1.0)
}
