//! Staffing solver tests
//!
//! Smallest-count search, ceiling behavior, throughput sizing and the
//! available/scheduled shrinkage conversion.

use proptest::prelude::*;
use wfm_planner_core_rs::queueing::service_level;
use wfm_planner_core_rs::staffing::{
    apply_shrinkage, required_agents_for_sla, required_agents_realtime,
    required_agents_throughput, scheduled_from_available, throughput_service_level,
    ShrinkageClamp, SolverConfig,
};
use wfm_planner_core_rs::ParameterError;

// ============================================================================
// Real-time search
// ============================================================================

#[test]
fn test_smallest_count_meeting_target() {
    let search = required_agents_for_sla(8.0, 300.0, 20.0, 0.8, 500).unwrap();
    assert_eq!(search.agents, 12);
    assert!(search.target_met);

    // One fewer agent misses the target
    assert!(service_level(8.0, 11, 300.0, 20.0).unwrap() < 0.8);
}

#[test]
fn test_fractional_traffic() {
    let search = required_agents_for_sla(23.7, 420.0, 20.0, 0.8, 500).unwrap();
    assert_eq!(search.agents, 29);
    assert!(search.target_met);
}

#[test]
fn test_unreachable_target_returns_ceiling() {
    let search = required_agents_for_sla(40.0, 300.0, 20.0, 0.99, 30).unwrap();
    assert_eq!(search.agents, 30);
    assert!(!search.target_met);
}

#[test]
fn test_idle_queue_needs_one_agent() {
    let search = required_agents_for_sla(0.0, 300.0, 20.0, 0.8, 500).unwrap();
    assert_eq!(search.agents, 1);
    assert!(search.target_met);
}

#[test]
fn test_invalid_target_rejected() {
    assert_eq!(
        required_agents_for_sla(8.0, 300.0, 20.0, 1.2, 500),
        Err(ParameterError::InvalidTarget {
            name: "service level target",
            value: 1.2,
        })
    );
}

#[test]
fn test_invalid_handle_time_rejected() {
    assert!(matches!(
        required_agents_for_sla(8.0, 0.0, 20.0, 0.8, 500),
        Err(ParameterError::NonPositiveAht(_))
    ));
    assert!(matches!(
        required_agents_for_sla(8.0, 300.0, -3.0, 0.8, 500),
        Err(ParameterError::NegativeThreshold(_))
    ));
}

#[test]
fn test_realtime_requirement_grosses_up_for_shrinkage() {
    let result =
        required_agents_realtime(96.0, 3600, 300.0, 20.0, 0.8, 0.3, &SolverConfig::default())
            .unwrap();
    assert_eq!(result.available_agents, 12);
    // 12 / 0.7 = 17.14
    assert_eq!(result.scheduled_agents, 18);
    assert!(result.target_met);
}

#[test]
fn test_realtime_requirement_zero_interval_rejected() {
    assert_eq!(
        required_agents_realtime(96.0, 0, 300.0, 20.0, 0.8, 0.3, &SolverConfig::default()),
        Err(ParameterError::NonPositiveInterval)
    );
}

// ============================================================================
// Throughput sizing
// ============================================================================

#[test]
fn test_throughput_requirement() {
    let solver = SolverConfig::default();
    let result = required_agents_throughput(30.0, 3600, 600.0, 0.0, 1.0, &solver).unwrap();
    assert_eq!(result.available_agents, 5);
    assert!(result.target_met);

    let half = required_agents_throughput(30.0, 3600, 600.0, 0.0, 0.5, &solver).unwrap();
    assert_eq!(half.available_agents, 10);
}

#[test]
fn test_throughput_productivity_floor() {
    let solver = SolverConfig::default();
    // 1 agent-interval of work at the 0.1 floor
    let result = required_agents_throughput(6.0, 3600, 600.0, 0.0, 0.0, &solver).unwrap();
    assert_eq!(result.available_agents, 10);
}

#[test]
fn test_throughput_service_level_is_capacity_share() {
    assert_eq!(throughput_service_level(5, 30.0, 3600, 600.0), 1.0);
    assert!((throughput_service_level(3, 30.0, 3600, 600.0) - 0.6).abs() < 1e-12);
    assert_eq!(throughput_service_level(0, 0.0, 3600, 600.0), 1.0);
}

// ============================================================================
// Shrinkage conversion
// ============================================================================

#[test]
fn test_scheduled_from_available() {
    let clamp = ShrinkageClamp::CONVERSION;
    assert_eq!(scheduled_from_available(7, 0.3, &clamp), 10);
    assert_eq!(scheduled_from_available(10, 0.0, &clamp), 10);
    assert_eq!(scheduled_from_available(0, 0.3, &clamp), 0);
    // Clamped at 0.95, and 1 / 0.05 must not round up to 21
    assert_eq!(scheduled_from_available(1, 0.99, &clamp), 20);
    assert_eq!(scheduled_from_available(4, -0.2, &clamp), 4);
}

#[test]
fn test_apply_shrinkage() {
    assert_eq!(apply_shrinkage(10, 0.3), 7);
    assert_eq!(apply_shrinkage(18, 0.3), 12);
    assert_eq!(apply_shrinkage(3, 0.5), 1);
}

#[test]
fn test_invalid_clamp_rejected() {
    let config = SolverConfig {
        max_agents: 500,
        shrinkage_clamp: ShrinkageClamp {
            lower: 0.5,
            upper: 0.2,
        },
    };
    assert!(matches!(
        config.validate(),
        Err(ParameterError::InvalidClamp { .. })
    ));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_solver_returns_smallest_satisfying_count(
        traffic in 0.5f64..60.0,
        target in 0.5f64..0.95,
    ) {
        let search = required_agents_for_sla(traffic, 300.0, 20.0, target, 500).unwrap();
        let sl = service_level(traffic, search.agents, 300.0, 20.0).unwrap();
        prop_assert!(search.target_met);
        prop_assert!(sl >= target);

        let start = (traffic.ceil() as u32).max(1);
        if search.agents > start {
            let below = service_level(traffic, search.agents - 1, 300.0, 20.0).unwrap();
            prop_assert!(below < target);
        }
    }

    #[test]
    fn prop_shrinkage_round_trip_keeps_available(
        available in 0u32..2000,
        shrinkage in 0.0f64..0.95,
    ) {
        let scheduled = scheduled_from_available(available, shrinkage, &ShrinkageClamp::CONVERSION);
        prop_assert!(apply_shrinkage(scheduled, shrinkage) >= available);
    }
}
