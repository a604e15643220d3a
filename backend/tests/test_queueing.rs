//! Erlang-C queueing model tests
//!
//! Stability boundaries, reference values and monotonicity in agent count.

use proptest::prelude::*;
use wfm_planner_core_rs::queueing::{
    asa_seconds, erlang_metrics, prob_wait, service_level, traffic_erlangs, ErlangB,
};
use wfm_planner_core_rs::ParameterError;

const AHT: f64 = 300.0;
const THRESHOLD: f64 = 20.0;

fn approx(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Boundaries
// ============================================================================

#[test]
fn test_stable_queue_has_fractional_service_level() {
    let sl = service_level(8.0, 10, AHT, THRESHOLD).unwrap();
    assert!(sl > 0.0 && sl < 1.0);
    approx(sl, 0.6419, 1e-3);
}

#[test]
fn test_overloaded_queue_saturates() {
    assert_eq!(service_level(12.0, 10, AHT, THRESHOLD).unwrap(), 0.0);
    assert_eq!(asa_seconds(12.0, 10, AHT).unwrap(), f64::INFINITY);
    assert_eq!(prob_wait(12.0, 10), 1.0);
}

#[test]
fn test_traffic_equal_to_agents_saturates() {
    assert_eq!(service_level(10.0, 10, AHT, THRESHOLD).unwrap(), 0.0);
    assert_eq!(asa_seconds(10.0, 10, AHT).unwrap(), f64::INFINITY);
}

#[test]
fn test_zero_traffic_is_fully_served() {
    assert_eq!(service_level(0.0, 5, AHT, THRESHOLD).unwrap(), 1.0);
    assert_eq!(asa_seconds(0.0, 5, AHT).unwrap(), 0.0);
}

#[test]
fn test_zero_agents_is_never_served() {
    // Zero agents wins over zero traffic
    assert_eq!(service_level(0.0, 0, AHT, THRESHOLD).unwrap(), 0.0);
    assert_eq!(asa_seconds(0.0, 0, AHT).unwrap(), f64::INFINITY);
    assert_eq!(prob_wait(3.0, 0), 1.0);
}

#[test]
fn test_nan_traffic_is_treated_as_saturated() {
    assert_eq!(service_level(f64::NAN, 10, AHT, THRESHOLD).unwrap(), 0.0);
}

// ============================================================================
// Reference values
// ============================================================================

#[test]
fn test_single_server_matches_mm1() {
    // M/M/1 with utilization 0.5: P(wait) = 0.5, ASA = ρ/(1−ρ) × aht
    approx(prob_wait(0.5, 1), 0.5, 1e-12);
    approx(asa_seconds(0.5, 1, AHT).unwrap(), AHT, 1e-9);
    let expected_sl = 1.0 - 0.5 * (-0.5 * THRESHOLD / AHT).exp();
    approx(
        service_level(0.5, 1, AHT, THRESHOLD).unwrap(),
        expected_sl,
        1e-12,
    );
}

#[test]
fn test_service_level_ladder_for_eight_erlangs() {
    let expected = [(9, 0.3888), (10, 0.6419), (11, 0.7994), (12, 0.8929), (13, 0.9455)];
    for (agents, sl) in expected {
        approx(service_level(8.0, agents, AHT, THRESHOLD).unwrap(), sl, 1e-3);
    }
}

#[test]
fn test_erlang_b_single_server() {
    let (n, b) = ErlangB::new(2.0).next().unwrap();
    assert_eq!(n, 1);
    approx(b, 2.0 / 3.0, 1e-12);
}

#[test]
fn test_large_agent_counts_stay_finite() {
    let pw = prob_wait(400.0, 430);
    assert!(pw.is_finite() && pw > 0.0 && pw < 1.0);
    let asa = asa_seconds(400.0, 430, AHT).unwrap();
    assert!(asa.is_finite() && asa > 0.0);
}

#[test]
fn test_erlang_metrics_bundle() {
    let result = erlang_metrics(96.0, 3600, AHT, 10, THRESHOLD).unwrap();
    approx(result.traffic_erlangs, 8.0, 1e-12);
    assert_eq!(result.agents, 10);
    approx(result.prob_wait, prob_wait(8.0, 10), 1e-15);
    approx(
        result.service_level,
        service_level(8.0, 10, AHT, THRESHOLD).unwrap(),
        1e-15,
    );
}

#[test]
fn test_traffic_intensity() {
    approx(traffic_erlangs(120.0, 180.0, 1800), 12.0, 1e-12);
}

// ============================================================================
// Invalid parameters
// ============================================================================

#[test]
fn test_non_positive_aht_rejected() {
    assert_eq!(
        service_level(8.0, 10, 0.0, THRESHOLD),
        Err(ParameterError::NonPositiveAht(0.0))
    );
    assert!(asa_seconds(8.0, 10, -5.0).is_err());
}

#[test]
fn test_negative_threshold_rejected() {
    assert_eq!(
        service_level(8.0, 10, AHT, -1.0),
        Err(ParameterError::NegativeThreshold(-1.0))
    );
}

#[test]
fn test_zero_threshold_equals_one_minus_prob_wait() {
    let sl = service_level(8.0, 10, AHT, 0.0).unwrap();
    approx(sl, 1.0 - prob_wait(8.0, 10), 1e-12);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_service_level_non_decreasing_in_agents(
        traffic in 0.1f64..60.0,
        agents in 1u32..90,
        threshold in 0.0f64..120.0,
    ) {
        let lower = service_level(traffic, agents, AHT, threshold).unwrap();
        let upper = service_level(traffic, agents + 1, AHT, threshold).unwrap();
        prop_assert!(upper + 1e-12 >= lower);
    }

    #[test]
    fn prop_outputs_stay_in_range(traffic in 0.0f64..80.0, agents in 0u32..120) {
        let pw = prob_wait(traffic, agents);
        let sl = service_level(traffic, agents, AHT, THRESHOLD).unwrap();
        let asa = asa_seconds(traffic, agents, AHT).unwrap();
        prop_assert!((0.0..=1.0).contains(&pw));
        prop_assert!((0.0..=1.0).contains(&sl));
        prop_assert!(asa >= 0.0);
    }
}
