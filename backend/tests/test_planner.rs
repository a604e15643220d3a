//! End-to-end planning run tests
//!
//! Configuration validation, interval-length checks, the forecast → simulate
//! → KPI pipeline and configuration fingerprints.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use wfm_planner_core_rs::{
    compute_config_hash, ChannelDiscipline, IntervalRecord, ParameterError, PlanOutput, Planner,
    PlannerConfig, PlanningError, Scenario, SeriesKey, StaffingRecord,
};

/// Monday 2024-03-04 00:00
fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn history(channel: &str, queue: &str, days: i64, offered: f64) -> Vec<IntervalRecord> {
    (0..days * 24)
        .map(|h| IntervalRecord {
            timestamp: start() + Duration::hours(h),
            interval_length: 60,
            channel: channel.to_string(),
            queue: queue.to_string(),
            offered_count: offered,
            handled_count: offered,
            abandoned_count: 0.0,
            average_handle_time: 300.0,
            average_speed_of_answer: 18.0,
            service_level: 0.8,
            sla_threshold: 20.0,
        })
        .collect()
}

fn staffing(days: i64) -> Vec<StaffingRecord> {
    (0..days * 24)
        .map(|h| StaffingRecord {
            timestamp: start() + Duration::hours(h),
            interval_length: 60,
            channel: "voice".to_string(),
            queue: "billing".to_string(),
            agents_scheduled: 20,
            shrinkage_rate: 0.3,
            agents_available: 14,
            cost_per_hour: 25.0,
        })
        .collect()
}

fn disciplines() -> HashMap<SeriesKey, ChannelDiscipline> {
    HashMap::from([(SeriesKey::new("voice", "billing"), ChannelDiscipline::RealTime)])
}

fn small_config() -> PlannerConfig {
    PlannerConfig {
        horizon_days: 2,
        holdout_days: 7,
        ..Default::default()
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_unsupported_interval_rejected_before_any_work() {
    let config = PlannerConfig {
        interval_minutes: 45,
        ..Default::default()
    };
    assert!(matches!(
        Planner::new(config),
        Err(PlanningError::Parameter(ParameterError::UnsupportedInterval { minutes: 45 }))
    ));
}

#[test]
fn test_duplicate_scenarios_rejected() {
    let config = PlannerConfig {
        scenarios: vec![Scenario::new("base", "A"), Scenario::new("base", "B")],
        ..Default::default()
    };
    assert!(matches!(
        Planner::new(config),
        Err(PlanningError::Parameter(ParameterError::DuplicateScenario(_)))
    ));
}

#[test]
fn test_out_of_range_target_rejected() {
    let mut config = PlannerConfig::default();
    config.targets.realtime = 1.2;
    assert!(matches!(
        Planner::new(config),
        Err(PlanningError::Parameter(ParameterError::InvalidTarget { .. }))
    ));
}

#[test]
fn test_oversized_windows_rejected() {
    let config = PlannerConfig {
        holdout_days: 200_000_000,
        horizon_days: 1,
        ..Default::default()
    };
    assert!(matches!(
        Planner::new(config),
        Err(PlanningError::Parameter(ParameterError::OutOfRange {
            name: "holdout_days",
            value: 200_000_000,
            ..
        }))
    ));

    let config = PlannerConfig {
        horizon_days: u32::MAX,
        ..Default::default()
    };
    assert!(matches!(
        Planner::new(config),
        Err(PlanningError::Parameter(ParameterError::OutOfRange {
            name: "horizon_days",
            ..
        }))
    ));
}

#[test]
fn test_toml_configuration() {
    let config = PlannerConfig::from_toml_str(
        r#"
        interval_minutes = 30
        horizon_days = 7

        [targets]
        realtime = 0.9

        [reference_defaults]
        cost_per_hour = 30.0
        discipline = "throughput"
        "#,
    )
    .unwrap();
    assert_eq!(config.targets.realtime, 0.9);
    assert_eq!(config.targets.throughput, 1.0);
    assert_eq!(config.reference_defaults.cost_per_hour, 30.0);
    assert_eq!(config.reference_defaults.aht_seconds, 300.0);
    assert_eq!(
        config.reference_defaults.discipline,
        ChannelDiscipline::Throughput
    );

    let planner = Planner::new(config).unwrap();
    assert_eq!(planner.interval().minutes(), 30);
}

// ============================================================================
// Input checks
// ============================================================================

#[test]
fn test_interval_mismatch_rejected() {
    let planner = Planner::new(small_config()).unwrap();
    let mut rows = history("voice", "billing", 14, 96.0);
    rows[5].interval_length = 30;

    match planner.run(&rows, &staffing(14), &disciplines()) {
        Err(PlanningError::IntervalMismatch {
            kind,
            series,
            expected,
            found,
            ..
        }) => {
            assert_eq!(kind, "interval");
            assert_eq!(series, SeriesKey::new("voice", "billing"));
            assert_eq!(expected, 60);
            assert_eq!(found, 30);
        }
        other => panic!("expected IntervalMismatch, got {other:?}"),
    }
}

#[test]
fn test_staffing_interval_mismatch_rejected() {
    let planner = Planner::new(small_config()).unwrap();
    let mut staff = staffing(14);
    staff[0].interval_length = 15;
    assert!(matches!(
        planner.run(&history("voice", "billing", 14, 96.0), &staff, &disciplines()),
        Err(PlanningError::IntervalMismatch { kind: "staffing", .. })
    ));
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_full_run() {
    let config = small_config();
    let catalog_len = config.scenarios.len();
    let planner = Planner::new(config).unwrap();

    let output = planner
        .run(&history("voice", "billing", 21, 96.0), &staffing(21), &disciplines())
        .unwrap();

    assert_eq!(output.interval_minutes, 60);
    assert_eq!(output.forecasts.len(), 48);
    assert!(output
        .forecasts
        .iter()
        .all(|f| (f.forecast_offered - 96.0).abs() < 1e-6));

    assert_eq!(output.quality.len(), 1);
    assert!(output.quality[0].mape < 1e-6);

    assert_eq!(output.outcomes.len(), catalog_len * 48);
    assert_eq!(output.kpis.len(), catalog_len * 2);
    assert_eq!(output.unmet_target_intervals, 0);
    assert!(output.fallback_series.is_empty());

    let base = output
        .outcomes
        .iter()
        .find(|o| o.scenario_id == "base")
        .unwrap();
    assert_eq!(base.required_agents_scheduled, 18);
    assert_eq!(base.planned_agents_scheduled, 20);
    assert_eq!(base.scenario_cost_per_hour, 25.0);
    assert!(!base.reference_fallback);
}

#[test]
fn test_series_without_metadata_reported_as_fallback() {
    let planner = Planner::new(small_config()).unwrap();
    let mut rows = history("voice", "billing", 14, 96.0);
    rows.extend(history("email", "claims", 14, 10.0));

    let output = planner.run(&rows, &staffing(14), &disciplines()).unwrap();
    assert_eq!(output.fallback_series, vec![SeriesKey::new("email", "claims")]);
    assert!(output
        .outcomes
        .iter()
        .filter(|o| o.channel == "email")
        .all(|o| o.reference_fallback));
}

#[test]
fn test_empty_input_gives_empty_plan() {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let output = planner.run(&[], &[], &HashMap::new()).unwrap();
    assert!(output.forecasts.is_empty());
    assert!(output.outcomes.is_empty());
    assert!(output.kpis.is_empty());
    assert_eq!(output.unmet_target_intervals, 0);
}

// ============================================================================
// Fingerprints and output
// ============================================================================

#[test]
fn test_output_carries_config_hash() {
    let config = small_config();
    let planner = Planner::new(config.clone()).unwrap();
    let output = planner.run(&[], &[], &HashMap::new()).unwrap();

    assert_eq!(output.config_hash, compute_config_hash(&config).unwrap());
    assert!(output.verify_config(&config).is_ok());

    let mut other = config;
    other.horizon_days = 3;
    assert!(matches!(
        output.verify_config(&other),
        Err(PlanningError::ConfigMismatch { .. })
    ));
}

#[test]
fn test_run_ids_are_unique() {
    let planner = Planner::new(small_config()).unwrap();
    let first = planner.run(&[], &[], &HashMap::new()).unwrap();
    let second = planner.run(&[], &[], &HashMap::new()).unwrap();
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.config_hash, second.config_hash);
}

#[test]
fn test_output_json_round_trip() {
    let planner = Planner::new(small_config()).unwrap();
    let output = planner
        .run(&history("voice", "billing", 14, 96.0), &staffing(14), &disciplines())
        .unwrap();

    let json = serde_json::to_string(&output).unwrap();
    let restored: PlanOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.run_id, output.run_id);
    assert_eq!(restored.outcomes.len(), output.outcomes.len());
    assert_eq!(restored.kpis, output.kpis);
}
