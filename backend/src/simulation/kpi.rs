//! Daily KPI roll-up of scenario outcomes
//!
//! Groups outcome rows by (scenario, calendar day, channel) in first-seen
//! order and summarizes volume, cost and service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::ScenarioOutcomeRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummaryRow {
    pub scenario_id: String,
    pub scenario_name: String,
    pub date: NaiveDate,
    pub channel: String,
    pub forecast_offered: f64,
    pub planned_labor_cost: f64,
    pub avg_service_level: f64,
    /// Mean over intervals with a defined ASA; `None` when there are none
    pub avg_asa_seconds: Option<f64>,
    pub avg_staffing_gap: f64,
    /// Share of intervals whose achieved service level meets the target
    pub target_attainment: f64,
    /// Intervals where the solver returned its ceiling
    pub unmet_target_intervals: usize,
    pub intervals: usize,
}

#[derive(Default)]
struct Totals {
    offered: f64,
    cost: f64,
    service_level: f64,
    asa_sum: f64,
    asa_count: usize,
    gap: f64,
    attained: usize,
    unmet: usize,
    count: usize,
}

/// Summarize outcomes per (scenario, date, channel)
pub fn summarize(outcomes: &[ScenarioOutcomeRecord]) -> Vec<KpiSummaryRow> {
    let mut order: Vec<(&str, &str, NaiveDate, &str)> = Vec::new();
    let mut totals: HashMap<(&str, &str, NaiveDate, &str), Totals> = HashMap::new();

    for outcome in outcomes {
        let key = (
            outcome.scenario_id.as_str(),
            outcome.scenario_name.as_str(),
            outcome.timestamp.date(),
            outcome.channel.as_str(),
        );
        let entry = totals.entry(key).or_insert_with(|| {
            order.push(key);
            Totals::default()
        });
        entry.offered += outcome.forecast_offered;
        entry.cost += outcome.planned_labor_cost;
        entry.service_level += outcome.achieved_service_level;
        if let Some(asa) = outcome.achieved_asa_seconds {
            entry.asa_sum += asa;
            entry.asa_count += 1;
        }
        entry.gap += outcome.staffing_gap as f64;
        if outcome.achieved_service_level >= outcome.service_target {
            entry.attained += 1;
        }
        if !outcome.required_target_met {
            entry.unmet += 1;
        }
        entry.count += 1;
    }

    order
        .into_iter()
        .filter_map(|key| {
            let t = totals.remove(&key)?;
            let n = t.count as f64;
            Some(KpiSummaryRow {
                scenario_id: key.0.to_string(),
                scenario_name: key.1.to_string(),
                date: key.2,
                channel: key.3.to_string(),
                forecast_offered: t.offered,
                planned_labor_cost: t.cost,
                avg_service_level: t.service_level / n,
                avg_asa_seconds: (t.asa_count > 0).then(|| t.asa_sum / t.asa_count as f64),
                avg_staffing_gap: t.gap / n,
                target_attainment: t.attained as f64 / n,
                unmet_target_intervals: t.unmet,
                intervals: t.count,
            })
        })
        .collect()
}
