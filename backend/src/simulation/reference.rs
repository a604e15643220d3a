//! Per-series staffing reference metadata
//!
//! The simulator needs, for each (channel, queue), an hourly cost, a
//! shrinkage rate, a handle time, a service-level threshold and the channel
//! discipline. These are distilled from the historical staffing and interval
//! records; series with no history fall back to [`ReferenceDefaults`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::models::{ChannelDiscipline, IntervalRecord, SeriesKey, StaffingRecord};

/// Values used when a series has no reference metadata
///
/// All monetary values are per agent-hour in the planning currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceDefaults {
    pub shrinkage_rate: f64,
    pub cost_per_hour: f64,
    pub aht_seconds: f64,
    pub sla_threshold_seconds: f64,
    pub discipline: ChannelDiscipline,
}

impl Default for ReferenceDefaults {
    fn default() -> Self {
        Self {
            shrinkage_rate: 0.30,
            cost_per_hour: 22.0,
            aht_seconds: 300.0,
            sla_threshold_seconds: 20.0,
            discipline: ChannelDiscipline::RealTime,
        }
    }
}

/// Reference metadata for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReference {
    pub cost_per_hour: f64,
    pub shrinkage_rate: f64,
    pub aht_seconds: f64,
    pub sla_threshold_seconds: f64,
    pub discipline: ChannelDiscipline,
    /// At least one field came from [`ReferenceDefaults`]
    pub fallback: bool,
}

impl SeriesReference {
    pub fn from_defaults(defaults: &ReferenceDefaults) -> Self {
        Self {
            cost_per_hour: defaults.cost_per_hour,
            shrinkage_rate: defaults.shrinkage_rate,
            aht_seconds: defaults.aht_seconds,
            sla_threshold_seconds: defaults.sla_threshold_seconds,
            discipline: defaults.discipline,
            fallback: true,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    cost_sum: f64,
    shrinkage_sum: f64,
    staffing_rows: usize,
    aht_sum: f64,
    aht_rows: usize,
    max_threshold: Option<f64>,
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Reference metadata for every known series
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    entries: BTreeMap<SeriesKey, SeriesReference>,
    defaults: ReferenceDefaults,
    fallback: SeriesReference,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::from_entries([], ReferenceDefaults::default())
    }
}

impl ReferenceTable {
    /// Aggregate reference metadata
    ///
    /// - cost and shrinkage: mean over staffing records
    /// - handle time: mean over interval records with a positive AHT
    /// - threshold: maximum over interval records
    /// - discipline: from `disciplines`
    ///
    /// Any field without a source takes its default and marks the entry as a
    /// fallback.
    pub fn build(
        intervals: &[IntervalRecord],
        staffing: &[StaffingRecord],
        disciplines: &HashMap<SeriesKey, ChannelDiscipline>,
        defaults: ReferenceDefaults,
    ) -> Self {
        let mut acc: BTreeMap<SeriesKey, Accumulator> = BTreeMap::new();

        let mut inconsistent = 0usize;
        for record in staffing {
            if !record.is_consistent() {
                inconsistent += 1;
            }
            let entry = acc.entry(record.series_key()).or_default();
            entry.cost_sum += record.cost_per_hour;
            entry.shrinkage_sum += record.shrinkage_rate;
            entry.staffing_rows += 1;
        }
        if inconsistent > 0 {
            debug!(
                rows = inconsistent,
                "staffing rows where available != floor(scheduled x (1 - shrinkage))"
            );
        }

        for record in intervals {
            let entry = acc.entry(record.series_key()).or_default();
            if record.average_handle_time > 0.0 {
                entry.aht_sum += record.average_handle_time;
                entry.aht_rows += 1;
            }
            let threshold = record.sla_threshold;
            entry.max_threshold = Some(entry.max_threshold.map_or(threshold, |m| m.max(threshold)));
        }

        for key in disciplines.keys() {
            acc.entry(key.clone()).or_default();
        }

        let entries: Vec<_> = acc
            .into_iter()
            .map(|(key, a)| {
                let cost = mean(a.cost_sum, a.staffing_rows);
                let shrinkage = mean(a.shrinkage_sum, a.staffing_rows);
                let aht = mean(a.aht_sum, a.aht_rows);
                let discipline = disciplines.get(&key).copied();
                let fallback = cost.is_none()
                    || aht.is_none()
                    || a.max_threshold.is_none()
                    || discipline.is_none();
                let reference = SeriesReference {
                    cost_per_hour: cost.unwrap_or(defaults.cost_per_hour),
                    shrinkage_rate: shrinkage.unwrap_or(defaults.shrinkage_rate),
                    aht_seconds: aht.unwrap_or(defaults.aht_seconds),
                    sla_threshold_seconds: a
                        .max_threshold
                        .unwrap_or(defaults.sla_threshold_seconds),
                    discipline: discipline.unwrap_or(defaults.discipline),
                    fallback,
                };
                (key, reference)
            })
            .collect();

        Self::from_entries(entries, defaults)
    }

    /// Table from explicit entries (for callers that already hold metadata)
    pub fn from_entries(
        entries: impl IntoIterator<Item = (SeriesKey, SeriesReference)>,
        defaults: ReferenceDefaults,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            fallback: SeriesReference::from_defaults(&defaults),
            defaults,
        }
    }

    pub fn get(&self, key: &SeriesKey) -> Option<&SeriesReference> {
        self.entries.get(key)
    }

    /// Reference for `key`, or the defaults flagged as a fallback
    pub fn resolve(&self, key: &SeriesKey) -> &SeriesReference {
        self.entries.get(key).unwrap_or(&self.fallback)
    }

    pub fn defaults(&self) -> &ReferenceDefaults {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
