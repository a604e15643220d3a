//! Series identity and channel discipline
//!
//! Every demand series is identified by its (channel, queue) pair. Series are
//! independent end to end: forecasting, solving and simulation never read
//! another series' intermediate state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// (channel, queue) identifier of a demand series
///
/// Ordered so that series maps iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub channel: String,
    pub queue: String,
}

impl SeriesKey {
    pub fn new(channel: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            queue: queue.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.queue)
    }
}

/// How a channel's contacts wait for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelDiscipline {
    /// Synchronous wait (voice, chat): modeled with Erlang-C
    #[default]
    RealTime,

    /// Deferred response (email): modeled as capacity versus demand
    Throughput,
}

impl ChannelDiscipline {
    pub fn is_realtime(&self) -> bool {
        matches!(self, ChannelDiscipline::RealTime)
    }
}

/// Discipline of one series as it appears in input files
///
/// ```json
/// [{"channel": "email", "queue": "claims", "discipline": "throughput"}]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineAssignment {
    pub channel: String,
    pub queue: String,
    pub discipline: ChannelDiscipline,
}

/// Build the per-series discipline lookup; later entries win
pub fn discipline_map(
    assignments: impl IntoIterator<Item = DisciplineAssignment>,
) -> HashMap<SeriesKey, ChannelDiscipline> {
    assignments
        .into_iter()
        .map(|a| (SeriesKey::new(a.channel, a.queue), a.discipline))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_keys_order_by_channel_then_queue() {
        let mut keys = vec![
            SeriesKey::new("voice", "billing"),
            SeriesKey::new("chat", "web_support"),
            SeriesKey::new("chat", "sales_chat"),
        ];
        keys.sort();
        assert_eq!(keys[0], SeriesKey::new("chat", "sales_chat"));
        assert_eq!(keys[2].to_string(), "voice/billing");
    }

    #[test]
    fn test_discipline_serializes_snake_case() {
        let json = serde_json::to_string(&ChannelDiscipline::RealTime).unwrap();
        assert_eq!(json, "\"real_time\"");
    }

    #[test]
    fn test_discipline_map_from_json() {
        let assignments: Vec<DisciplineAssignment> = serde_json::from_str(
            r#"[
                {"channel": "email", "queue": "claims", "discipline": "throughput"},
                {"channel": "voice", "queue": "billing", "discipline": "real_time"}
            ]"#,
        )
        .unwrap();
        let map = discipline_map(assignments);
        assert_eq!(
            map.get(&SeriesKey::new("email", "claims")),
            Some(&ChannelDiscipline::Throughput)
        );
        assert!(map[&SeriesKey::new("voice", "billing")].is_realtime());
    }
}
