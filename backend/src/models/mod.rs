//! Domain models for the workforce planner

pub mod outcome;
pub mod records;
pub mod scenario;
pub mod series;

// Re-exports
pub use outcome::ScenarioOutcomeRecord;
pub use records::{ForecastRecord, IntervalRecord, StaffingRecord};
pub use scenario::{default_catalog, validate_catalog, Scenario};
pub use series::{discipline_map, ChannelDiscipline, DisciplineAssignment, SeriesKey};
