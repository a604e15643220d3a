//! Scenario Simulator
//!
//! Projects required and planned staffing, achieved service and labor cost
//! for every forecast interval under every scenario of a catalog.
//!
//! - **reference**: per-series cost/shrinkage/AHT/threshold/discipline
//! - **engine**: the two-pass (required → planned) evaluation
//! - **kpi**: daily roll-up per scenario and channel

pub mod engine;
pub mod kpi;
pub mod reference;

pub use engine::{simulate, simulate_interval, ServiceTargets, SimulationConfig};
pub use kpi::{summarize, KpiSummaryRow};
pub use reference::{ReferenceDefaults, ReferenceTable, SeriesReference};
