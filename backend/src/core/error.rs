//! Parameter validation errors
//!
//! Every variant here aborts the operation that raised it before any output
//! is produced. Data-quality gaps (missing reference metadata, unreachable
//! service targets) are never reported through this type.

use thiserror::Error;

/// Invalid numeric or configuration parameter
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Average handle time must be positive, got {0}")]
    NonPositiveAht(f64),

    #[error("Service level threshold must be non-negative, got {0}")]
    NegativeThreshold(f64),

    #[error("Interval length must be positive")]
    NonPositiveInterval,

    #[error("Interval length of {minutes} minutes does not evenly subdivide a day (supported: 15, 30, 60, 480, 720, 1440)")]
    UnsupportedInterval { minutes: u32 },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidTarget { name: &'static str, value: f64 },

    #[error("Clamp bounds for {name} are invalid: [{lower}, {upper}]")]
    InvalidClamp {
        name: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be at most {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Scenario '{id}' is invalid: {reason}")]
    InvalidScenario { id: String, reason: String },

    #[error("Scenario id '{0}' appears more than once in the catalog")]
    DuplicateScenario(String),

    #[error("Scenario catalog is empty")]
    EmptyCatalog,
}
