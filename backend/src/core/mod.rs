//! Core building blocks shared by every stage of a planning run
//!
//! - **interval**: day discretization (interval length, time buckets)
//! - **error**: parameter validation errors

pub mod error;
pub mod interval;

pub use error::ParameterError;
pub use interval::{day_of_week, IntervalLength};
