//! Queueing Model
//!
//! Erlang-C approximations for real-time (synchronous wait) channels:
//! probability of waiting, average speed of answer and service level for a
//! given traffic intensity and agent count.
//!
//! # Stability Boundaries
//!
//! | Condition | prob_wait | ASA | service level |
//! |-----------|-----------|-----|---------------|
//! | `agents = 0` | 1 | +∞ | 0 |
//! | `traffic ≤ 0` | 1 | 0 | 1 |
//! | `traffic ≥ agents` | 1 | +∞ | 0 |
//!
//! A saturated queue is a modeled state, never an error.

pub mod erlang_c;

pub use erlang_c::{
    asa_seconds, erlang_metrics, prob_wait, service_level, traffic_erlangs, ErlangB, ErlangResult,
};
