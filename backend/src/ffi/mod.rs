//! Python bindings
//!
//! Plans cross the boundary as JSON strings (the same payloads the CLI
//! reads and writes); ad-hoc queue evaluations return plain dicts.

pub mod planner;
pub mod types;
