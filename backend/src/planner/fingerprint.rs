//! Configuration fingerprinting
//!
//! A plan output records the SHA-256 of the configuration that produced it,
//! so downstream consumers can tell which scenario catalog and parameters a
//! result set belongs to.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::engine::PlanningError;

/// Recursively sort all object keys for a canonical representation
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Hex SHA-256 of the canonical JSON form of `config`
///
/// Key order never affects the hash; any value change does.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, PlanningError> {
    let value = serde_json::to_value(config)?;
    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
