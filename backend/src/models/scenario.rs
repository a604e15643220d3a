//! What-if scenarios
//!
//! A scenario is a set of business levers applied uniformly to every forecast
//! interval. The catalog is passed explicitly into each run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::ParameterError;

/// Named set of staffing levers
///
/// # Example
/// ```
/// use wfm_planner_core_rs::Scenario;
///
/// let surge = Scenario::new("surge", "Demand surge (+25%)").with_demand_multiplier(1.25);
/// assert_eq!(surge.demand_multiplier, 1.25);
/// assert_eq!(surge.wage_multiplier, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,

    /// Factor applied to forecast volume
    #[serde(default = "unit")]
    pub demand_multiplier: f64,

    /// Absolute change to shrinkage (e.g. 0.05 = +5 percentage points)
    #[serde(default)]
    pub shrinkage_delta: f64,

    /// Factor applied to hourly cost
    #[serde(default = "unit")]
    pub wage_multiplier: f64,

    /// Fraction scheduled above requirement (e.g. 0.08 = 8% buffer)
    #[serde(default)]
    pub staffing_buffer: f64,
}

fn unit() -> f64 {
    1.0
}

impl Scenario {
    /// Neutral scenario: no demand, shrinkage or wage change and no buffer
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            demand_multiplier: 1.0,
            shrinkage_delta: 0.0,
            wage_multiplier: 1.0,
            staffing_buffer: 0.0,
        }
    }

    pub fn with_demand_multiplier(mut self, multiplier: f64) -> Self {
        self.demand_multiplier = multiplier;
        self
    }

    pub fn with_shrinkage_delta(mut self, delta: f64) -> Self {
        self.shrinkage_delta = delta;
        self
    }

    pub fn with_wage_multiplier(mut self, multiplier: f64) -> Self {
        self.wage_multiplier = multiplier;
        self
    }

    pub fn with_staffing_buffer(mut self, buffer: f64) -> Self {
        self.staffing_buffer = buffer;
        self
    }

    /// Levers must be finite; multipliers and buffer non-negative
    pub fn validate(&self) -> Result<(), ParameterError> {
        let invalid = |reason: &str| ParameterError::InvalidScenario {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id is empty"));
        }
        if !self.demand_multiplier.is_finite() || self.demand_multiplier < 0.0 {
            return Err(invalid("demand_multiplier must be a non-negative number"));
        }
        if !self.shrinkage_delta.is_finite() {
            return Err(invalid("shrinkage_delta must be finite"));
        }
        if !self.wage_multiplier.is_finite() || self.wage_multiplier < 0.0 {
            return Err(invalid("wage_multiplier must be a non-negative number"));
        }
        if !self.staffing_buffer.is_finite() || self.staffing_buffer < 0.0 {
            return Err(invalid("staffing_buffer must be a non-negative number"));
        }
        Ok(())
    }
}

/// The standard comparison set: baseline plus one-lever variations
pub fn default_catalog() -> Vec<Scenario> {
    vec![
        Scenario::new("base", "Baseline").with_staffing_buffer(0.08),
        Scenario::new("hi_demand", "High demand (+10%)")
            .with_demand_multiplier(1.10)
            .with_staffing_buffer(0.08),
        Scenario::new("lo_demand", "Low demand (-10%)")
            .with_demand_multiplier(0.90)
            .with_staffing_buffer(0.08),
        Scenario::new("hi_shrink", "Shrinkage up (+5pp)")
            .with_shrinkage_delta(0.05)
            .with_staffing_buffer(0.08),
        Scenario::new("lo_shrink", "Shrinkage down (-5pp)")
            .with_shrinkage_delta(-0.05)
            .with_staffing_buffer(0.08),
        Scenario::new("wage_up", "Wage up (+10%)")
            .with_wage_multiplier(1.10)
            .with_staffing_buffer(0.08),
        Scenario::new("aggressive", "Aggressive service (buffer 20%)").with_staffing_buffer(0.20),
    ]
}

/// Every scenario valid, at least one present, ids unique
pub fn validate_catalog(catalog: &[Scenario]) -> Result<(), ParameterError> {
    if catalog.is_empty() {
        return Err(ParameterError::EmptyCatalog);
    }
    let mut seen = HashSet::new();
    for scenario in catalog {
        scenario.validate()?;
        if !seen.insert(scenario.id.as_str()) {
            return Err(ParameterError::DuplicateScenario(scenario.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 7);
        assert!(validate_catalog(&catalog).is_ok());
        assert_eq!(catalog[0].id, "base");
        assert_eq!(catalog[0].demand_multiplier, 1.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let catalog = vec![Scenario::new("a", "A"), Scenario::new("a", "Again")];
        assert_eq!(
            validate_catalog(&catalog),
            Err(ParameterError::DuplicateScenario("a".to_string()))
        );
    }

    #[test]
    fn test_negative_buffer_rejected() {
        let scenario = Scenario::new("cut", "Cut").with_staffing_buffer(-0.1);
        assert!(matches!(
            scenario.validate(),
            Err(ParameterError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn test_missing_levers_default_to_neutral() {
        let scenario: Scenario =
            serde_json::from_str(r#"{"id": "x", "name": "X", "wage_multiplier": 1.2}"#).unwrap();
        assert_eq!(scenario.demand_multiplier, 1.0);
        assert_eq!(scenario.shrinkage_delta, 0.0);
        assert_eq!(scenario.wage_multiplier, 1.2);
    }
}
