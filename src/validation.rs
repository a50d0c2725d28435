//! Agronomic input validation
//!
//! Range checks applied to a feature vector before it reaches the scalers.
//! Every rule is evaluated; all violations are reported together so the
//! caller can correct the whole form in one pass.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

pub const NPK_NEGATIVE: &str = "❌ N, P, K cannot be negative.";
pub const NPK_TOO_LOW: &str = "❌ Soil nutrients (N, P, K) too low for any crop.";

/// Below this, a nutrient counts as "low" for the all-three-low rule
pub const NPK_LOW_THRESHOLD: f64 = 5.0;

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN is never contained
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Accepted ranges for the climate and soil readings
///
/// Humidity lower bound differs between deployments (14 vs 20),
/// so it is carried here rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationBounds {
    pub rainfall: Range,
    pub temperature: Range,
    pub humidity: Range,
    pub ph: Range,
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self {
            rainfall: Range::new(20.0, 400.0),
            temperature: Range::new(10.0, 45.0),
            humidity: Range::new(14.0, 95.0),
            ph: Range::new(4.5, 9.0),
        }
    }
}

impl ValidationBounds {
    /// Collect every violated rule, in rule order
    ///
    /// Returns an empty vector for valid input.
    pub fn violations(&self, features: &FeatureVector) -> Vec<String> {
        let mut errors = Vec::new();
        let (n, p, k) = (features.nitrogen, features.phosphorus, features.potassium);

        if n < 0.0 || p < 0.0 || k < 0.0 {
            errors.push(NPK_NEGATIVE.to_string());
        }
        if n < NPK_LOW_THRESHOLD && p < NPK_LOW_THRESHOLD && k < NPK_LOW_THRESHOLD {
            errors.push(NPK_TOO_LOW.to_string());
        }
        if !self.rainfall.contains(features.rainfall) {
            errors.push(format!(
                "❌ Rainfall not suitable ({}–{} mm).",
                self.rainfall.min, self.rainfall.max
            ));
        }
        if !self.temperature.contains(features.temperature) {
            errors.push(format!(
                "❌ Temperature not suitable ({}–{}°C).",
                self.temperature.min, self.temperature.max
            ));
        }
        if !self.humidity.contains(features.humidity) {
            errors.push(format!(
                "❌ Humidity not suitable ({}–{}%).",
                self.humidity.min, self.humidity.max
            ));
        }
        if !self.ph.contains(features.ph) {
            errors.push(format!(
                "❌ Soil pH not suitable ({}–{}).",
                self.ph.min, self.ph.max
            ));
        }

        errors
    }

    /// `Ok(())` when valid, otherwise the non-empty violation list
    pub fn validate(&self, features: &FeatureVector) -> Result<(), Vec<String>> {
        let errors = self.violations(features);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
