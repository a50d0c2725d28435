//! Agronomic feature vector
//!
//! The seven soil and climate measurements fed to the crop classifier.
//! Column order is fixed by the fitted scalers and classifier:
//! N, P, K, temperature, humidity, pH, rainfall.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of features the scalers and classifier were fitted on
pub const FEATURE_COUNT: usize = 7;

/// Request field names in model column order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

/// One set of soil and climate readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    pub ph: f64,
    /// Millimetres
    pub rainfall: f64,
}

impl FeatureVector {
    /// Build from values already in model column order
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall] = values;
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }

    /// Coerce a JSON request object into a feature vector
    ///
    /// - numbers are taken as-is
    /// - strings are parsed after trimming ("42", " 6.5 ")
    /// - missing or null fields default to 0
    /// - anything else is reported as "<field> must be a number"
    ///
    /// All bad fields are reported together, in column order.
    pub fn from_json_object(body: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            match body.get(name).map(coerce_number).unwrap_or(Some(0.0)) {
                Some(v) => *slot = v,
                None => errors.push(format!("❌ {} must be a number.", name)),
            }
        }

        if errors.is_empty() {
            Ok(Self::from_array(values))
        } else {
            Err(errors)
        }
    }

    /// Values in model column order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_order_matches_field_names() {
        let v = FeatureVector::from_array([90.0, 42.0, 43.0, 25.0, 80.0, 6.5, 200.0]);
        assert_eq!(v.nitrogen, 90.0);
        assert_eq!(v.ph, 6.5);
        assert_eq!(v.to_array(), [90.0, 42.0, 43.0, 25.0, 80.0, 6.5, 200.0]);
    }

    #[test]
    fn test_serde_uses_request_field_names() {
        let json = r#"{"N":1,"P":2,"K":3,"temperature":4,"humidity":5,"ph":6,"rainfall":7}"#;
        let v: FeatureVector = serde_json::from_str(json).unwrap();
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        let back = serde_json::to_value(v).unwrap();
        for name in FEATURE_NAMES {
            assert!(back.get(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_json_coercion_accepts_numeric_strings() {
        let body = json!({
            "N": "90", "P": 42, "K": " 43 ",
            "temperature": 25.5, "humidity": "80", "ph": "6.5", "rainfall": 200
        });
        let v = FeatureVector::from_json_object(body.as_object().unwrap()).unwrap();
        assert_eq!(v.to_array(), [90.0, 42.0, 43.0, 25.5, 80.0, 6.5, 200.0]);
    }

    #[test]
    fn test_json_coercion_defaults_missing_to_zero() {
        let body = json!({ "N": 10, "ph": null });
        let v = FeatureVector::from_json_object(body.as_object().unwrap()).unwrap();
        assert_eq!(v.to_array(), [10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_json_coercion_reports_every_bad_field() {
        let body = json!({ "N": "lots", "P": true, "K": 3, "rainfall": [1] });
        let errors = FeatureVector::from_json_object(body.as_object().unwrap()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "❌ N must be a number.".to_string(),
                "❌ P must be a number.".to_string(),
                "❌ rainfall must be a number.".to_string(),
            ]
        );
    }
}
