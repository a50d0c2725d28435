//! Min-max and standard scalers
//!
//! Field names follow the fitted-attribute names of the exporting library
//! (`scale_`, `min_`, `mean_`) so exported files load unchanged.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{check_dimension, load_json, FeatureTransform, ModelError};

/// `x * scale + min`, per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    #[serde(rename = "scale_")]
    pub scale: Vec<f64>,
    #[serde(rename = "min_")]
    pub min: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(scale: Vec<f64>, min: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self { scale, min };
        scaler.check()?;
        Ok(scaler)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let scaler: Self = load_json(path)?;
        scaler.check()?;
        Ok(scaler)
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.scale.is_empty() || self.scale.len() != self.min.len() {
            return Err(ModelError::Malformed(format!(
                "min-max scaler has {} scale and {} min entries",
                self.scale.len(),
                self.min.len()
            )));
        }
        Ok(())
    }
}

impl FeatureTransform for MinMaxScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimension(self.scale.len(), features.len())?;

        Ok(features
            .iter()
            .zip(self.scale.iter().zip(&self.min))
            .map(|(x, (scale, min))| x * scale + min)
            .collect())
    }
}

/// `(x - mean) / scale`, per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(rename = "mean_")]
    pub mean: Vec<f64>,
    #[serde(rename = "scale_")]
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.check()?;
        Ok(scaler)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let scaler: Self = load_json(path)?;
        scaler.check()?;
        Ok(scaler)
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.scale.is_empty() || self.scale.len() != self.mean.len() {
            return Err(ModelError::Malformed(format!(
                "standard scaler has {} mean and {} scale entries",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }
}

impl FeatureTransform for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_dimension(self.scale.len(), features.len())?;

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant feature at fit time: centre only
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_max_transform() {
        // Fitted on [0, 10] -> scale 0.1, min 0
        let scaler = MinMaxScaler::new(vec![0.1, 0.5], vec![0.0, -1.0]).unwrap();
        let out = scaler.transform(&[5.0, 4.0]).unwrap();
        assert_relative_eq!(out[0], 0.5);
        assert_relative_eq!(out[1], 1.0);
    }

    #[test]
    fn test_standard_transform() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.0]).unwrap();
        let out = scaler.transform(&[14.0, 3.0]).unwrap();
        assert_relative_eq!(out[0], 2.0);
        // zero scale falls back to 1
        assert_relative_eq!(out[1], 3.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let scaler = MinMaxScaler::new(vec![1.0; 7], vec![0.0; 7]).unwrap();
        assert_eq!(
            scaler.transform(&[1.0; 6]),
            Err(ModelError::DimensionMismatch { expected: 7, actual: 6 })
        );
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(MinMaxScaler::new(vec![1.0, 2.0], vec![0.0]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_parse_exported_attributes() {
        let json = r#"{"scale_": [0.5, 0.25], "min_": [0.0, 1.0]}"#;
        let scaler: MinMaxScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.scale, vec![0.5, 0.25]);

        let json = r#"{"mean_": [1.0], "scale_": [2.0]}"#;
        let scaler: StandardScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.mean, vec![1.0]);
    }
}
