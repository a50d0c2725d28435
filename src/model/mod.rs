//! Pre-trained model artifacts
//!
//! The scalers and classifier are fitted elsewhere and exported as JSON.
//! This module only deserializes and calls them:
//! - `scaler`: min-max and standard scalers (`FeatureTransform`)
//! - `pipeline`: the two scalers chained in training order
//! - `forest`: decision-forest classifier (`Classifier`)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod forest;
pub mod pipeline;
pub mod scaler;

pub use forest::DecisionForest;
pub use pipeline::TransformPipeline;
pub use scaler::{MinMaxScaler, StandardScaler};

/// Failures raised while calling a loaded artifact
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("malformed artifact: {0}")]
    Malformed(String),
}

/// Pre-fitted rescaling step
pub trait FeatureTransform: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Pre-trained classifier returning a numeric class label
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError>;
}

/// Read and parse a JSON artifact
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact: {:?}", path))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse artifact JSON: {:?}", path))
}

pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch { expected, actual })
    }
}
