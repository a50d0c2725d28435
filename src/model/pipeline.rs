//! Feature transform pipeline
//!
//! Min-max normalization, then standardization. The classifier was trained on
//! vectors produced in exactly this order; swapping the steps yields wrong
//! predictions without any error, so the order is fixed by construction.

use super::{FeatureTransform, ModelError};

pub struct TransformPipeline {
    min_max: Box<dyn FeatureTransform>,
    standard: Box<dyn FeatureTransform>,
}

impl TransformPipeline {
    pub fn new(min_max: Box<dyn FeatureTransform>, standard: Box<dyn FeatureTransform>) -> Self {
        Self { min_max, standard }
    }

    pub fn apply(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        let normalized = self.min_max.transform(features)?;
        self.standard.transform(&normalized)
    }
}
