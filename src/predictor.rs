//! Crop prediction pipeline
//!
//! validate -> min-max -> standardize -> classify -> name + tip
//!
//! Validation runs first and rejects the request before any artifact is
//! touched. Artifact failures are reported as `PredictionError::Failed` with
//! the underlying `ModelError` attached; nothing is retried.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::crops::CropCatalog;
use crate::features::FeatureVector;
use crate::model::{
    Classifier, DecisionForest, MinMaxScaler, ModelError, StandardScaler, TransformPipeline,
};
use crate::validation::ValidationBounds;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("prediction failed: {0}")]
    Failed(#[from] ModelError),
}

/// Successful prediction, serialized as the `/api/predict` response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropRecommendation {
    pub crop: String,
    pub tip: String,
}

pub struct CropPredictor {
    bounds: ValidationBounds,
    pipeline: TransformPipeline,
    classifier: Box<dyn Classifier>,
    catalog: CropCatalog,
}

impl CropPredictor {
    pub fn new(
        bounds: ValidationBounds,
        pipeline: TransformPipeline,
        classifier: Box<dyn Classifier>,
        catalog: CropCatalog,
    ) -> Self {
        Self {
            bounds,
            pipeline,
            classifier,
            catalog,
        }
    }

    /// Load the classifier and both scalers from their JSON artifacts
    pub fn load(
        model_path: &Path,
        min_max_path: &Path,
        standard_path: &Path,
        bounds: ValidationBounds,
    ) -> Result<Self> {
        let min_max =
            MinMaxScaler::load(min_max_path).context("Failed to load min-max scaler")?;
        tracing::info!("Loaded min-max scaler ({} features)", min_max.scale.len());

        let standard =
            StandardScaler::load(standard_path).context("Failed to load standard scaler")?;
        tracing::info!("Loaded standard scaler ({} features)", standard.scale.len());

        let forest = DecisionForest::load(model_path).context("Failed to load classifier")?;
        tracing::info!(
            "Loaded classifier ({} trees, {} classes)",
            forest.n_trees(),
            forest.classes.len()
        );

        Ok(Self::new(
            bounds,
            TransformPipeline::new(Box::new(min_max), Box::new(standard)),
            Box::new(forest),
            CropCatalog::new(),
        ))
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<CropRecommendation, PredictionError> {
        self.bounds
            .validate(features)
            .map_err(PredictionError::Invalid)?;

        let transformed = self.pipeline.apply(&features.to_array())?;
        let label = self.classifier.predict(&transformed)?;

        let crop = self.catalog.name_for(label);
        Ok(CropRecommendation {
            crop: crop.to_string(),
            tip: self.catalog.tip_for(crop).to_string(),
        })
    }
}
