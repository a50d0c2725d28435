//! Crop Advisor
//!
//! Backend for two farming questions:
//! - Which crop suits a soil/climate profile (`predictor`)
//! - What to grow next to restore the soil after a harvest (`rotation`)
//!
//! Layout:
//! - `features` / `validation`: request input and agronomic sanity checks
//! - `model/`: scalers and the decision-forest classifier, loaded from JSON
//! - `crops`: label table and growing tips
//! - `utils/`: crop-name normalization and fuzzy matching
//! - `config` / `auth`: environment settings and bearer-token check
//! - `api_server`: Axum routes (feature `api`)

pub mod auth;
pub mod config;
pub mod crops;
pub mod features;
pub mod model;
pub mod predictor;
pub mod rotation;
pub mod utils;
pub mod validation;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use config::Config;
pub use features::FeatureVector;
pub use predictor::{CropPredictor, CropRecommendation, PredictionError};
pub use rotation::{RotationRecord, RotationTable};
pub use validation::ValidationBounds;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
