// Axum API Server Module
//
// Purpose: REST API for crop prediction (bearer protected) and soil-restoration
// lookups. All state is loaded once at startup and shared read-only.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use serde_json::Value;

use crate::auth::SharedSecret;
use crate::config::Config;
use crate::features::FeatureVector;
use crate::predictor::{CropPredictor, CropRecommendation, PredictionError};
use crate::rotation::RotationTable;

pub const MODEL_UNAVAILABLE: &str =
    "❌ Model or scaler files not loaded. Check server logs for missing files.";
pub const ROTATION_UNAVAILABLE: &str = "Soil restoration data not available.";
pub const PREDICTION_FAILED: &str = "Prediction failed. Please try again later.";
pub const MISSING_LAST_CROP: &str = "Please provide the last harvested crop.";
pub const MALFORMED_BODY: &str = "Request body must be a JSON object";

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    /// `None` when any model artifact failed to load
    pub predictor: Option<Arc<CropPredictor>>,
    /// `None` when the rotation dataset failed to load
    pub rotation: Option<Arc<RotationTable>>,
    pub secret: Arc<SharedSecret>,
}

impl AppState {
    /// Load artifacts and dataset named by the config
    ///
    /// Load failures are logged and leave the matching endpoint answering 500;
    /// the server itself still starts.
    pub fn load(config: &Config) -> Self {
        tracing::info!("Loading crop classifier and scalers...");
        let predictor = match CropPredictor::load(
            &config.model_path,
            &config.min_max_scaler_path,
            &config.standard_scaler_path,
            config.bounds,
        ) {
            Ok(p) => Some(Arc::new(p)),
            Err(e) => {
                tracing::warn!("Prediction disabled: {:#}", e);
                None
            }
        };

        tracing::info!("Loading rotation dataset...");
        let rotation = match RotationTable::load_csv(&config.rotation_data_path) {
            Ok(t) => {
                if t.is_empty() {
                    tracing::warn!("Rotation dataset has no rows");
                }
                Some(Arc::new(t))
            }
            Err(e) => {
                tracing::warn!("Soil restoration disabled: {:#}", e);
                None
            }
        };

        let secret = SharedSecret::new(config.api_token.as_deref());
        if !secret.is_configured() {
            tracing::warn!("API_TOKEN not set; /api/predict will reject every request");
        }

        Self::from_parts(predictor, rotation, secret)
    }

    pub fn from_parts(
        predictor: Option<Arc<CropPredictor>>,
        rotation: Option<Arc<RotationTable>>,
        secret: SharedSecret,
    ) -> Self {
        Self {
            predictor,
            rotation,
            secret: Arc::new(secret),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/predict", post(predict))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        // Health check
        .route("/", get(health_check))

        // Rotation advice (public)
        .route("/api/soil-restoration", post(soil_restoration))

        .merge(protected)

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive()) // Allow all origins
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = state.secret.authorize(header) {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        return Err(AppError::Unauthorized(e.to_string()));
    }

    Ok(next.run(request).await)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Crop advisor API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model_loaded": state.predictor.is_some(),
        "rotation_loaded": state.rotation.is_some(),
    }))
}

/// POST /api/predict
///
/// Body: `{N, P, K, temperature, humidity, ph, rainfall}` (numbers or numeric strings)
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CropRecommendation>, AppError> {
    let predictor = state
        .predictor
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable(MODEL_UNAVAILABLE.to_string()))?;

    let body = json_object(payload)?;
    tracing::debug!("Received prediction input: {:?}", body);

    let features = FeatureVector::from_json_object(&body).map_err(AppError::Validation)?;

    match predictor.predict(&features) {
        Ok(recommendation) => {
            tracing::info!("Predicted crop: {}", recommendation.crop);
            Ok(Json(recommendation))
        }
        Err(PredictionError::Invalid(errors)) => {
            tracing::debug!("Rejected prediction input: {:?}", errors);
            Err(AppError::Validation(errors))
        }
        Err(e @ PredictionError::Failed(_)) => {
            tracing::error!("Prediction failed for {:?}: {}", features, e);
            Err(AppError::Internal(PREDICTION_FAILED.to_string()))
        }
    }
}

/// POST /api/soil-restoration
///
/// Body: `{"last_crop": "<name>"}`
async fn soil_restoration(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let table = state
        .rotation
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable(ROTATION_UNAVAILABLE.to_string()))?;

    let body = json_object(payload)?;
    let last_crop = body
        .get("last_crop")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_LAST_CROP.to_string()))?;

    let recommendations = table.recommend(last_crop);
    tracing::debug!(
        "Soil restoration for '{}' returned {} rows",
        last_crop,
        recommendations.len()
    );

    if recommendations.is_empty() {
        return Ok(Json(serde_json::json!({
            "recommendations": [],
            "message": format!("No recommendations found for '{}'.", last_crop),
        })));
    }

    Ok(Json(serde_json::json!({
        "recommendations": recommendations,
    })))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn json_object(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<serde_json::Map<String, Value>, AppError> {
    match payload {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(_) => Err(AppError::BadRequest(MALFORMED_BODY.to_string())),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            Err(AppError::BadRequest(MALFORMED_BODY.to_string()))
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    /// Every violated input rule, reported as a JSON array
    Validation(Vec<String>),
    BadRequest(String),
    Unauthorized(String),
    ServiceUnavailable(String),
    /// Generic message only; details go to the server log
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Value::from(errors)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Value::from(msg)),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Value::from(msg)),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(msg))
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, Value::from(msg)),
        };

        (status, Json(serde_json::json!({ "error": error }))).into_response()
    }
}
