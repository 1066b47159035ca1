//! HTTP routes over a [`PredictionService`].

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::catalog::{Catalog, catalog};
use crate::error::ApiError;
use crate::service::{HealthStatus, PredictionService};
use crate::types::{ModelInfo, PredictionResult};

type SharedService = Arc<PredictionService>;

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub model_features: Option<usize>,
}

/// Response for `GET /model-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    #[serde(flatten)]
    pub info: ModelInfo,
    pub message: String,
}

/// Build the router with all endpoints.
///
/// - `POST /predict`
/// - `GET /health`
/// - `GET /model-info`
/// - `GET /features`
/// - `GET /`
///
/// Anything else answers 404 with a JSON error body.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/model-info", get(model_info))
        .route("/features", get(features))
        .fallback(not_found)
        .with_state(service)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    service: SharedService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, model_loaded = service.is_model_loaded(), "listening");
    }
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn root(State(service): State<SharedService>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Price Prediction Model API is running!".to_string(),
        status: "active".to_string(),
        model_features: service.model().map(|m| m.expected_width()),
    })
}

async fn predict(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Json<PredictionResult>, ApiError> {
    Ok(Json(service.predict_slice(&body)?))
}

async fn health(State(service): State<SharedService>) -> Json<HealthStatus> {
    Json(service.health())
}

async fn model_info(
    State(service): State<SharedService>,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    let info = service.model_info()?;
    let message = format!(
        "Model expects {} features; requests supply the first 7",
        info.n_features_in
    );
    Ok(Json(ModelInfoResponse { info, message }))
}

async fn features() -> Json<&'static Catalog> {
    Json(catalog())
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}
