mod predict;
mod retrain;
mod scrape;
mod stats;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use grampulse_engine::{EngineError, ModelRegistry};
use grampulse_scraper::{InstagramClient, ScraperError};
use grampulse_store::{BlobStore, StoreError};

use crate::middleware::{request_id, require_retrain_secret, RequestId, RetrainAuth};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub registry: Arc<ModelRegistry>,
    pub scraper: Arc<InstagramClient>,
    /// Account whose stored posts back `/api/stats` and default retrains.
    pub default_identity: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "no_data" | "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" => StatusCode::BAD_REQUEST,
            "model_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps pipeline errors onto the wire taxonomy. Invalid input surfaces
/// as 400, a missing model as 503 (distinct from a failed retrain at
/// 500, so callers know a retrain may fix it).
pub(super) fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::InvalidHour { .. } | EngineError::InvalidDay { .. } => {
            ApiError::new(request_id, "bad_request", error.to_string())
        }
        EngineError::NoData => ApiError::new(request_id, "no_data", error.to_string()),
        EngineError::ModelUnavailable => {
            ApiError::new(request_id, "model_unavailable", error.to_string())
        }
        EngineError::TrainingFailure { .. } => {
            ApiError::new(request_id, "training_failed", error.to_string())
        }
        EngineError::ArtifactMismatch { .. } => {
            tracing::error!(error = %error, "corrupt model artifact");
            ApiError::new(request_id, "internal_error", "model artifact is corrupt")
        }
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    tracing::error!(error = %error, "blob store operation failed");
    ApiError::new(request_id, "internal_error", "storage operation failed")
}

pub(super) fn map_scraper_error(request_id: String, error: &ScraperError) -> ApiError {
    match error {
        ScraperError::ProfileNotFound { .. } => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "scrape failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: RetrainAuth) -> Router<AppState> {
    Router::new()
        .route("/api/retrain", post(retrain::retrain))
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_retrain_secret,
        ))
}

pub fn build_app(state: AppState, auth: RetrainAuth) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/predict/likes", post(predict::predict_likes))
        .route("/api/scrape/{identity}", post(scrape::scrape_identity))
        .route("/api/profile/{identity}", get(scrape::get_profile));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    model: &'static str,
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let model = if state.registry.snapshot().is_some() {
        "loaded"
    } else {
        "absent"
    };
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                model,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
