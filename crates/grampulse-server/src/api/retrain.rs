use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grampulse_core::RawPost;
use grampulse_engine::{extract, train};
use grampulse_store::{get_json, posts_key, put_json, MODEL_KEY};

use crate::middleware::RequestId;

use super::{map_engine_error, map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
pub(super) struct RetrainRequest {
    /// Account whose stored posts to train on. Falls back to the
    /// configured default identity.
    #[serde(default)]
    identity: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RetrainData {
    identity: String,
    sample_count: usize,
    mean_absolute_error: f64,
    trained_at: DateTime<Utc>,
}

/// Trains a fresh model from stored posts, persists the artifact, and
/// swaps it into the live registry.
pub(super) async fn retrain(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<RetrainRequest>>,
) -> Result<Json<ApiResponse<RetrainData>>, ApiError> {
    let identity = body
        .and_then(|Json(b)| b.identity)
        .unwrap_or_else(|| state.default_identity.clone());

    let posts: Vec<RawPost> = get_json(state.store.as_ref(), &posts_key(&identity))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "no_data",
                format!("no posts collected for {identity}"),
            )
        })?;

    let table = extract(&posts);
    let artifact = train(&table).map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    put_json(state.store.as_ref(), MODEL_KEY, &artifact)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    tracing::info!(
        identity = %identity,
        samples = artifact.sample_count,
        mae = artifact.mean_absolute_error,
        "retrained likes model"
    );

    let data = RetrainData {
        identity,
        sample_count: artifact.sample_count,
        mean_absolute_error: artifact.mean_absolute_error,
        trained_at: artifact.trained_at,
    };
    state.registry.install(artifact);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
