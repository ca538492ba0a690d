use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PredictRequest {
    pub hour: i64,
    pub day: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PredictData {
    predicted_likes: u64,
}

/// Predicts likes for a hypothetical posting slot using the currently
/// installed model.
pub(super) async fn predict_likes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<ApiResponse<PredictData>>, ApiError> {
    let predicted_likes = state
        .registry
        .predict(request.hour, &request.day)
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: PredictData { predicted_likes },
        meta: ResponseMeta::new(req_id.0),
    }))
}
