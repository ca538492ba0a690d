use axum::{extract::State, Extension, Json};
use serde::Serialize;

use grampulse_core::RawPost;
use grampulse_engine::{aggregate, TopPost, TrendEntry};
use grampulse_store::{get_json, posts_key};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatsData {
    stats: Vec<RawPost>,
    best_time: Option<String>,
    best_day: Option<&'static str>,
    top_post: Option<TopPost>,
    engagement_trend: Vec<TrendEntry>,
}

/// Engagement summary for the configured identity's stored posts.
pub(super) async fn get_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StatsData>>, ApiError> {
    let posts: Vec<RawPost> = get_json(state.store.as_ref(), &posts_key(&state.default_identity))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "no_data",
                format!("no posts collected for {}", state.default_identity),
            )
        })?;

    let summary = aggregate(&posts);
    let best_time = summary.best_hour.map(|hour| format!("{hour}:00"));

    Ok(Json(ApiResponse {
        data: StatsData {
            stats: posts,
            best_time,
            best_day: summary.best_day,
            top_post: summary.top_post,
            engagement_trend: summary.engagement_trend,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
