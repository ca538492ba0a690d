use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use grampulse_core::RawPost;
use grampulse_scraper::{merge_posts, PageCursor};
use grampulse_store::{cursor_key, get_json, posts_key, profile_key, put_json};

use crate::middleware::RequestId;

use super::{map_scraper_error, map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeData {
    identity: String,
    new_posts: usize,
    total_posts: usize,
    has_more: bool,
}

/// Fetches timeline pages for one account, merges them into the stored
/// post set, and persists the resume cursor.
pub(super) async fn scrape_identity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(identity): Path<String>,
) -> Result<Json<ApiResponse<ScrapeData>>, ApiError> {
    let store = state.store.as_ref();
    let map_store = |e| map_store_error(req_id.0.clone(), &e);

    let resume: Option<PageCursor> = get_json(store, &cursor_key(&identity))
        .await
        .map_err(map_store)?;

    let outcome = state
        .scraper
        .fetch_all_posts(&identity, resume)
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    let existing: Vec<RawPost> = get_json(store, &posts_key(&identity))
        .await
        .map_err(map_store)?
        .unwrap_or_default();
    let known = existing.len();

    let merged = merge_posts(existing, outcome.posts);
    let new_posts = merged.len() - known;
    let total_posts = merged.len();

    put_json(store, &posts_key(&identity), &merged)
        .await
        .map_err(map_store)?;
    if !outcome.profile.is_null() {
        put_json(store, &profile_key(&identity), &outcome.profile)
            .await
            .map_err(map_store)?;
    }
    put_json(store, &cursor_key(&identity), &outcome.cursor)
        .await
        .map_err(map_store)?;

    tracing::info!(
        identity = %identity,
        new_posts,
        total_posts,
        has_more = outcome.cursor.has_next_page,
        "scrape finished"
    );

    Ok(Json(ApiResponse {
        data: ScrapeData {
            identity,
            new_posts,
            total_posts,
            has_more: outcome.cursor.has_next_page,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Raw stored profile passthrough for one account.
pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(identity): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let profile: Value = get_json(state.store.as_ref(), &profile_key(&identity))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("no profile stored for {identity}"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: profile,
        meta: ResponseMeta::new(req_id.0),
    }))
}
