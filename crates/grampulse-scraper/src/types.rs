//! Response shapes for the platform's `web_profile_info` endpoint.
//!
//! Only the fields the pipeline consumes are modeled; the raw profile
//! object is stored separately as untyped JSON for the passthrough
//! endpoint. Counters nest one level deep (`{"count": N}`), captions
//! arrive as an edge list that is empty for caption-less posts, and
//! `end_cursor` is `null` on the final page.

use serde::{Deserialize, Serialize};

/// Top-level response from `GET /api/v1/users/web_profile_info`.
#[derive(Debug, Deserialize)]
pub struct WebProfileResponse {
    pub data: ProfileData,
}

#[derive(Debug, Deserialize)]
pub struct ProfileData {
    pub user: ProfileUser,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUser {
    #[serde(default)]
    pub username: Option<String>,
    pub edge_owner_to_timeline_media: TimelineMedia,
}

#[derive(Debug, Deserialize)]
pub struct TimelineMedia {
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct MediaEdge {
    pub node: MediaNode,
}

/// One post in the timeline.
#[derive(Debug, Deserialize)]
pub struct MediaNode {
    pub id: String,
    #[serde(default)]
    pub shortcode: Option<String>,
    /// Unix seconds (UTC) the post was published.
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub edge_media_to_caption: CaptionEdges,
    pub edge_media_to_comment: CountField,
    pub edge_liked_by: CountField,
}

#[derive(Debug, Deserialize)]
pub struct CountField {
    pub count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Deserialize)]
pub struct CaptionNode {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// Persisted pagination state for one account, so an interrupted scrape
/// resumes where it stopped instead of refetching from the top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageCursor {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

impl PageCursor {
    /// Cursor state recorded after the final page.
    #[must_use]
    pub fn exhausted() -> Self {
        Self {
            end_cursor: None,
            has_next_page: false,
        }
    }
}
