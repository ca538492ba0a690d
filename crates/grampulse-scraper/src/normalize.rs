//! Normalization from raw timeline nodes to [`grampulse_core::RawPost`],
//! plus the id-keyed merge used when folding a fresh scrape into the
//! stored collection.

use std::collections::HashSet;

use chrono::DateTime;
use grampulse_core::RawPost;

use crate::types::MediaNode;

/// Converts one timeline node into a [`RawPost`].
///
/// The publish instant arrives as unix seconds and is rendered as an
/// RFC 3339 UTC string. An out-of-range value yields an empty timestamp;
/// such records survive normalization and storage but are excluded from
/// feature extraction downstream.
#[must_use]
pub fn normalize_post(node: MediaNode) -> RawPost {
    let timestamp = DateTime::from_timestamp(node.taken_at_timestamp, 0).map_or_else(
        || {
            tracing::debug!(post_id = %node.id, raw = node.taken_at_timestamp,
                "post has an out-of-range publish timestamp");
            String::new()
        },
        |dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    );

    let caption = node
        .edge_media_to_caption
        .edges
        .into_iter()
        .next()
        .map(|edge| edge.node.text);
    let hashtags = caption.as_deref().map_or_else(Vec::new, extract_hashtags);

    RawPost {
        id: node.id,
        shortcode: node.shortcode,
        likes_count: node.edge_liked_by.count,
        comments_count: node.edge_media_to_comment.count,
        timestamp,
        caption,
        hashtags,
    }
}

fn extract_hashtags(caption: &str) -> Vec<String> {
    caption
        .split_whitespace()
        .filter(|word| word.starts_with('#') && word.len() > 1)
        .map(ToOwned::to_owned)
        .collect()
}

/// Merges freshly scraped posts into an existing collection, deduplicating
/// by post id. The first-seen record wins: repeated scrapes never mutate a
/// post already in the store, and ordering is existing-first followed by
/// genuinely new posts in scrape order.
#[must_use]
pub fn merge_posts(existing: Vec<RawPost>, fresh: Vec<RawPost>) -> Vec<RawPost> {
    let mut seen: HashSet<String> = existing.iter().map(|p| p.id.clone()).collect();
    let mut merged = existing;
    for post in fresh {
        if seen.insert(post.id.clone()) {
            merged.push(post);
        }
    }
    merged
}
