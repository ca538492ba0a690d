//! Descriptive engagement statistics over a raw post collection.
//!
//! `aggregate` is a pure function: it never persists anything and never
//! fails. Posts with unparseable timestamps are excluded from the
//! time-based figures (best hour, best day, trend) but still compete for
//! top post, which only needs counts.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use grampulse_core::{RawPost, WEEKDAY_NAMES};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Classification applied when consecutive posts have identical
/// engagement. The reference behavior folds zero change into the
/// downtrend bucket; kept as a named policy constant so the choice is
/// visible and testable.
pub const FLAT_CHANGE_TREND: Trend = Trend::Down;

/// The single post with the highest engagement (likes + comments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPost {
    pub post_id: String,
    pub engagement: u64,
    pub timestamp: String,
}

/// One step of the pairwise engagement trend between consecutive posts
/// in timestamp order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendEntry {
    pub from: String,
    pub to: String,
    pub trend: Trend,
    /// `engagement(current) - engagement(previous)`.
    pub change: i64,
}

/// Aggregated statistics for one account's posts. All fields are `None`
/// (or empty) when the input has no usable data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngagementSummary {
    /// Hour of day (0..=23) with the highest total likes.
    pub best_hour: Option<u32>,
    /// Canonical weekday name with the highest total likes.
    pub best_day: Option<&'static str>,
    pub top_post: Option<TopPost>,
    pub engagement_trend: Vec<TrendEntry>,
}

/// Computes the full statistics bundle for a post collection.
///
/// Deterministic tie-breaks:
/// - best hour: lowest hour among tied totals (ascending scan);
/// - best day: earliest day in Monday..Sunday order among tied totals;
/// - top post: first post in input order among tied engagement.
#[must_use]
pub fn aggregate(posts: &[RawPost]) -> EngagementSummary {
    let dated: Vec<(&RawPost, DateTime<Utc>)> = posts
        .iter()
        .filter_map(|p| p.published_at().map(|dt| (p, dt)))
        .collect();

    EngagementSummary {
        best_hour: best_hour(&dated),
        best_day: best_day(&dated),
        top_post: top_post(posts),
        engagement_trend: engagement_trend(&dated),
    }
}

fn best_hour(dated: &[(&RawPost, DateTime<Utc>)]) -> Option<u32> {
    let mut likes_per_hour: BTreeMap<u32, u64> = BTreeMap::new();
    for (post, published) in dated {
        *likes_per_hour.entry(published.hour()).or_insert(0) += post.likes_count;
    }

    // BTreeMap iterates hours ascending; strictly-greater keeps the
    // first (lowest) hour on ties.
    let mut best: Option<(u32, u64)> = None;
    for (hour, total) in likes_per_hour {
        if best.is_none_or(|(_, best_total)| total > best_total) {
            best = Some((hour, total));
        }
    }
    best.map(|(hour, _)| hour)
}

fn best_day(dated: &[(&RawPost, DateTime<Utc>)]) -> Option<&'static str> {
    let mut likes_per_day = [0u64; 7];
    let mut seen = [false; 7];
    for (post, published) in dated {
        let idx = published.weekday().num_days_from_monday() as usize;
        likes_per_day[idx] += post.likes_count;
        seen[idx] = true;
    }

    // Canonical Monday..Sunday scan; strictly-greater keeps the earliest
    // day on ties. Days with no posts never win, even over a day whose
    // posts all have zero likes.
    let mut best: Option<(usize, u64)> = None;
    for idx in 0..7 {
        if !seen[idx] {
            continue;
        }
        if best.is_none_or(|(_, best_total)| likes_per_day[idx] > best_total) {
            best = Some((idx, likes_per_day[idx]));
        }
    }
    best.map(|(idx, _)| WEEKDAY_NAMES[idx])
}

fn top_post(posts: &[RawPost]) -> Option<TopPost> {
    let mut best: Option<&RawPost> = None;
    for post in posts {
        if best.is_none_or(|b| post.engagement() > b.engagement()) {
            best = Some(post);
        }
    }
    best.map(|post| TopPost {
        post_id: post.id.clone(),
        engagement: post.engagement(),
        timestamp: post.timestamp.clone(),
    })
}

fn engagement_trend(dated: &[(&RawPost, DateTime<Utc>)]) -> Vec<TrendEntry> {
    let mut ordered: Vec<&(&RawPost, DateTime<Utc>)> = dated.iter().collect();
    // Stable sort: posts sharing a timestamp keep input order.
    ordered.sort_by_key(|(_, published)| *published);

    ordered
        .windows(2)
        .map(|pair| {
            let (prev, _) = pair[0];
            let (curr, _) = pair[1];
            #[allow(clippy::cast_possible_wrap)]
            let change = curr.engagement() as i64 - prev.engagement() as i64;
            let trend = match change.cmp(&0) {
                std::cmp::Ordering::Greater => Trend::Up,
                std::cmp::Ordering::Equal => FLAT_CHANGE_TREND,
                std::cmp::Ordering::Less => Trend::Down,
            };
            TrendEntry {
                from: prev.timestamp.clone(),
                to: curr.timestamp.clone(),
                trend,
                change,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
