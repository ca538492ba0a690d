use grampulse_core::RawPost;

use super::*;

fn post(id: &str, likes: u64, comments: u64, ts: &str) -> RawPost {
    RawPost {
        id: id.to_owned(),
        shortcode: None,
        likes_count: likes,
        comments_count: comments,
        timestamp: ts.to_owned(),
        caption: None,
        hashtags: Vec::new(),
    }
}

#[test]
fn empty_input_yields_the_no_data_summary() {
    let summary = aggregate(&[]);
    assert!(summary.best_hour.is_none());
    assert!(summary.best_day.is_none());
    assert!(summary.top_post.is_none());
    assert!(summary.engagement_trend.is_empty());
}

#[test]
fn single_post_produces_no_trend_entries() {
    let summary = aggregate(&[post("a", 10, 1, "2025-04-07T10:00:00Z")]);
    assert!(summary.engagement_trend.is_empty());
    assert_eq!(summary.best_hour, Some(10));
}

#[test]
fn worked_best_hour_and_best_day_scenario() {
    // Mon 10:00 likes=100, Mon 14:00 likes=50, Tue 14:00 likes=200.
    // Hour sums: 10 -> 100, 14 -> 250. Day sums: Monday 150, Tuesday 200.
    let posts = vec![
        post("a", 100, 0, "2025-04-07T10:00:00Z"),
        post("b", 50, 0, "2025-04-07T14:00:00Z"),
        post("c", 200, 0, "2025-04-08T14:00:00Z"),
    ];
    let summary = aggregate(&posts);
    assert_eq!(summary.best_hour, Some(14));
    assert_eq!(summary.best_day, Some("Tuesday"));
}

#[test]
fn best_hour_tie_goes_to_the_lowest_hour() {
    let posts = vec![
        post("a", 100, 0, "2025-04-07T18:00:00Z"),
        post("b", 100, 0, "2025-04-07T09:00:00Z"),
    ];
    assert_eq!(aggregate(&posts).best_hour, Some(9));
}

#[test]
fn best_day_tie_goes_to_the_earliest_weekday() {
    // Wednesday and Tuesday tie on likes; Tuesday comes first in the
    // canonical scan.
    let posts = vec![
        post("a", 70, 0, "2025-04-09T10:00:00Z"), // Wednesday
        post("b", 70, 0, "2025-04-08T10:00:00Z"), // Tuesday
    ];
    assert_eq!(aggregate(&posts).best_day, Some("Tuesday"));
}

#[test]
fn zero_like_days_still_beat_absent_days() {
    let posts = vec![post("a", 0, 3, "2025-04-12T10:00:00Z")]; // Saturday
    assert_eq!(aggregate(&posts).best_day, Some("Saturday"));
}

#[test]
fn top_post_tie_keeps_the_first_in_input_order() {
    let posts = vec![
        post("first", 50, 10, "2025-04-08T10:00:00Z"),
        post("second", 40, 20, "2025-04-07T10:00:00Z"),
    ];
    let top = aggregate(&posts).top_post.expect("top post");
    assert_eq!(top.post_id, "first");
    assert_eq!(top.engagement, 60);
}

#[test]
fn top_post_considers_posts_with_bad_timestamps() {
    let posts = vec![
        post("dated", 10, 0, "2025-04-07T10:00:00Z"),
        post("undated", 500, 50, "not-a-timestamp"),
    ];
    let summary = aggregate(&posts);
    assert_eq!(summary.top_post.expect("top post").post_id, "undated");
    // But the time-based figures only see the dated post.
    assert_eq!(summary.best_hour, Some(10));
    assert!(summary.engagement_trend.is_empty());
}

#[test]
fn three_posts_yield_two_trend_entries_with_correct_changes() {
    // Input deliberately out of timestamp order; trend sorts ascending.
    let posts = vec![
        post("c", 30, 5, "2025-04-09T10:00:00Z"), // engagement 35
        post("a", 10, 2, "2025-04-07T10:00:00Z"), // engagement 12
        post("b", 20, 0, "2025-04-08T10:00:00Z"), // engagement 20
    ];
    let trend = aggregate(&posts).engagement_trend;
    assert_eq!(trend.len(), 2);

    assert_eq!(trend[0].from, "2025-04-07T10:00:00Z");
    assert_eq!(trend[0].to, "2025-04-08T10:00:00Z");
    assert_eq!(trend[0].change, 8);
    assert_eq!(trend[0].trend, Trend::Up);

    assert_eq!(trend[1].change, 15);
    assert_eq!(trend[1].trend, Trend::Up);
}

#[test]
fn falling_engagement_is_a_downtrend() {
    let posts = vec![
        post("a", 100, 0, "2025-04-07T10:00:00Z"),
        post("b", 60, 0, "2025-04-08T10:00:00Z"),
    ];
    let trend = aggregate(&posts).engagement_trend;
    assert_eq!(trend[0].change, -40);
    assert_eq!(trend[0].trend, Trend::Down);
}

#[test]
fn zero_change_follows_the_flat_trend_policy() {
    let posts = vec![
        post("a", 50, 0, "2025-04-07T10:00:00Z"),
        post("b", 50, 0, "2025-04-08T10:00:00Z"),
    ];
    let trend = aggregate(&posts).engagement_trend;
    assert_eq!(trend[0].change, 0);
    assert_eq!(trend[0].trend, FLAT_CHANGE_TREND);
}

#[test]
fn trend_serializes_lowercase() {
    let json = serde_json::to_string(&Trend::Up).expect("serialize");
    assert_eq!(json, "\"up\"");
}
