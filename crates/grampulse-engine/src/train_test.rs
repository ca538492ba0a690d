use grampulse_core::RawPost;

use super::*;
use crate::features::extract;

fn post(id: &str, likes: u64, ts: &str) -> RawPost {
    RawPost {
        id: id.to_owned(),
        shortcode: None,
        likes_count: likes,
        comments_count: 0,
        timestamp: ts.to_owned(),
        caption: None,
        hashtags: Vec::new(),
    }
}

/// Posts spread across days and hours with a like count that rises with
/// the hour, so the fit has a real signal to pick up.
fn sample_posts() -> Vec<RawPost> {
    let mut posts = Vec::new();
    // 2025-04-07 is a Monday; cover a full week at several hours.
    for (day_offset, date) in [
        "2025-04-07", "2025-04-08", "2025-04-09", "2025-04-10", "2025-04-11", "2025-04-12",
        "2025-04-13",
    ]
    .iter()
    .enumerate()
    {
        for hour in [8u64, 13, 17, 21] {
            let likes = 40 + hour * 10 + day_offset as u64;
            posts.push(post(
                &format!("{date}-{hour}"),
                likes,
                &format!("{date}T{hour:02}:00:00Z"),
            ));
        }
    }
    posts
}

#[test]
fn training_on_an_empty_table_fails_with_no_data() {
    let err = train(&extract(&[])).unwrap_err();
    assert!(matches!(
        err,
        EngineError::TrainingFailure { reason } if reason == "no data"
    ));
}

#[test]
fn training_on_a_single_row_fails_with_no_data() {
    // ceil(0.2 * 1) = 1 held-out row leaves an empty training partition.
    let table = extract(&[post("a", 10, "2025-04-07T10:00:00Z")]);
    let err = train(&table).unwrap_err();
    assert!(matches!(
        err,
        EngineError::TrainingFailure { reason } if reason == "no data"
    ));
}

#[test]
fn artifact_column_layout_matches_the_fixed_encoding() {
    let artifact = train(&extract(&sample_posts())).expect("train");
    assert_eq!(artifact.feature_columns, feature_columns());
    assert_eq!(artifact.coefficients.len(), artifact.feature_columns.len());
    assert_eq!(artifact.sample_count, sample_posts().len());
}

#[test]
fn retraining_on_identical_input_is_reproducible() {
    let table = extract(&sample_posts());
    let first = train(&table).expect("train");
    let second = train(&table).expect("train");
    // Same seed, same split, same solver: identical fit and MAE.
    assert!((first.intercept - second.intercept).abs() < 1e-9);
    assert!((first.mean_absolute_error - second.mean_absolute_error).abs() < 1e-9);
    for (a, b) in first.coefficients.iter().zip(&second.coefficients) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn mae_is_finite_and_non_negative() {
    let artifact = train(&extract(&sample_posts())).expect("train");
    assert!(artifact.mean_absolute_error.is_finite());
    assert!(artifact.mean_absolute_error >= 0.0);
}

#[test]
fn fit_picks_up_the_hour_signal() {
    // Likes grow roughly 10 per hour in the sample; a late slot must
    // out-predict an early one on the same day.
    let artifact = train(&extract(&sample_posts())).expect("train");
    let early = crate::predict::predict(&artifact, 8, "Wednesday").expect("predict");
    let late = crate::predict::predict(&artifact, 21, "Wednesday").expect("predict");
    assert!(late > early, "late={late} early={early}");
}

#[test]
fn artifact_round_trips_through_json() {
    let artifact = train(&extract(&sample_posts())).expect("train");
    let json = serde_json::to_string(&artifact).expect("serialize");
    let back: TrainedModelArtifact = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.feature_columns, artifact.feature_columns);
    assert!((back.intercept - artifact.intercept).abs() < 1e-12);
    assert_eq!(back.sample_count, artifact.sample_count);
}
