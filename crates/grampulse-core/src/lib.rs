pub mod app_config;
mod config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical full English weekday names, Monday first.
///
/// All day-of-week handling in the pipeline indexes into this array so the
/// training-time encoding and the prediction-time encoding can never use
/// different spellings or orderings.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Returns the Monday-based index (0..=6) for a canonical weekday name,
/// or `None` for anything else. Matching is case-sensitive: the HTTP and
/// CLI surfaces accept exactly the names in [`WEEKDAY_NAMES`].
#[must_use]
pub fn weekday_index(name: &str) -> Option<usize> {
    WEEKDAY_NAMES.iter().position(|d| *d == name)
}

/// One observed social-media post, as stored in the posts blob for an
/// account.
///
/// `timestamp` is kept as the raw RFC 3339 string received from the
/// platform rather than a parsed `DateTime`. Feature extraction and
/// aggregation parse it on demand and skip records that fail to parse,
/// so a single malformed timestamp never makes a whole stored batch
/// undeserializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    #[serde(default)]
    pub shortcode: Option<String>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub timestamp: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl RawPost {
    /// Aggregate interest score: likes plus comments.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.likes_count + self.comments_count
    }

    /// Parses the stored timestamp, normalized to UTC.
    ///
    /// Returns `None` when the timestamp is not valid RFC 3339; callers
    /// drop such records from time-based derivations instead of failing.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_covers_all_seven_days() {
        assert_eq!(weekday_index("Monday"), Some(0));
        assert_eq!(weekday_index("Friday"), Some(4));
        assert_eq!(weekday_index("Sunday"), Some(6));
    }

    #[test]
    fn weekday_index_rejects_non_canonical_names() {
        assert_eq!(weekday_index("monday"), None);
        assert_eq!(weekday_index("Mon"), None);
        assert_eq!(weekday_index(""), None);
    }

    #[test]
    fn published_at_parses_zulu_timestamps() {
        let post = post_with_timestamp("2025-04-07T14:30:00Z");
        let dt = post.published_at().expect("valid timestamp");
        assert_eq!(dt.to_rfc3339(), "2025-04-07T14:30:00+00:00");
    }

    #[test]
    fn published_at_normalizes_offsets_to_utc() {
        let post = post_with_timestamp("2025-04-07T14:30:00+05:30");
        let dt = post.published_at().expect("valid timestamp");
        assert_eq!(dt.format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn published_at_is_none_for_garbage() {
        assert!(post_with_timestamp("not-a-timestamp").published_at().is_none());
        assert!(post_with_timestamp("").published_at().is_none());
    }

    #[test]
    fn raw_post_deserializes_without_optional_fields() {
        let post: RawPost = serde_json::from_str(
            r#"{"id":"1","likes_count":10,"comments_count":2,"timestamp":"2025-01-01T00:00:00Z"}"#,
        )
        .expect("deserialize");
        assert_eq!(post.engagement(), 12);
        assert!(post.shortcode.is_none());
        assert!(post.hashtags.is_empty());
    }

    fn post_with_timestamp(ts: &str) -> RawPost {
        RawPost {
            id: "p1".to_owned(),
            shortcode: None,
            likes_count: 1,
            comments_count: 0,
            timestamp: ts.to_owned(),
            caption: None,
            hashtags: Vec::new(),
        }
    }
}
