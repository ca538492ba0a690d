//! Conversion of raw posts into the fixed-width numeric representation
//! consumed by the regressor.
//!
//! ## Column layout
//!
//! The design matrix always has exactly nine columns, in this order:
//!
//! ```text
//! hour, is_peak_hour, is_weekday,
//! day_Tuesday, day_Wednesday, day_Thursday, day_Friday, day_Saturday, day_Sunday
//! ```
//!
//! Day-of-week is one-hot encoded with Monday as the pinned reference
//! category (all six indicators zero). Pinning the reference day to a
//! constant, rather than dropping whichever day appears first in the
//! batch, keeps the encoding identical across retrains even when a batch
//! does not cover all seven days.

use grampulse_core::{weekday_index, RawPost, WEEKDAY_NAMES};

/// Hours (inclusive) counted as peak posting time.
pub const PEAK_HOUR_START: u32 = 12;
pub const PEAK_HOUR_END: u32 = 18;

/// The weekday absorbed into the intercept by the one-hot encoding.
pub const REFERENCE_DAY: &str = "Monday";

/// Indicator columns for the six non-reference days, in calendar order.
pub const DAY_INDICATOR_COLUMNS: [&str; 6] = [
    "day_Tuesday",
    "day_Wednesday",
    "day_Thursday",
    "day_Friday",
    "day_Saturday",
    "day_Sunday",
];

/// The full fixed column layout of the design matrix.
#[must_use]
pub fn feature_columns() -> Vec<String> {
    let mut columns = vec![
        "hour".to_owned(),
        "is_peak_hour".to_owned(),
        "is_weekday".to_owned(),
    ];
    columns.extend(DAY_INDICATOR_COLUMNS.iter().map(|c| (*c).to_owned()));
    columns
}

/// Features derived from exactly one post. Created fresh on every
/// extraction call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    /// UTC hour of the publish instant, 0..=23.
    pub hour: u32,
    /// Monday-based weekday index, 0..=6. `hour` and `day_index` always
    /// come from the same parsed timestamp.
    pub day_index: usize,
    pub is_peak_hour: bool,
    pub is_weekday: bool,
    /// Training target.
    pub likes_count: u64,
}

impl FeatureRow {
    /// Derives a row from a post, or `None` when the timestamp does not
    /// parse.
    #[must_use]
    pub fn from_post(post: &RawPost) -> Option<Self> {
        use chrono::{Datelike, Timelike};

        let published = post.published_at()?;
        let hour = published.hour();
        let day_index = published.weekday().num_days_from_monday() as usize;
        Some(Self {
            hour,
            day_index,
            is_peak_hour: (PEAK_HOUR_START..=PEAK_HOUR_END).contains(&hour),
            is_weekday: day_index < 5,
            likes_count: post.likes_count,
        })
    }

    /// Canonical full weekday name for this row.
    #[must_use]
    pub fn day_of_week(&self) -> &'static str {
        WEEKDAY_NAMES[self.day_index]
    }
}

/// Ordered collection of feature rows, in input order.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    #[must_use]
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Converts raw posts into a [`FeatureTable`].
///
/// Posts with unparseable timestamps are dropped individually; one bad
/// record never fails the batch. An empty input yields an empty table,
/// which downstream callers treat as "no data" rather than an error.
/// Row order follows input order.
#[must_use]
pub fn extract(posts: &[RawPost]) -> FeatureTable {
    let mut rows = Vec::with_capacity(posts.len());
    for post in posts {
        match FeatureRow::from_post(post) {
            Some(row) => rows.push(row),
            None => {
                tracing::debug!(post_id = %post.id, timestamp = %post.timestamp,
                    "skipping post with unparseable timestamp");
            }
        }
    }
    FeatureTable { rows }
}

/// Encodes one (hour, weekday) pair into the fixed column layout.
///
/// Shared by training (per table row) and prediction (for the
/// hypothetical future post), which is what guarantees the two sides
/// agree byte-for-byte on the encoding.
#[must_use]
pub fn encode_row(hour: u32, day_index: usize) -> Vec<f64> {
    let is_peak = (PEAK_HOUR_START..=PEAK_HOUR_END).contains(&hour);
    let is_weekday = day_index < 5;

    let mut values = vec![
        f64::from(hour),
        if is_peak { 1.0 } else { 0.0 },
        if is_weekday { 1.0 } else { 0.0 },
    ];
    // Monday (index 0) is the reference: all indicators stay zero.
    for indicator_index in 1..WEEKDAY_NAMES.len() {
        values.push(if day_index == indicator_index { 1.0 } else { 0.0 });
    }
    values
}

/// Encodes a canonical day name, returning `None` for non-canonical input.
#[must_use]
pub fn encode_named_row(hour: u32, day: &str) -> Option<Vec<f64>> {
    weekday_index(day).map(|idx| encode_row(hour, idx))
}

#[cfg(test)]
#[path = "features_test.rs"]
mod tests;
