//! Inference: reconstructing a single-row feature vector for a
//! hypothetical future post and invoking the trained model on it.

use grampulse_core::weekday_index;

use crate::error::EngineError;
use crate::features::{encode_row, feature_columns};
use crate::train::TrainedModelArtifact;

/// Predicts expected likes for a post published at `hour` on `day`.
///
/// The single-row vector is built with the same derivation and one-hot
/// rules as training, then aligned to `artifact.feature_columns`: any
/// column the artifact expects but the row lacks is filled with 0, and
/// columns the artifact does not know are dropped. Without this
/// alignment, column-order drift between training and inference would
/// silently corrupt predictions.
///
/// The raw model output is clamped to a non-negative integer via
/// `max(0, round(y))`.
///
/// # Errors
///
/// - [`EngineError::InvalidHour`] — `hour` outside 0..=23.
/// - [`EngineError::InvalidDay`] — `day` is not a canonical weekday name.
/// - [`EngineError::ArtifactMismatch`] — the artifact's coefficient and
///   column counts disagree (corrupt or hand-edited blob).
pub fn predict(artifact: &TrainedModelArtifact, hour: i64, day: &str) -> Result<u64, EngineError> {
    if !(0..=23).contains(&hour) {
        return Err(EngineError::InvalidHour { hour });
    }
    let day_index =
        weekday_index(day).ok_or_else(|| EngineError::InvalidDay { day: day.to_owned() })?;

    if artifact.coefficients.len() != artifact.feature_columns.len() {
        return Err(EngineError::ArtifactMismatch {
            coefficients: artifact.coefficients.len(),
            columns: artifact.feature_columns.len(),
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let values = encode_row(hour as u32, day_index);
    let columns = feature_columns();

    // Align to the artifact's training-time layout: absent columns fill
    // with 0, unknown columns drop.
    let aligned: Vec<f64> = artifact
        .feature_columns
        .iter()
        .map(|name| {
            columns
                .iter()
                .position(|c| c == name)
                .map_or(0.0, |i| values[i])
        })
        .collect();

    let raw = artifact.raw_output(&aligned);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(raw.round().max(0.0) as u64)
}

#[cfg(test)]
#[path = "predict_test.rs"]
mod tests;
