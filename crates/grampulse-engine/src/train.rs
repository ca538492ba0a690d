//! Model training: design-matrix encoding, reproducible train/test
//! split, least-squares fit, and held-out evaluation.

use chrono::{DateTime, Utc};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::features::{encode_row, feature_columns, FeatureTable};

/// Fixed seed for the train/test shuffle, so retraining on identical
/// input is comparable across runs.
pub const SPLIT_SEED: u64 = 42;

/// Fraction of rows held out for evaluation. The held-out partition is
/// `ceil(TEST_FRACTION * n)` rows.
pub const TEST_FRACTION: f64 = 0.2;

/// The persisted unit: fitted regressor plus the exact ordered feature
/// column layout it was fit on.
///
/// The model is stored as its intercept and coefficient vector rather
/// than an opaque library type, so the artifact is a stable JSON blob and
/// inference is an exact dot product. `feature_columns[i]` names the
/// feature that `coefficients[i]` multiplies; the predictor aligns its
/// input row to this list before invoking the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModelArtifact {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub feature_columns: Vec<String>,
    /// Mean absolute error on the held-out partition. Reported, not
    /// enforced: no accuracy gate blocks artifact creation.
    pub mean_absolute_error: f64,
    pub trained_at: DateTime<Utc>,
    /// Total rows the table held (training + held-out).
    pub sample_count: usize,
}

impl TrainedModelArtifact {
    /// Raw model output for a row already aligned to `feature_columns`.
    pub(crate) fn raw_output(&self, aligned_row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(aligned_row)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

/// Fits a regressor to the feature table and evaluates it on a held-out
/// partition.
///
/// # Errors
///
/// Returns [`EngineError::TrainingFailure`] with reason `"no data"` when
/// the table is empty or either split partition would be empty, and with
/// the solver's message if the least-squares fit itself fails. On any
/// error no artifact is produced, so a previously persisted artifact
/// stays valid.
pub fn train(table: &FeatureTable) -> Result<TrainedModelArtifact, EngineError> {
    let no_data = || EngineError::TrainingFailure {
        reason: "no data".to_owned(),
    };

    if table.is_empty() {
        return Err(no_data());
    }

    let n = table.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(SPLIT_SEED);
    indices.shuffle(&mut rng);

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_test = ((n as f64) * TEST_FRACTION).ceil() as usize;
    let n_train = n - n_test;
    if n_train == 0 || n_test == 0 {
        return Err(no_data());
    }
    let (test_indices, train_indices) = indices.split_at(n_test);

    let columns = feature_columns();
    let (x_train, y_train) = design_matrix(table, train_indices, columns.len())?;
    let dataset = Dataset::new(x_train, y_train);

    let fitted = LinearRegression::default()
        .fit(&dataset)
        .map_err(|e| EngineError::TrainingFailure {
            reason: e.to_string(),
        })?;

    let mut artifact = TrainedModelArtifact {
        intercept: fitted.intercept(),
        coefficients: fitted.params().to_vec(),
        feature_columns: columns,
        mean_absolute_error: 0.0,
        trained_at: Utc::now(),
        sample_count: n,
    };
    artifact.mean_absolute_error = held_out_mae(&artifact, table, test_indices);

    tracing::info!(
        samples = n,
        held_out = n_test,
        mae = artifact.mean_absolute_error,
        "trained likes predictor"
    );
    Ok(artifact)
}

/// Builds the design matrix and target vector for the given row indices,
/// in the fixed column layout.
fn design_matrix(
    table: &FeatureTable,
    indices: &[usize],
    n_columns: usize,
) -> Result<(Array2<f64>, Array1<f64>), EngineError> {
    let rows = table.rows();
    let mut flat = Vec::with_capacity(indices.len() * n_columns);
    let mut targets = Vec::with_capacity(indices.len());
    for &i in indices {
        let row = &rows[i];
        flat.extend(encode_row(row.hour, row.day_index));
        #[allow(clippy::cast_precision_loss)]
        targets.push(row.likes_count as f64);
    }

    let records = Array2::from_shape_vec((indices.len(), n_columns), flat).map_err(|e| {
        EngineError::TrainingFailure {
            reason: format!("design matrix shape: {e}"),
        }
    })?;
    Ok((records, Array1::from_vec(targets)))
}

/// Mean absolute error of the fitted model on the held-out rows,
/// computed through the same dot-product path the predictor uses.
fn held_out_mae(artifact: &TrainedModelArtifact, table: &FeatureTable, indices: &[usize]) -> f64 {
    let rows = table.rows();
    let total: f64 = indices
        .iter()
        .map(|&i| {
            let row = &rows[i];
            let predicted = artifact.raw_output(&encode_row(row.hour, row.day_index));
            #[allow(clippy::cast_precision_loss)]
            let actual = row.likes_count as f64;
            (predicted - actual).abs()
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let count = indices.len() as f64;
    total / count
}

#[cfg(test)]
#[path = "train_test.rs"]
mod tests;
