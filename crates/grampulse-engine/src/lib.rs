//! Feature extraction, engagement statistics, model training, and likes
//! prediction.
//!
//! The one invariant that crosses every module here: the numeric encoding
//! of a post (or of a hypothetical posting slot) must be identical at
//! training time and at inference time. All encoding goes through
//! [`features::encode_row`] and the fixed column layout in
//! [`features::feature_columns`], and the predictor additionally aligns
//! its row to the column list stored inside the artifact it was given.

pub mod error;
pub mod features;
pub mod predict;
pub mod registry;
pub mod stats;
pub mod train;

pub use error::EngineError;
pub use features::{extract, FeatureRow, FeatureTable};
pub use predict::predict;
pub use registry::ModelRegistry;
pub use stats::{aggregate, EngagementSummary, TopPost, Trend, TrendEntry};
pub use train::{train, TrainedModelArtifact};
