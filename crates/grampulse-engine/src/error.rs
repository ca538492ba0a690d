use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid hour {hour}: must be between 0 and 23")]
    InvalidHour { hour: i64 },

    #[error("invalid day \"{day}\": expected a full English weekday name")]
    InvalidDay { day: String },

    #[error("no data available")]
    NoData,

    #[error("training failed: {reason}")]
    TrainingFailure { reason: String },

    #[error("no trained model is available")]
    ModelUnavailable,

    #[error("model artifact is inconsistent: {coefficients} coefficients for {columns} feature columns")]
    ArtifactMismatch { coefficients: usize, columns: usize },
}
