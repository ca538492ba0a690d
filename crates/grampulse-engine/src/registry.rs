//! Process-wide holder for the current model artifact.
//!
//! Retrains replace the artifact wholesale via an atomic pointer swap, so
//! an in-flight prediction always observes one fully-formed artifact —
//! either the old one or the new one, never a mix. Readers take a cheap
//! `Arc` snapshot and are never blocked by a writer.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::error::EngineError;
use crate::predict;
use crate::train::TrainedModelArtifact;

#[derive(Default)]
pub struct ModelRegistry {
    current: ArcSwapOption<TrainedModelArtifact>,
}

impl ModelRegistry {
    /// A registry with no model loaded; predictions fail with
    /// [`EngineError::ModelUnavailable`] until one is installed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_artifact(artifact: TrainedModelArtifact) -> Self {
        let registry = Self::default();
        registry.install(artifact);
        registry
    }

    /// Immutable snapshot of the current artifact, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<TrainedModelArtifact>> {
        self.current.load_full()
    }

    /// Atomically replaces the current artifact.
    pub fn install(&self, artifact: TrainedModelArtifact) {
        self.current.store(Some(Arc::new(artifact)));
    }

    /// Predicts against the current artifact.
    ///
    /// # Errors
    ///
    /// [`EngineError::ModelUnavailable`] when no artifact has been
    /// installed, plus any error from [`predict::predict`].
    pub fn predict(&self, hour: i64, day: &str) -> Result<u64, EngineError> {
        let artifact = self.snapshot().ok_or(EngineError::ModelUnavailable)?;
        predict::predict(&artifact, hour, day)
    }
}
