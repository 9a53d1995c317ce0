//! The persisted pipeline artifact.
//!
//! One serialized bundle holds everything the inference path needs: the
//! fitted preprocessing state, the fitted model, the interval policy and the
//! residual spread estimated on held-out data. Created once by training,
//! loaded read-only at service start, never mutated.

use crate::error::PipelineError;
use crate::model::FittedGbdt;
use crate::preprocessing::FittedPreprocessor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the confidence interval around a point prediction is built.
///
/// The construction is a configurable policy rather than a fixed formula;
/// both variants are bounds around the point estimate with the lower bound
/// clamped at zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalPolicy {
    /// `prediction ± z * residual_std`, with the residual spread estimated
    /// on held-out data at training time.
    ResidualSigma { z: f64 },
    /// `prediction ± frac * prediction`.
    FixedFraction { frac: f64 },
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        IntervalPolicy::ResidualSigma { z: 1.96 }
    }
}

impl IntervalPolicy {
    /// Interval bounds for one prediction.
    pub fn bounds(&self, prediction: f64, residual_std: f64) -> (f64, f64) {
        let half_width = match self {
            IntervalPolicy::ResidualSigma { z } => z * residual_std,
            IntervalPolicy::FixedFraction { frac } => frac * prediction.abs(),
        };
        ((prediction - half_width).max(0.0), prediction + half_width)
    }
}

/// Metrics recorded at training time and carried inside the artifact.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainMetrics {
    pub cv_rmse_mean: f64,
    pub cv_rmse_std: f64,
    pub cv_r2_mean: f64,
    pub cv_r2_std: f64,
    pub test_rmse: f64,
    pub test_r2: f64,
}

/// Serialized bundle of fitted preprocessing state and model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Fitted preprocessing pipeline.
    pub preprocessor: FittedPreprocessor,
    /// Fitted boosted-tree model.
    pub model: FittedGbdt,
    /// Interval construction policy.
    pub interval: IntervalPolicy,
    /// Residual standard deviation from the held-out split.
    pub residual_std_: f64,
    /// Training metrics for the model-info view.
    pub metrics: TrainMetrics,
    /// Artifact format version.
    pub version: String,
}

/// Current artifact format version.
pub const ARTIFACT_VERSION: &str = "1";

impl PipelineArtifact {
    /// Save the artifact to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load an artifact from a file.
    ///
    /// # Errors
    /// A missing or unreadable file is a fatal startup condition for the
    /// service; the error names the underlying cause.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            PipelineError::Io(format!(
                "failed to read artifact {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let artifact: PipelineArtifact = bincode::deserialize(&bytes)?;
        Ok(artifact)
    }
}
