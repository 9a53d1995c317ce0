//! Training configuration loaded from JSON.
//!
//! Mirrors the shape of the best-model configuration file: model
//! hyperparameters, feature-engineering knobs and the evaluation protocol.
//! Every field has a default so a partial (or absent) file still trains.

use crate::artifact::IntervalPolicy;
use crate::error::PipelineError;
use crate::model::GbdtParams;
use crate::schema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feature-engineering knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Columns receiving smoothed target encoding.
    pub target_encoded_columns: Vec<String>,
    /// Target-encoder smoothing weight.
    pub te_alpha: f64,
    /// Rare-pooling frequency threshold.
    pub rare_min_count: usize,
    /// Quantile-transform reference resolution.
    pub n_quantiles: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            target_encoded_columns: schema::DEFAULT_TARGET_ENCODED
                .iter()
                .map(|c| c.to_string())
                .collect(),
            te_alpha: 30.0,
            rare_min_count: 15,
            n_quantiles: 200,
        }
    }
}

/// Complete training configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Model hyperparameters.
    pub model: GbdtParams,
    /// Feature-engineering knobs.
    pub features: FeatureConfig,
    /// Interval construction policy stored in the artifact.
    pub interval: IntervalPolicy,
    /// Evaluation protocol.
    pub evaluation: EvaluationConfig,
}

/// Split and cross-validation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Held-out fraction of the data.
    pub test_size: f64,
    /// Number of cross-validation folds; 0 disables CV.
    pub cv_folds: usize,
    /// Seed for the split shuffle.
    pub seed: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            cv_folds: 5,
            seed: 42,
        }
    }
}

impl TrainConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PipelineError::Io(format!(
                "failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: TrainConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Basic sanity checks beyond what serde enforces.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.evaluation.test_size > 0.0 && self.evaluation.test_size < 1.0) {
            return Err(PipelineError::InvalidParameter(
                "test_size must be in (0, 1)".to_string(),
            ));
        }
        if self.evaluation.cv_folds == 1 {
            return Err(PipelineError::InvalidParameter(
                "cv_folds must be 0 or at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
