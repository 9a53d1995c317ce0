//! Inference service.
//!
//! An explicitly constructed, immutable service object: the artifact is
//! loaded once at startup and shared read-only by every request. Single
//! predictions fail as a whole; batch predictions isolate failures per
//! record and preserve input order.

use crate::artifact::{PipelineArtifact, TrainMetrics};
use crate::error::{PipelineError, ServeError};
use crate::serve::record::HouseRecord;
use crate::stats::{mean, std_dev};
use serde::Serialize;
use std::path::Path;

/// Point prediction with its confidence interval.
#[derive(Clone, Debug, Serialize)]
pub struct Prediction {
    pub predicted_price: f64,
    pub confidence_interval: Interval,
}

/// Interval bounds around a prediction.
#[derive(Clone, Debug, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// One element of a batch response: a prediction or an isolated error.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Ok(Prediction),
    Err { error: String },
}

impl BatchItem {
    /// The prediction, if this element succeeded.
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            BatchItem::Ok(p) => Some(p),
            BatchItem::Err { .. } => None,
        }
    }
}

/// Summary statistics over the successful predictions of a batch.
#[derive(Clone, Debug, Serialize)]
pub struct BatchStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

/// Batch response: per-record outcomes in input order.
#[derive(Clone, Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
    /// Number of successful predictions.
    pub count: usize,
    /// Present when at least one record predicted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<BatchStatistics>,
}

/// Model metadata for the info endpoint contract.
#[derive(Clone, Debug, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub model_type: String,
    pub version: String,
    pub performance: TrainMetrics,
    pub features_count: usize,
}

/// Immutable prediction service over a loaded artifact.
pub struct InferenceService {
    artifact: PipelineArtifact,
}

impl InferenceService {
    /// Wrap an already-loaded artifact.
    pub fn new(artifact: PipelineArtifact) -> Self {
        Self { artifact }
    }

    /// Load the artifact from disk.
    ///
    /// # Errors
    /// A load failure is fatal at startup; the service refuses to serve
    /// without a model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let artifact = PipelineArtifact::load(path.as_ref())?;
        tracing::info!(
            path = %path.as_ref().display(),
            features = artifact.preprocessor.n_features_out(),
            trees = artifact.model.n_trees(),
            "artifact loaded"
        );
        Ok(Self::new(artifact))
    }

    /// Predict one record.
    ///
    /// Absent fields resolve through the fitted imputation defaults; an
    /// all-defaults record is valid.
    pub fn predict(&self, record: &HouseRecord) -> Result<Prediction, ServeError> {
        let frame = record.to_frame();
        let matrix = self.artifact.preprocessor.transform(&frame)?;
        let predictions = self.artifact.model.predict(matrix.view())?;
        let predicted_price = predictions.first().copied().ok_or_else(|| {
            ServeError::Pipeline(PipelineError::EmptyData(
                "pipeline produced no rows".to_string(),
            ))
        })?;
        let (lower, upper) = self
            .artifact
            .interval
            .bounds(predicted_price, self.artifact.residual_std_);
        Ok(Prediction {
            predicted_price,
            confidence_interval: Interval { lower, upper },
        })
    }

    /// Predict one loosely typed record, isolating parse failures.
    pub fn predict_value(&self, value: &serde_json::Value) -> Result<Prediction, ServeError> {
        let record: HouseRecord = serde_json::from_value(value.clone())
            .map_err(|e| ServeError::MalformedRecord(e.to_string()))?;
        self.predict(&record)
    }

    /// Predict a batch of loosely typed records.
    ///
    /// Output order matches input order; one malformed record yields one
    /// error entry and never aborts the batch.
    pub fn predict_batch(&self, records: &[serde_json::Value]) -> BatchResponse {
        let results: Vec<BatchItem> = records
            .iter()
            .map(|value| match self.predict_value(value) {
                Ok(prediction) => BatchItem::Ok(prediction),
                Err(err) => {
                    tracing::debug!(error = %err, "batch record failed");
                    BatchItem::Err {
                        error: err.to_string(),
                    }
                }
            })
            .collect();

        let prices: Vec<f64> = results
            .iter()
            .filter_map(|item| item.prediction().map(|p| p.predicted_price))
            .collect();
        let statistics = if prices.is_empty() {
            None
        } else {
            let mut sorted = prices.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let median = crate::stats::quantile_sorted(&sorted, 0.5);
            Some(BatchStatistics {
                min: sorted[0],
                max: sorted[sorted.len() - 1],
                mean: mean(&prices),
                median,
                std: std_dev(&prices),
            })
        };

        BatchResponse {
            count: prices.len(),
            results,
            statistics,
        }
    }

    /// Metadata about the loaded model.
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: "housecast".to_string(),
            model_type: "gradient_boosted_trees".to_string(),
            version: self.artifact.version.clone(),
            performance: self.artifact.metrics.clone(),
            features_count: self.artifact.preprocessor.n_features_out(),
        }
    }

    /// The underlying artifact.
    pub fn artifact(&self) -> &PipelineArtifact {
        &self.artifact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainConfig;
    use crate::frame::{Frame, Value};
    use crate::schema;
    use crate::tracking::NoopTracker;
    use crate::train;
    use serde_json::json;

    fn cat(s: &str) -> Value {
        Value::Cat(s.to_string())
    }

    /// Train a small service for the serving tests.
    fn service() -> InferenceService {
        let n = 60;
        let frame = Frame::from_columns([
            (
                "GrLivArea",
                (0..n)
                    .map(|i| Value::Num(800.0 + (i % 15) as f64 * 100.0))
                    .collect::<Vec<_>>(),
            ),
            (
                "OverallQual",
                (0..n).map(|i| Value::Num(3.0 + (i % 6) as f64)).collect(),
            ),
            (
                "YearBuilt",
                (0..n)
                    .map(|i| Value::Num(1950.0 + (i % 20) as f64 * 3.0))
                    .collect(),
            ),
            ("YrSold", vec![Value::Num(2008.0); n]),
            (
                "GarageCars",
                (0..n).map(|i| Value::Num((i % 4) as f64)).collect(),
            ),
            (
                "GarageArea",
                (0..n).map(|i| Value::Num(200.0 + (i % 4) as f64 * 120.0)).collect(),
            ),
            (
                "FullBath",
                (0..n).map(|i| Value::Num(1.0 + (i % 2) as f64)).collect(),
            ),
            (
                "Neighborhood",
                (0..n)
                    .map(|i| cat(["CollgCr", "NoRidge", "OldTown"][i % 3]))
                    .collect(),
            ),
            (
                schema::TARGET,
                (0..n)
                    .map(|i| {
                        let g = 800.0 + (i % 15) as f64 * 100.0;
                        let q = 3.0 + (i % 6) as f64;
                        Value::Num(30_000.0 + 100.0 * g + 12_000.0 * q)
                    })
                    .collect(),
            ),
        ])
        .unwrap();

        let mut config = TrainConfig::default();
        config.model.n_estimators = 40;
        config.model.learning_rate = 0.15;
        config.model.subsample = 1.0;
        config.features.rare_min_count = 2;
        config.evaluation.cv_folds = 0;

        let outcome = train::train(&frame, &config, &mut NoopTracker).unwrap();
        InferenceService::new(outcome.artifact)
    }

    #[test]
    fn test_predict_documented_example() {
        let service = service();
        let record: HouseRecord = serde_json::from_value(json!({
            "OverallQual": 7,
            "GrLivArea": 1710,
            "YearBuilt": 2003,
            "FullBath": 2,
            "GarageCars": 2,
            "GarageArea": 548
        }))
        .unwrap();
        let prediction = service.predict(&record).unwrap();
        assert!(prediction.predicted_price > 0.0);
        assert!(prediction.confidence_interval.lower < prediction.predicted_price);
        assert!(prediction.predicted_price < prediction.confidence_interval.upper);
    }

    #[test]
    fn test_all_fields_omitted_still_predicts() {
        let service = service();
        let prediction = service.predict(&HouseRecord::default()).unwrap();
        assert!(prediction.predicted_price.is_finite());
        assert!(prediction.predicted_price > 0.0);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let service = service();
        let record: HouseRecord =
            serde_json::from_value(json!({"GrLivArea": 1500})).unwrap();
        let a = service.predict(&record).unwrap();
        let b = service.predict(&record).unwrap();
        assert_eq!(a.predicted_price.to_bits(), b.predicted_price.to_bits());
    }

    #[test]
    fn test_batch_isolates_malformed_record() {
        let service = service();
        let records = vec![
            json!({"GrLivArea": 1400}),
            json!({"GrLivArea": "not a number"}),
            json!({"GrLivArea": 2200}),
        ];
        let response = service.predict_batch(&records);

        assert_eq!(response.results.len(), 3);
        assert_eq!(response.count, 2);
        assert!(response.results[0].prediction().is_some());
        assert!(response.results[1].prediction().is_none());
        assert!(response.results[2].prediction().is_some());
        // Order is preserved: the bigger house costs more.
        let low = response.results[0].prediction().unwrap().predicted_price;
        let high = response.results[2].prediction().unwrap().predicted_price;
        assert!(high > low);
    }

    #[test]
    fn test_batch_statistics_over_successes() {
        let service = service();
        let records = vec![
            json!({"GrLivArea": 1200}),
            json!({"GrLivArea": 2000}),
            json!({"OverallQual": "bad"}),
        ];
        let response = service.predict_batch(&records);
        let stats = response.statistics.unwrap();
        assert!(stats.min <= stats.median && stats.median <= stats.max);
        assert!(stats.std >= 0.0);
    }

    #[test]
    fn test_batch_all_malformed_has_no_statistics() {
        let service = service();
        let records = vec![json!({"GrLivArea": "x"}), json!({"YrSold": "y"})];
        let response = service.predict_batch(&records);
        assert_eq!(response.count, 0);
        assert!(response.statistics.is_none());
    }

    #[test]
    fn test_model_info_reports_feature_count() {
        let service = service();
        let info = service.model_info();
        assert_eq!(info.model_type, "gradient_boosted_trees");
        assert_eq!(
            info.features_count,
            service.artifact().preprocessor.n_features_out()
        );
    }

    #[test]
    fn test_response_json_shape() {
        let service = service();
        let prediction = service.predict(&HouseRecord::default()).unwrap();
        let json = serde_json::to_value(&prediction).unwrap();
        assert!(json.get("predicted_price").is_some());
        assert!(json["confidence_interval"].get("lower").is_some());
        assert!(json["confidence_interval"].get("upper").is_some());
    }
}
