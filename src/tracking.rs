//! Experiment tracking contract.
//!
//! Training reports hyperparameters, metrics and the artifact location to a
//! tracker without depending on any tracking backend's internals. The
//! file-backed tracker records one run as a JSON document; the no-op tracker
//! drops everything, which keeps tests and ad hoc runs quiet.

use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Contract between training and an experiment-tracking backend.
pub trait ExperimentTracker {
    /// Record one hyperparameter.
    fn log_param(&mut self, key: &str, value: &str);
    /// Record one metric.
    fn log_metric(&mut self, key: &str, value: f64);
    /// Record a produced artifact by path.
    fn log_artifact(&mut self, path: &Path);
}

/// Tracker that records nothing.
#[derive(Clone, Debug, Default)]
pub struct NoopTracker;

impl ExperimentTracker for NoopTracker {
    fn log_param(&mut self, _key: &str, _value: &str) {}
    fn log_metric(&mut self, _key: &str, _value: f64) {}
    fn log_artifact(&mut self, _path: &Path) {}
}

/// One recorded run, serialized as JSON by [`JsonRunTracker::finish`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub experiment: String,
    pub run_name: String,
    pub started_at: DateTime<Utc>,
    pub params: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
    pub artifacts: Vec<String>,
}

/// File-backed tracker writing one JSON document per run.
#[derive(Clone, Debug)]
pub struct JsonRunTracker {
    dir: PathBuf,
    record: RunRecord,
}

impl JsonRunTracker {
    /// Start a run under `dir/<experiment>/`.
    pub fn start(dir: impl Into<PathBuf>, experiment: &str, run_name: &str) -> Self {
        Self {
            dir: dir.into(),
            record: RunRecord {
                experiment: experiment.to_string(),
                run_name: run_name.to_string(),
                started_at: Utc::now(),
                params: BTreeMap::new(),
                metrics: BTreeMap::new(),
                artifacts: Vec::new(),
            },
        }
    }

    /// The accumulated run record.
    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Write the run record to disk, returning its path.
    pub fn finish(&self) -> Result<PathBuf, PipelineError> {
        let run_dir = self.dir.join(&self.record.experiment);
        std::fs::create_dir_all(&run_dir)?;
        let stamp = self.record.started_at.format("%Y%m%dT%H%M%S");
        let path = run_dir.join(format!("{}-{}.json", self.record.run_name, stamp));
        let json = serde_json::to_string_pretty(&self.record)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), "run recorded");
        Ok(path)
    }
}

impl ExperimentTracker for JsonRunTracker {
    fn log_param(&mut self, key: &str, value: &str) {
        self.record.params.insert(key.to_string(), value.to_string());
    }

    fn log_metric(&mut self, key: &str, value: f64) {
        self.record.metrics.insert(key.to_string(), value);
    }

    fn log_artifact(&mut self, path: &Path) {
        self.record.artifacts.push(path.display().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_accumulates_run_record() {
        let mut tracker = JsonRunTracker::start(std::env::temp_dir(), "housecast_test", "run");
        tracker.log_param("model_type", "gbdt");
        tracker.log_metric("test_rmse", 25_000.0);
        tracker.log_artifact(Path::new("artifact.bin"));

        let record = tracker.record();
        assert_eq!(record.params.get("model_type").map(String::as_str), Some("gbdt"));
        assert_eq!(record.metrics.get("test_rmse"), Some(&25_000.0));
        assert_eq!(record.artifacts, vec!["artifact.bin".to_string()]);
    }

    #[test]
    fn test_finish_writes_json() {
        let mut tracker = JsonRunTracker::start(std::env::temp_dir(), "housecast_test", "run");
        tracker.log_metric("cv_rmse_mean", 1.0);
        let path = tracker.finish().unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let record: RunRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.experiment, "housecast_test");
        assert_eq!(record.metrics.get("cv_rmse_mean"), Some(&1.0));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_noop_tracker_is_silent() {
        let mut tracker = NoopTracker;
        tracker.log_param("k", "v");
        tracker.log_metric("m", 1.0);
        tracker.log_artifact(Path::new("p"));
    }
}
