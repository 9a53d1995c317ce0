//! Smoothed target encoding for high-cardinality categorical columns.
//!
//! For each level of an encoded column the fit step computes
//! `(sum_target + alpha * global_mean) / (count + alpha)`, shrinking
//! low-frequency levels toward the global training-target mean. Transform
//! appends a numeric `TE_<col>` column and leaves the source column in place;
//! unseen levels receive the global mean.
//!
//! The statistics must come from a training split disjoint from any
//! evaluation data; the fitted state is frozen and transform never updates it.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Prefix of the appended encoded columns.
pub const TE_PREFIX: &str = "TE_";

/// Target encoder (unfitted).
#[derive(Clone, Debug)]
pub struct TargetEncoder {
    cols: Vec<String>,
    alpha: f64,
}

impl TargetEncoder {
    /// Encode the given columns with smoothing weight `alpha`.
    pub fn new(cols: Vec<String>, alpha: f64) -> Self {
        Self { cols, alpha }
    }
}

/// Fitted target encoder holding per-level smoothed means.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedTargetEncoder {
    global_mean_: f64,
    maps_: BTreeMap<String, HashMap<String, f64>>,
    alpha: f64,
}

impl FittedTargetEncoder {
    /// The global training-target mean (fallback for unseen levels).
    pub fn global_mean(&self) -> f64 {
        self.global_mean_
    }

    /// Encoded value for one level of one column, if both are known.
    pub fn encoding(&self, column: &str, level: &str) -> Option<f64> {
        self.maps_.get(column).and_then(|m| m.get(level)).copied()
    }

    /// Columns that received an encoding map at fit time.
    pub fn encoded_columns(&self) -> impl Iterator<Item = &String> {
        self.maps_.keys()
    }
}

impl Transform for TargetEncoder {
    type Fitted = FittedTargetEncoder;

    fn fit(&self, frame: &Frame, target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let y = target.ok_or_else(|| {
            PipelineError::InvalidParameter("target encoder requires a target at fit".to_string())
        })?;
        if y.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit target encoder on an empty target".to_string(),
            ));
        }
        if y.len() != frame.n_rows() {
            return Err(PipelineError::InvalidParameter(format!(
                "target has {} rows, frame has {}",
                y.len(),
                frame.n_rows()
            )));
        }

        let global_mean_ = y.iter().sum::<f64>() / y.len() as f64;

        let mut maps_ = BTreeMap::new();
        for col in &self.cols {
            let Some(cells) = frame.column(col) else {
                continue;
            };
            let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
            for (cell, &target_value) in cells.iter().zip(y.iter()) {
                if let Some(level) = cell.as_cat() {
                    let entry = sums.entry(level).or_insert((0.0, 0));
                    entry.0 += target_value;
                    entry.1 += 1;
                }
            }
            let encoded: HashMap<String, f64> = sums
                .into_iter()
                .map(|(level, (sum, count))| {
                    let te =
                        (sum + self.alpha * global_mean_) / (count as f64 + self.alpha);
                    (level.to_string(), te)
                })
                .collect();
            maps_.insert(col.clone(), encoded);
        }

        Ok(FittedTargetEncoder {
            global_mean_,
            maps_,
            alpha: self.alpha,
        })
    }
}

impl FittedTransform for FittedTargetEncoder {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for (col, map) in &self.maps_ {
            let Some(cells) = frame.column(col) else {
                continue;
            };
            let encoded: Vec<Value> = cells
                .iter()
                .map(|cell| {
                    let te = cell
                        .as_cat()
                        .and_then(|level| map.get(level).copied())
                        .unwrap_or(self.global_mean_);
                    Value::Num(te)
                })
                .collect();
            out.set_column(&format!("{}{}", TE_PREFIX, col), encoded)?;
        }
        Ok(out)
    }
}
