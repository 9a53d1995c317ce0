//! Rare-category pooling.
//!
//! Levels seen fewer than `min_count` times in the training data collapse
//! into a single `"Other"` bucket. Unseen levels at inference time pool the
//! same way. The retained-level sets are frozen after fit.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Pooled bucket label.
pub const OTHER: &str = "Other";

/// Rare-category pooler (unfitted).
#[derive(Clone, Debug)]
pub struct RarePooler {
    cols: Vec<String>,
    min_count: usize,
}

impl RarePooler {
    /// Pool the given columns with the given minimum retained frequency.
    pub fn new(cols: Vec<String>, min_count: usize) -> Self {
        Self { cols, min_count }
    }
}

/// Fitted rare-category pooler holding the retained-level sets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedRarePooler {
    keep_levels_: BTreeMap<String, BTreeSet<String>>,
    min_count: usize,
}

impl FittedRarePooler {
    /// Retained levels for one column, if it was pooled.
    pub fn kept_levels(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.keep_levels_.get(column)
    }

    /// The frequency threshold used at fit time.
    pub fn min_count(&self) -> usize {
        self.min_count
    }
}

impl Transform for RarePooler {
    type Fitted = FittedRarePooler;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let mut keep_levels_ = BTreeMap::new();
        for col in &self.cols {
            let Some(cells) = frame.column(col) else {
                continue;
            };
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for cell in cells {
                if let Some(level) = cell.as_cat() {
                    *counts.entry(level).or_insert(0) += 1;
                }
            }
            let keep: BTreeSet<String> = counts
                .into_iter()
                .filter(|&(_, n)| n >= self.min_count)
                .map(|(level, _)| level.to_string())
                .collect();
            keep_levels_.insert(col.clone(), keep);
        }
        Ok(FittedRarePooler {
            keep_levels_,
            min_count: self.min_count,
        })
    }
}

impl FittedTransform for FittedRarePooler {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for (col, keep) in &self.keep_levels_ {
            let Some(cells) = frame.column(col) else {
                continue;
            };
            let pooled: Vec<Value> = cells
                .iter()
                .map(|cell| match cell.as_cat() {
                    Some(level) if keep.contains(level) => cell.clone(),
                    Some(_) => Value::Cat(OTHER.to_string()),
                    // Missing cells pass through untouched; imputation owns them.
                    None => cell.clone(),
                })
                .collect();
            out.set_column(col, pooled)?;
        }
        Ok(out)
    }
}
