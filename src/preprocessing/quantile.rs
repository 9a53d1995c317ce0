//! Quantile transformation of continuous columns to a normal output
//! distribution.
//!
//! Fit learns a reference distribution of up to `n_quantiles` evenly spaced
//! quantiles per column. Transform maps a value to its interpolated
//! fractional rank against the references and pushes that probability
//! through the inverse normal CDF.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use crate::stats::{normal_ppf, quantile_sorted};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probability clip keeping the normal output finite at the extremes.
const BOUNDS_EPS: f64 = 1e-7;

/// Quantile transformer (unfitted).
#[derive(Clone, Debug)]
pub struct QuantileTransformer {
    cols: Vec<String>,
    n_quantiles: usize,
}

impl QuantileTransformer {
    /// Transform the given columns with the default 200-quantile reference.
    pub fn new(cols: Vec<String>) -> Self {
        Self {
            cols,
            n_quantiles: 200,
        }
    }

    /// Override the reference resolution.
    pub fn with_n_quantiles(mut self, n_quantiles: usize) -> Self {
        self.n_quantiles = n_quantiles.max(2);
        self
    }
}

/// Fitted quantile transformer holding per-column reference distributions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedQuantileTransformer {
    references_: BTreeMap<String, Vec<f64>>,
}

impl FittedQuantileTransformer {
    /// Reference quantiles for one column, if it was fitted.
    pub fn references(&self, column: &str) -> Option<&[f64]> {
        self.references_.get(column).map(|r| r.as_slice())
    }

    /// Fractional rank of `v` against a sorted reference distribution.
    fn rank(references: &[f64], v: f64) -> f64 {
        let n = references.len();
        if n == 1 {
            return 0.5;
        }
        let first = references[0];
        let last = references[n - 1];
        if v <= first {
            return 0.0;
        }
        if v >= last {
            return 1.0;
        }
        // First reference strictly above v; references are sorted.
        let hi = references.partition_point(|&r| r < v).min(n - 1);
        let lo = hi - 1;
        let (r_lo, r_hi) = (references[lo], references[hi]);
        let frac = if r_hi > r_lo {
            (v - r_lo) / (r_hi - r_lo)
        } else {
            0.0
        };
        (lo as f64 + frac) / (n - 1) as f64
    }
}

impl Transform for QuantileTransformer {
    type Fitted = FittedQuantileTransformer;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let mut references_ = BTreeMap::new();
        for col in &self.cols {
            let cells = frame.require_column(col)?;
            let mut nums: Vec<f64> = cells.iter().filter_map(|c| c.as_num()).collect();
            if nums.is_empty() {
                return Err(PipelineError::EmptyData(format!(
                    "column {} has no observed values",
                    col
                )));
            }
            nums.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n_q = self.n_quantiles.min(nums.len()).max(1);
            let references: Vec<f64> = if n_q == 1 {
                vec![nums[0]]
            } else {
                (0..n_q)
                    .map(|i| quantile_sorted(&nums, i as f64 / (n_q - 1) as f64))
                    .collect()
            };
            references_.insert(col.clone(), references);
        }
        Ok(FittedQuantileTransformer { references_ })
    }
}

impl FittedTransform for FittedQuantileTransformer {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for (col, references) in &self.references_ {
            let cells = frame.require_column(col)?;
            let mut mapped = Vec::with_capacity(cells.len());
            for cell in cells {
                let value = match cell {
                    Value::Num(v) if !v.is_nan() => {
                        let p = Self::rank(references, *v)
                            .clamp(BOUNDS_EPS, 1.0 - BOUNDS_EPS);
                        Value::Num(normal_ppf(p))
                    }
                    Value::Missing | Value::Num(_) => Value::Missing,
                    Value::Cat(_) => {
                        return Err(PipelineError::TypeMismatch {
                            column: col.clone(),
                            expected: "numeric",
                        })
                    }
                };
                mapped.push(value);
            }
            out.set_column(col, mapped)?;
        }
        Ok(out)
    }
}
