//! Imputation of missing cells from fitted per-column statistics.
//!
//! Adapted per column group by the pipeline: median for numeric columns,
//! most-frequent for categorical and ordinal-rank columns. The learned fill
//! values are the "fitted defaults" the inference service relies on when a
//! request omits fields.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy for computing the per-column fill value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Median of the non-missing numeric cells.
    Median,
    /// Most frequent value (numeric or categorical); ties break
    /// deterministically.
    MostFrequent,
    /// A fixed numeric constant.
    Constant(f64),
}

/// Imputer over an explicit set of columns (unfitted).
#[derive(Clone, Debug)]
pub struct Imputer {
    cols: Vec<String>,
    strategy: ImputeStrategy,
}

impl Imputer {
    pub fn new(cols: Vec<String>, strategy: ImputeStrategy) -> Self {
        Self { cols, strategy }
    }
}

/// Fitted imputer holding one fill value per column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedImputer {
    fills_: BTreeMap<String, Value>,
    strategy: ImputeStrategy,
}

impl FittedImputer {
    /// Fill value learned for one column.
    pub fn fill(&self, column: &str) -> Option<&Value> {
        self.fills_.get(column)
    }

    /// Columns this imputer fills.
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.fills_.keys()
    }
}

fn median_fill(cells: &[Value]) -> Option<Value> {
    let mut nums: Vec<f64> = cells.iter().filter_map(|c| c.as_num()).collect();
    if nums.is_empty() {
        return None;
    }
    nums.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = nums.len();
    let median = if n % 2 == 0 {
        (nums[n / 2 - 1] + nums[n / 2]) / 2.0
    } else {
        nums[n / 2]
    };
    Some(Value::Num(median))
}

fn most_frequent_fill(cells: &[Value]) -> Option<Value> {
    // Count numeric cells by bit pattern and categorical cells by string.
    let mut num_counts: BTreeMap<u64, usize> = BTreeMap::new();
    let mut cat_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for cell in cells {
        match cell {
            Value::Num(v) if !v.is_nan() => *num_counts.entry(v.to_bits()).or_insert(0) += 1,
            Value::Cat(s) => *cat_counts.entry(s.as_str()).or_insert(0) += 1,
            _ => {}
        }
    }
    let best_num = num_counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(bits, n)| (Value::Num(f64::from_bits(bits)), n));
    let best_cat = cat_counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(s, n)| (Value::Cat(s.to_string()), n));
    match (best_num, best_cat) {
        (Some((v, n)), Some((c, m))) => Some(if m > n { c } else { v }),
        (Some((v, _)), None) => Some(v),
        (None, Some((c, _))) => Some(c),
        (None, None) => None,
    }
}

impl Transform for Imputer {
    type Fitted = FittedImputer;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        if frame.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit imputer on empty data".to_string(),
            ));
        }
        let mut fills_ = BTreeMap::new();
        for col in &self.cols {
            let cells = frame.require_column(col)?;
            let fill = match self.strategy {
                ImputeStrategy::Median => median_fill(cells),
                ImputeStrategy::MostFrequent => most_frequent_fill(cells),
                ImputeStrategy::Constant(v) => Some(Value::Num(v)),
            };
            // A column with no observed values has no statistic to learn;
            // the all-missing dropper runs first, so reaching this is a bug
            // in the stage ordering.
            let fill = fill.ok_or_else(|| {
                PipelineError::EmptyData(format!("column {} has no observed values", col))
            })?;
            fills_.insert(col.clone(), fill);
        }
        Ok(FittedImputer {
            fills_,
            strategy: self.strategy,
        })
    }
}

impl FittedTransform for FittedImputer {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for (col, fill) in &self.fills_ {
            let cells = frame.require_column(col)?;
            if cells.iter().any(|c| c.is_missing()) {
                let filled: Vec<Value> = cells
                    .iter()
                    .map(|c| if c.is_missing() { fill.clone() } else { c.clone() })
                    .collect();
                out.set_column(col, filled)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_imputation() {
        let frame = Frame::from_columns([(
            "LotFrontage",
            vec![
                Value::Num(60.0),
                Value::Num(80.0),
                Value::Num(70.0),
                Value::Missing,
            ],
        )])
        .unwrap();
        let fitted = Imputer::new(vec!["LotFrontage".to_string()], ImputeStrategy::Median)
            .fit(&frame, None)
            .unwrap();
        assert_eq!(fitted.fill("LotFrontage"), Some(&Value::Num(70.0)));

        let out = fitted.transform(&frame).unwrap();
        assert_eq!(out.column("LotFrontage").unwrap()[3], Value::Num(70.0));
    }

    #[test]
    fn test_median_even_count() {
        let frame = Frame::from_columns([(
            "X",
            vec![
                Value::Num(1.0),
                Value::Num(3.0),
                Value::Num(5.0),
                Value::Num(7.0),
            ],
        )])
        .unwrap();
        let fitted = Imputer::new(vec!["X".to_string()], ImputeStrategy::Median)
            .fit(&frame, None)
            .unwrap();
        assert_eq!(fitted.fill("X"), Some(&Value::Num(4.0)));
    }

    #[test]
    fn test_most_frequent_categorical() {
        let frame = Frame::from_columns([(
            "MSZoning",
            vec![
                Value::Cat("RL".to_string()),
                Value::Cat("RL".to_string()),
                Value::Cat("RM".to_string()),
                Value::Missing,
            ],
        )])
        .unwrap();
        let fitted = Imputer::new(vec!["MSZoning".to_string()], ImputeStrategy::MostFrequent)
            .fit(&frame, None)
            .unwrap();
        let out = fitted.transform(&frame).unwrap();
        assert_eq!(
            out.column("MSZoning").unwrap()[3],
            Value::Cat("RL".to_string())
        );
    }

    #[test]
    fn test_most_frequent_numeric() {
        let frame = Frame::from_columns([(
            "Rank",
            vec![
                Value::Num(2.0),
                Value::Num(2.0),
                Value::Num(3.0),
                Value::Missing,
            ],
        )])
        .unwrap();
        let fitted = Imputer::new(vec!["Rank".to_string()], ImputeStrategy::MostFrequent)
            .fit(&frame, None)
            .unwrap();
        assert_eq!(fitted.fill("Rank"), Some(&Value::Num(2.0)));
    }

    #[test]
    fn test_constant_strategy() {
        let frame = Frame::from_columns([("X", vec![Value::Missing, Value::Num(1.0)])]).unwrap();
        let fitted = Imputer::new(vec!["X".to_string()], ImputeStrategy::Constant(-1.0))
            .fit(&frame, None)
            .unwrap();
        let out = fitted.transform(&frame).unwrap();
        assert_eq!(out.column("X").unwrap()[0], Value::Num(-1.0));
    }

    #[test]
    fn test_fit_missing_column_is_error() {
        let frame = Frame::from_columns([("X", vec![Value::Num(1.0)])]).unwrap();
        let result =
            Imputer::new(vec!["Y".to_string()], ImputeStrategy::Median).fit(&frame, None);
        assert!(matches!(result, Err(PipelineError::MissingColumn(_))));
    }

    #[test]
    fn test_fit_all_missing_column_is_error() {
        let frame = Frame::from_columns([("X", vec![Value::Missing, Value::Missing])]).unwrap();
        let result =
            Imputer::new(vec!["X".to_string()], ImputeStrategy::Median).fit(&frame, None);
        assert!(matches!(result, Err(PipelineError::EmptyData(_))));
    }

    #[test]
    fn test_transform_missing_column_is_error() {
        let frame = Frame::from_columns([("X", vec![Value::Num(1.0)])]).unwrap();
        let fitted = Imputer::new(vec!["X".to_string()], ImputeStrategy::Median)
            .fit(&frame, None)
            .unwrap();
        let probe = Frame::from_columns([("Y", vec![Value::Num(1.0)])]).unwrap();
        let result = fitted.transform(&probe);
        assert!(matches!(result, Err(PipelineError::MissingColumn(_))));
    }
}
