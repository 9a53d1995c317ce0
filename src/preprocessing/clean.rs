//! Data hygiene stages: infinity removal and all-missing column dropping.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use serde::{Deserialize, Serialize};

/// Converts infinite numeric cells to missing, independently per cell.
///
/// Stateless: fitting only records that the stage exists.
#[derive(Clone, Debug, Default)]
pub struct FiniteCleaner;

impl FiniteCleaner {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted finite cleaner (no learned state).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FittedFiniteCleaner;

impl Transform for FiniteCleaner {
    type Fitted = FittedFiniteCleaner;

    fn fit(&self, _frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        Ok(FittedFiniteCleaner)
    }
}

impl FittedTransform for FittedFiniteCleaner {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for name in frame.names().to_vec() {
            let cells = frame.column(&name).unwrap_or(&[]);
            if cells
                .iter()
                .any(|c| matches!(c, Value::Num(v) if !v.is_finite()))
            {
                let cleaned: Vec<Value> = cells
                    .iter()
                    .map(|c| match c {
                        Value::Num(v) if !v.is_finite() => Value::Missing,
                        other => other.clone(),
                    })
                    .collect();
                out.set_column(&name, cleaned)?;
            }
        }
        Ok(out)
    }
}

/// Drops columns that were entirely missing in the training data.
///
/// The dropped-column set is fitted state and is applied identically at
/// fit and transform time.
#[derive(Clone, Debug, Default)]
pub struct AllMissingDropper;

impl AllMissingDropper {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted dropper holding the columns removed at fit time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedAllMissingDropper {
    dropped_: Vec<String>,
}

impl FittedAllMissingDropper {
    /// Columns removed by this stage.
    pub fn dropped_columns(&self) -> &[String] {
        &self.dropped_
    }
}

impl Transform for AllMissingDropper {
    type Fitted = FittedAllMissingDropper;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let dropped_ = frame
            .names()
            .iter()
            .filter(|name| {
                let cells = frame.column(name).unwrap_or(&[]);
                !cells.is_empty() && cells.iter().all(|c| c.is_missing())
            })
            .cloned()
            .collect();
        Ok(FittedAllMissingDropper { dropped_ })
    }
}

impl FittedTransform for FittedAllMissingDropper {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for col in &self.dropped_ {
            out.drop_column(col);
        }
        Ok(out)
    }
}
