//! Binary indicators marking original missingness.
//!
//! For each flagged column, transform appends a `<col>_was_missing` column
//! holding 1 where the source cell was missing and 0 elsewhere. Computed
//! per record; the only fitted state is which columns get a flag.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use serde::{Deserialize, Serialize};

/// Suffix appended to flagged column names.
pub const MISSING_SUFFIX: &str = "_was_missing";

/// Missingness indicator (unfitted).
#[derive(Clone, Debug, Default)]
pub struct MissingnessIndicator {
    /// Explicit columns to flag; `None` selects numeric columns that contain
    /// at least one missing value in the training data.
    cols: Option<Vec<String>>,
}

impl MissingnessIndicator {
    /// Auto-select numeric columns with training-time missingness.
    pub fn new() -> Self {
        Self { cols: None }
    }

    /// Flag exactly the given columns (those present at fit time).
    pub fn with_columns(cols: Vec<String>) -> Self {
        Self { cols: Some(cols) }
    }
}

/// Fitted missingness indicator holding the flagged column list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedMissingnessIndicator {
    cols_: Vec<String>,
}

impl FittedMissingnessIndicator {
    /// Columns that receive a `_was_missing` flag.
    pub fn flagged_columns(&self) -> &[String] {
        &self.cols_
    }
}

fn is_numeric_column(cells: &[Value]) -> bool {
    // A column counts as numeric when it has at least one numeric cell and
    // no categorical ones.
    let mut saw_num = false;
    for cell in cells {
        match cell {
            Value::Cat(_) => return false,
            Value::Num(_) => saw_num = true,
            Value::Missing => {}
        }
    }
    saw_num
}

impl Transform for MissingnessIndicator {
    type Fitted = FittedMissingnessIndicator;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let cols_ = match &self.cols {
            Some(cols) => cols
                .iter()
                .filter(|c| frame.has_column(c))
                .cloned()
                .collect(),
            None => frame
                .names()
                .iter()
                .filter(|name| {
                    let cells = frame.column(name).unwrap_or(&[]);
                    is_numeric_column(cells) && cells.iter().any(|v| v.is_missing())
                })
                .cloned()
                .collect(),
        };
        Ok(FittedMissingnessIndicator { cols_ })
    }
}

impl FittedTransform for FittedMissingnessIndicator {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for col in &self.cols_ {
            let flags: Vec<Value> = match frame.column(col) {
                Some(cells) => cells
                    .iter()
                    .map(|v| Value::Num(if v.is_missing() { 1.0 } else { 0.0 }))
                    .collect(),
                // A column absent at transform time is missing everywhere.
                None => vec![Value::Num(1.0); frame.n_rows()],
            };
            out.set_column(&format!("{}{}", col, MISSING_SUFFIX), flags)?;
        }
        Ok(out)
    }
}
