//! One-hot encoding of categorical columns.
//!
//! Each encoded column is replaced by one binary column per level seen at
//! fit time, named `<col>_<level>` in sorted level order. Unknown levels at
//! inference time encode to all zeros.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder (unfitted).
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    cols: Vec<String>,
}

impl OneHotEncoder {
    pub fn new(cols: Vec<String>) -> Self {
        Self { cols }
    }
}

/// Fitted one-hot encoder holding the per-column level vocabularies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    /// Sorted levels per encoded column, in the fit-time column order.
    categories_: Vec<(String, Vec<String>)>,
}

impl FittedOneHotEncoder {
    /// Levels learned for one column, if it was encoded.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories_
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, levels)| levels.as_slice())
    }

    /// Output column names in emission order.
    pub fn feature_names(&self) -> Vec<String> {
        self.categories_
            .iter()
            .flat_map(|(col, levels)| {
                levels.iter().map(move |level| format!("{}_{}", col, level))
            })
            .collect()
    }

    /// Total number of emitted binary columns.
    pub fn n_features_out(&self) -> usize {
        self.categories_.iter().map(|(_, levels)| levels.len()).sum()
    }
}

impl Transform for OneHotEncoder {
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        if frame.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit one-hot encoder on empty data".to_string(),
            ));
        }
        let mut categories_ = Vec::with_capacity(self.cols.len());
        for col in &self.cols {
            let cells = frame.require_column(col)?;
            let levels: BTreeSet<String> = cells
                .iter()
                .filter_map(|c| c.as_cat().map(|s| s.to_string()))
                .collect();
            categories_.push((col.clone(), levels.into_iter().collect()));
        }
        Ok(FittedOneHotEncoder { categories_ })
    }
}

impl FittedTransform for FittedOneHotEncoder {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for (col, levels) in &self.categories_ {
            let cells = frame.require_column(col)?;
            out.drop_column(col);
            for level in levels {
                // Unknown and missing cells leave every indicator at 0.
                let indicator: Vec<Value> = cells
                    .iter()
                    .map(|cell| {
                        Value::Num(if cell.as_cat() == Some(level.as_str()) {
                            1.0
                        } else {
                            0.0
                        })
                    })
                    .collect();
                out.add_column(format!("{}_{}", col, level), indicator)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(s: &str) -> Value {
        Value::Cat(s.to_string())
    }

    fn training() -> Frame {
        Frame::from_columns([(
            "BldgType",
            vec![cat("1Fam"), cat("Twnhs"), cat("1Fam"), cat("Duplex")],
        )])
        .unwrap()
    }

    #[test]
    fn test_one_hot_levels_sorted() {
        let frame = training();
        let fitted = OneHotEncoder::new(vec!["BldgType".to_string()])
            .fit(&frame, None)
            .unwrap();
        assert_eq!(
            fitted.categories("BldgType").unwrap(),
            &["1Fam".to_string(), "Duplex".to_string(), "Twnhs".to_string()]
        );
        assert_eq!(fitted.n_features_out(), 3);
    }

    #[test]
    fn test_one_hot_transform_replaces_column() {
        let frame = training();
        let fitted = OneHotEncoder::new(vec!["BldgType".to_string()])
            .fit(&frame, None)
            .unwrap();
        let out = fitted.transform(&frame).unwrap();

        assert!(!out.has_column("BldgType"));
        assert_eq!(
            out.column("BldgType_1Fam").unwrap(),
            &[
                Value::Num(1.0),
                Value::Num(0.0),
                Value::Num(1.0),
                Value::Num(0.0)
            ]
        );
        assert_eq!(
            out.column("BldgType_Twnhs").unwrap(),
            &[
                Value::Num(0.0),
                Value::Num(1.0),
                Value::Num(0.0),
                Value::Num(0.0)
            ]
        );
    }

    #[test]
    fn test_one_hot_unknown_level_is_all_zeros() {
        let frame = training();
        let fitted = OneHotEncoder::new(vec!["BldgType".to_string()])
            .fit(&frame, None)
            .unwrap();
        let probe = Frame::from_columns([("BldgType", vec![cat("2fmCon")])]).unwrap();
        let out = fitted.transform(&probe).unwrap();
        assert_eq!(out.column("BldgType_1Fam").unwrap(), &[Value::Num(0.0)]);
        assert_eq!(out.column("BldgType_Duplex").unwrap(), &[Value::Num(0.0)]);
        assert_eq!(out.column("BldgType_Twnhs").unwrap(), &[Value::Num(0.0)]);
    }

    #[test]
    fn test_one_hot_feature_names_order() {
        let frame = training();
        let fitted = OneHotEncoder::new(vec!["BldgType".to_string()])
            .fit(&frame, None)
            .unwrap();
        assert_eq!(
            fitted.feature_names(),
            vec!["BldgType_1Fam", "BldgType_Duplex", "BldgType_Twnhs"]
        );
    }

    #[test]
    fn test_one_hot_missing_fit_column_is_error() {
        let frame = training();
        let result = OneHotEncoder::new(vec!["Absent".to_string()]).fit(&frame, None);
        assert!(matches!(result, Err(PipelineError::MissingColumn(_))));
    }
}
