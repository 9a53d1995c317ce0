//! Ordinal mapping for ordered categorical columns.
//!
//! Maps quality-tier style values to their rank in a fixed vocabulary.
//! There is no fit-time learning beyond intersecting the static vocabulary
//! with the columns actually present.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::traits::{FittedTransform, Transform};
use crate::schema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Ordinal mapper (unfitted).
///
/// Configured with `(column, ordered vocabulary)` pairs; defaults to the
/// canonical vocabulary table in [`schema`].
#[derive(Clone, Debug)]
pub struct OrdinalMapper {
    mapping: Vec<(String, Vec<String>)>,
}

impl OrdinalMapper {
    /// Create a mapper over the canonical ordinal vocabulary.
    pub fn new() -> Self {
        let mapping = schema::ORDINAL_VOCABULARY
            .iter()
            .map(|(col, vocab)| {
                (
                    col.to_string(),
                    vocab.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect();
        Self { mapping }
    }

    /// Create a mapper with an explicit vocabulary table.
    pub fn with_mapping(mapping: Vec<(String, Vec<String>)>) -> Self {
        Self { mapping }
    }
}

impl Default for OrdinalMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Fitted ordinal mapper holding the per-column rank tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedOrdinalMapper {
    /// Rank lookup per column, restricted to columns seen at fit time.
    maps_: BTreeMap<String, HashMap<String, usize>>,
}

impl FittedOrdinalMapper {
    /// Rank table for one column, if it was mapped.
    pub fn ranks(&self, column: &str) -> Option<&HashMap<String, usize>> {
        self.maps_.get(column)
    }
}

impl Transform for OrdinalMapper {
    type Fitted = FittedOrdinalMapper;

    fn fit(&self, frame: &Frame, _target: Option<&[f64]>) -> Result<Self::Fitted, PipelineError> {
        let mut maps_ = BTreeMap::new();
        for (col, vocab) in &self.mapping {
            if frame.has_column(col) {
                let ranks: HashMap<String, usize> = vocab
                    .iter()
                    .enumerate()
                    .map(|(rank, level)| (level.clone(), rank))
                    .collect();
                maps_.insert(col.clone(), ranks);
            }
        }
        Ok(FittedOrdinalMapper { maps_ })
    }
}

impl FittedTransform for FittedOrdinalMapper {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut out = frame.clone();
        for (col, ranks) in &self.maps_ {
            let Some(cells) = frame.column(col) else {
                continue;
            };
            let mapped: Vec<Value> = cells
                .iter()
                .map(|cell| match cell.as_cat().and_then(|s| ranks.get(s)) {
                    Some(&rank) => Value::Num(rank as f64),
                    // Unknown levels and non-string cells become missing and
                    // are handled downstream by imputation.
                    None => Value::Missing,
                })
                .collect();
            out.set_column(col, mapped)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality_frame() -> Frame {
        Frame::from_columns([(
            "ExterQual",
            vec![
                Value::Cat("TA".to_string()),
                Value::Cat("Gd".to_string()),
                Value::Cat("Ex".to_string()),
                Value::Missing,
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_ordinal_mapper_ranks() {
        let frame = quality_frame();
        let fitted = OrdinalMapper::new().fit(&frame, None).unwrap();
        let out = fitted.transform(&frame).unwrap();

        let cells = out.column("ExterQual").unwrap();
        assert_eq!(cells[0], Value::Num(2.0)); // TA
        assert_eq!(cells[1], Value::Num(3.0)); // Gd
        assert_eq!(cells[2], Value::Num(4.0)); // Ex
        assert_eq!(cells[3], Value::Missing);
    }

    #[test]
    fn test_ordinal_mapper_unknown_level_is_missing() {
        let frame = quality_frame();
        let fitted = OrdinalMapper::new().fit(&frame, None).unwrap();

        let probe = Frame::from_columns([("ExterQual", vec![Value::Cat("??".to_string())])])
            .unwrap();
        let out = fitted.transform(&probe).unwrap();
        assert_eq!(out.column("ExterQual").unwrap()[0], Value::Missing);
    }

    #[test]
    fn test_ordinal_mapper_skips_absent_columns() {
        let frame = quality_frame();
        let fitted = OrdinalMapper::new().fit(&frame, None).unwrap();
        // Only the column present at fit time gets a rank table.
        assert!(fitted.ranks("ExterQual").is_some());
        assert!(fitted.ranks("PoolQC").is_none());
    }

    #[test]
    fn test_ordinal_mapper_leaves_other_columns_alone() {
        let mut frame = quality_frame();
        frame
            .add_column("GrLivArea".to_string(), vec![Value::Num(1710.0); 4])
            .unwrap();
        let fitted = OrdinalMapper::new().fit(&frame, None).unwrap();
        let out = fitted.transform(&frame).unwrap();
        assert_eq!(out.column("GrLivArea").unwrap()[0], Value::Num(1710.0));
    }

    #[test]
    fn test_ordinal_mapper_custom_mapping() {
        let mapper = OrdinalMapper::with_mapping(vec![(
            "Size".to_string(),
            vec!["S".to_string(), "M".to_string(), "L".to_string()],
        )]);
        let frame = Frame::from_columns([(
            "Size",
            vec![Value::Cat("L".to_string()), Value::Cat("S".to_string())],
        )])
        .unwrap();
        let out = mapper.fit(&frame, None).unwrap().transform(&frame).unwrap();
        assert_eq!(out.column("Size").unwrap()[0], Value::Num(2.0));
        assert_eq!(out.column("Size").unwrap()[1], Value::Num(0.0));
    }
}
