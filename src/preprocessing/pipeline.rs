//! Composition of the preprocessing stages into one fit/transform object.
//!
//! Stage order is fixed: ordinal mapping → missingness indicators → domain
//! feature derivation → rare pooling → target encoding → finite cleaning →
//! all-missing drop → imputation → one-hot encoding → quantile transform.
//! Fitting runs each stage on the output of the previous one and freezes the
//! learned state; transform replays the same fitted stages and assembles the
//! numeric feature matrix in the exact column order recorded at fit time.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use crate::preprocessing::clean::{
    AllMissingDropper, FiniteCleaner, FittedAllMissingDropper, FittedFiniteCleaner,
};
use crate::preprocessing::domain::{DomainFeatures, FittedDomainFeatures};
use crate::preprocessing::impute::{FittedImputer, ImputeStrategy, Imputer};
use crate::preprocessing::missing::{FittedMissingnessIndicator, MissingnessIndicator};
use crate::preprocessing::one_hot::{FittedOneHotEncoder, OneHotEncoder};
use crate::preprocessing::ordinal::{FittedOrdinalMapper, OrdinalMapper};
use crate::preprocessing::quantile::{FittedQuantileTransformer, QuantileTransformer};
use crate::preprocessing::rare::{FittedRarePooler, RarePooler};
use crate::preprocessing::target_encoding::{FittedTargetEncoder, TargetEncoder};
use crate::preprocessing::traits::{FittedTransform, Transform};
use crate::schema;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One fitted stage of the pipeline.
///
/// Stages are tagged variants applied by straightforward sequential matching;
/// the ordered `Vec<FittedStage>` in [`FittedPreprocessor`] is the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FittedStage {
    Ordinal(FittedOrdinalMapper),
    MissingFlags(FittedMissingnessIndicator),
    Domain(FittedDomainFeatures),
    RarePool(FittedRarePooler),
    TargetEncode(FittedTargetEncoder),
    FiniteClean(FittedFiniteCleaner),
    DropAllMissing(FittedAllMissingDropper),
    Impute(FittedImputer),
    OneHot(FittedOneHotEncoder),
    Quantile(FittedQuantileTransformer),
}

impl FittedStage {
    fn transform(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        match self {
            FittedStage::Ordinal(t) => t.transform(frame),
            FittedStage::MissingFlags(t) => t.transform(frame),
            FittedStage::Domain(t) => t.transform(frame),
            FittedStage::RarePool(t) => t.transform(frame),
            FittedStage::TargetEncode(t) => t.transform(frame),
            FittedStage::FiniteClean(t) => t.transform(frame),
            FittedStage::DropAllMissing(t) => t.transform(frame),
            FittedStage::Impute(t) => t.transform(frame),
            FittedStage::OneHot(t) => t.transform(frame),
            FittedStage::Quantile(t) => t.transform(frame),
        }
    }

    /// Stage name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            FittedStage::Ordinal(_) => "ordinal_map",
            FittedStage::MissingFlags(_) => "missing_flags",
            FittedStage::Domain(_) => "domain_features",
            FittedStage::RarePool(_) => "rare_pool",
            FittedStage::TargetEncode(_) => "target_encode",
            FittedStage::FiniteClean(_) => "finite_clean",
            FittedStage::DropAllMissing(_) => "drop_all_missing",
            FittedStage::Impute(_) => "impute",
            FittedStage::OneHot(_) => "one_hot",
            FittedStage::Quantile(_) => "quantile",
        }
    }
}

/// Column grouping detected at fit time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FeatureGroups {
    /// Categorical columns: imputed most-frequent, then one-hot encoded.
    pub cat_cols: Vec<String>,
    /// Ordinal rank columns: imputed most-frequent.
    pub ord_cols: Vec<String>,
    /// Continuous numeric columns with no training missingness: imputed
    /// median, then quantile transformed.
    pub num_cont: Vec<String>,
    /// Numeric columns with training missingness: imputed median only.
    pub num_abs: Vec<String>,
}

impl FeatureGroups {
    /// Classify the columns of a cleaned training frame.
    fn detect(frame: &Frame) -> Self {
        let mut groups = FeatureGroups::default();
        for name in frame.names() {
            let cells = frame.column(name).unwrap_or(&[]);
            let has_cat = cells.iter().any(|c| matches!(c, Value::Cat(_)));
            if has_cat {
                groups.cat_cols.push(name.clone());
            } else if schema::is_ordinal(name) {
                groups.ord_cols.push(name.clone());
            } else if cells.iter().any(|c| c.is_missing()) {
                groups.num_abs.push(name.clone());
            } else {
                groups.num_cont.push(name.clone());
            }
        }
        groups
    }
}

/// Preprocessing pipeline configuration (unfitted).
#[derive(Clone, Debug)]
pub struct PreprocessingPipeline {
    te_cols: Vec<String>,
    te_alpha: f64,
    rare_min_count: usize,
    n_quantiles: usize,
}

impl Default for PreprocessingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PreprocessingPipeline {
    /// Pipeline with the canonical defaults.
    pub fn new() -> Self {
        Self {
            te_cols: schema::DEFAULT_TARGET_ENCODED
                .iter()
                .map(|c| c.to_string())
                .collect(),
            te_alpha: 30.0,
            rare_min_count: 15,
            n_quantiles: 200,
        }
    }

    /// Override the target-encoded column list.
    pub fn with_target_encoded(mut self, cols: Vec<String>) -> Self {
        self.te_cols = cols;
        self
    }

    /// Override the target-encoder smoothing weight.
    pub fn with_te_alpha(mut self, alpha: f64) -> Self {
        self.te_alpha = alpha;
        self
    }

    /// Override the rare-pooling threshold.
    pub fn with_rare_min_count(mut self, min_count: usize) -> Self {
        self.rare_min_count = min_count;
        self
    }

    /// Override the quantile-transform resolution.
    pub fn with_n_quantiles(mut self, n_quantiles: usize) -> Self {
        self.n_quantiles = n_quantiles;
        self
    }

    /// Fit the full pipeline on training data.
    ///
    /// # Errors
    /// Returns [`PipelineError::EmptyData`] for an empty frame or target and
    /// propagates stage-level errors.
    pub fn fit(&self, frame: &Frame, target: &[f64]) -> Result<FittedPreprocessor, PipelineError> {
        if frame.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit pipeline on empty data".to_string(),
            ));
        }
        if target.len() != frame.n_rows() {
            return Err(PipelineError::InvalidParameter(format!(
                "target has {} rows, frame has {}",
                target.len(),
                frame.n_rows()
            )));
        }

        let raw_columns_: Vec<String> = frame
            .names()
            .iter()
            .filter(|name| name.as_str() != schema::TARGET && name.as_str() != schema::ID_COLUMN)
            .cloned()
            .collect();
        let mut cur = align_to_raw(frame, &raw_columns_);

        let mut stages = Vec::new();
        let mut push = |stage: FittedStage, cur: &mut Frame| -> Result<(), PipelineError> {
            tracing::debug!(stage = stage.name(), cols = cur.n_cols(), "fitted stage");
            *cur = stage.transform(cur)?;
            stages.push(stage);
            Ok(())
        };

        let ordinal = OrdinalMapper::new().fit(&cur, Some(target))?;
        push(FittedStage::Ordinal(ordinal), &mut cur)?;

        let flags = MissingnessIndicator::new().fit(&cur, Some(target))?;
        push(FittedStage::MissingFlags(flags), &mut cur)?;

        let domain = DomainFeatures::new().fit(&cur, Some(target))?;
        push(FittedStage::Domain(domain), &mut cur)?;

        let cat_cols = categorical_columns(&cur);
        let rare = RarePooler::new(cat_cols.clone(), self.rare_min_count).fit(&cur, Some(target))?;
        push(FittedStage::RarePool(rare), &mut cur)?;

        let te_cols: Vec<String> = self
            .te_cols
            .iter()
            .filter(|c| cat_cols.contains(c))
            .cloned()
            .collect();
        let te = TargetEncoder::new(te_cols, self.te_alpha).fit(&cur, Some(target))?;
        push(FittedStage::TargetEncode(te), &mut cur)?;

        let finite = FiniteCleaner::new().fit(&cur, Some(target))?;
        push(FittedStage::FiniteClean(finite), &mut cur)?;

        let dropper = AllMissingDropper::new().fit(&cur, Some(target))?;
        push(FittedStage::DropAllMissing(dropper), &mut cur)?;

        let groups_ = FeatureGroups::detect(&cur);

        let impute_cat = Imputer::new(groups_.cat_cols.clone(), ImputeStrategy::MostFrequent)
            .fit(&cur, Some(target))?;
        push(FittedStage::Impute(impute_cat), &mut cur)?;

        let impute_ord = Imputer::new(groups_.ord_cols.clone(), ImputeStrategy::MostFrequent)
            .fit(&cur, Some(target))?;
        push(FittedStage::Impute(impute_ord), &mut cur)?;

        let numeric: Vec<String> = groups_
            .num_cont
            .iter()
            .chain(groups_.num_abs.iter())
            .cloned()
            .collect();
        let impute_num = Imputer::new(numeric, ImputeStrategy::Median).fit(&cur, Some(target))?;
        push(FittedStage::Impute(impute_num), &mut cur)?;

        let one_hot = OneHotEncoder::new(groups_.cat_cols.clone()).fit(&cur, Some(target))?;
        let one_hot_names = one_hot.feature_names();
        push(FittedStage::OneHot(one_hot), &mut cur)?;

        let quantile = QuantileTransformer::new(groups_.num_cont.clone())
            .with_n_quantiles(self.n_quantiles)
            .fit(&cur, Some(target))?;
        push(FittedStage::Quantile(quantile), &mut cur)?;

        // Matrix column order: one-hot block, ordinal ranks, continuous
        // numerics, missingness-bearing numerics. Fixed here, checked on
        // every transform.
        let mut feature_names_ = one_hot_names;
        feature_names_.extend(groups_.ord_cols.iter().cloned());
        feature_names_.extend(groups_.num_cont.iter().cloned());
        feature_names_.extend(groups_.num_abs.iter().cloned());

        let fitted = FittedPreprocessor {
            raw_columns_,
            stages,
            groups_,
            feature_names_,
        };
        // Every recorded feature must actually be extractable.
        fitted.to_matrix(&cur)?;
        Ok(fitted)
    }

    /// Fit and return the transformed training matrix alongside the fitted
    /// pipeline.
    pub fn fit_transform(
        &self,
        frame: &Frame,
        target: &[f64],
    ) -> Result<(FittedPreprocessor, Array2<f64>), PipelineError> {
        let fitted = self.fit(frame, target)?;
        let matrix = fitted.transform(frame)?;
        Ok((fitted, matrix))
    }
}

/// Fitted preprocessing pipeline: frozen stage states plus the raw and final
/// schemas.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    raw_columns_: Vec<String>,
    stages: Vec<FittedStage>,
    groups_: FeatureGroups,
    feature_names_: Vec<String>,
}

impl FittedPreprocessor {
    /// Raw columns the pipeline expects (synthesized as missing if absent).
    pub fn raw_columns(&self) -> &[String] {
        &self.raw_columns_
    }

    /// Final feature names, in matrix column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names_
    }

    /// Number of output features.
    pub fn n_features_out(&self) -> usize {
        self.feature_names_.len()
    }

    /// Column grouping detected at fit time.
    pub fn groups(&self) -> &FeatureGroups {
        &self.groups_
    }

    /// Stage names in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Transform a raw frame into the model feature matrix.
    ///
    /// Pure function of the fitted state: absent raw columns are synthesized
    /// as missing and resolved by the fitted imputation defaults; extra
    /// columns are ignored. Any divergence from the fit-time feature schema
    /// is a hard error.
    pub fn transform(&self, frame: &Frame) -> Result<Array2<f64>, PipelineError> {
        let processed = self.transform_frame(frame)?;
        self.to_matrix(&processed)
    }

    /// Transform a raw frame, returning the processed named columns rather
    /// than the assembled matrix.
    pub fn transform_frame(&self, frame: &Frame) -> Result<Frame, PipelineError> {
        let mut cur = align_to_raw(frame, &self.raw_columns_);
        for stage in &self.stages {
            cur = stage.transform(&cur)?;
        }
        Ok(cur)
    }

    fn to_matrix(&self, frame: &Frame) -> Result<Array2<f64>, PipelineError> {
        let n_rows = frame.n_rows();
        let n_cols = self.feature_names_.len();
        let mut matrix = Array2::<f64>::zeros((n_rows, n_cols));
        for (j, name) in self.feature_names_.iter().enumerate() {
            let cells = frame.column(name).ok_or_else(|| PipelineError::SchemaMismatch {
                expected: format!("feature column {}", name),
                got: "column absent after transform".to_string(),
            })?;
            for (i, cell) in cells.iter().enumerate() {
                let v = cell.as_num().ok_or_else(|| PipelineError::TypeMismatch {
                    column: name.clone(),
                    expected: "numeric",
                })?;
                matrix[[i, j]] = v;
            }
        }
        Ok(matrix)
    }
}

/// Restrict a frame to the raw training columns, synthesizing absent ones as
/// all-missing and coercing numeric-coded categoricals to strings.
fn align_to_raw(frame: &Frame, raw_columns: &[String]) -> Frame {
    let n = frame.n_rows();
    let mut out = Frame::new();
    for name in raw_columns {
        let cells: Vec<Value> = match frame.column(name) {
            Some(cells) => cells.to_vec(),
            None => vec![Value::Missing; n],
        };
        let cells = if schema::CODED_CATEGORICAL.contains(&name.as_str()) {
            cells
                .into_iter()
                .map(|c| match c {
                    Value::Num(v) if !v.is_nan() => Value::Cat(format_code(v)),
                    other => other,
                })
                .collect()
        } else {
            cells
        };
        // Raw columns are unique; adding cannot fail.
        let _ = out.add_column(name.clone(), cells);
    }
    out
}

/// Render a numeric category code the way it appears in the raw data.
fn format_code(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

fn categorical_columns(frame: &Frame) -> Vec<String> {
    frame
        .names()
        .iter()
        .filter(|name| {
            frame
                .column(name)
                .is_some_and(|cells| cells.iter().any(|c| matches!(c, Value::Cat(_))))
        })
        .cloned()
        .collect()
}
