//! Gradient-boosted regression trees.
//!
//! Squared-error objective: each boosting round fits a depth-limited
//! regression tree to the current residuals and adds its shrunken
//! predictions to the ensemble. Consumed by the rest of the crate strictly
//! through the fit/predict contract; the fully preprocessed feature matrix
//! is finite by construction, so trees never see missing values.

use crate::error::PipelineError;
use crate::stats::mean;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hyperparameters for the boosted ensemble.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GbdtParams {
    /// Number of boosting rounds.
    pub n_estimators: usize,
    /// Shrinkage applied to each tree's contribution.
    pub learning_rate: f64,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Minimum gain required to keep a split.
    pub min_gain: f64,
    /// Row fraction sampled (without replacement) per round.
    pub subsample: f64,
    /// L2 regularization on leaf values.
    pub lambda: f64,
    /// Seed for the row sampler.
    pub seed: u64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            n_estimators: 500,
            learning_rate: 0.05,
            max_depth: 4,
            min_samples_leaf: 2,
            min_gain: 1e-9,
            subsample: 0.8,
            lambda: 3.0,
            seed: 42,
        }
    }
}

impl GbdtParams {
    fn validate(&self) -> Result<(), PipelineError> {
        if self.n_estimators == 0 {
            return Err(PipelineError::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(PipelineError::InvalidParameter(
                "learning_rate must be positive".to_string(),
            ));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(PipelineError::InvalidParameter(
                "subsample must be in (0, 1]".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(PipelineError::InvalidParameter(
                "min_samples_leaf must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A node in a regression tree, array-indexed within its tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Gradient-boosted regressor (unfitted).
#[derive(Clone, Debug, Default)]
pub struct GradientBoostedRegressor {
    params: GbdtParams,
}

impl GradientBoostedRegressor {
    pub fn new(params: GbdtParams) -> Self {
        Self { params }
    }

    /// Fit the ensemble to a feature matrix and target vector.
    ///
    /// # Errors
    /// Returns [`PipelineError`] on empty data, shape mismatch or invalid
    /// hyperparameters.
    pub fn fit(&self, x: ArrayView2<'_, f64>, y: &[f64]) -> Result<FittedGbdt, PipelineError> {
        self.params.validate()?;
        let n_rows = x.nrows();
        if n_rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit model on empty matrix".to_string(),
            ));
        }
        if y.len() != n_rows {
            return Err(PipelineError::InvalidParameter(format!(
                "target has {} rows, matrix has {}",
                y.len(),
                n_rows
            )));
        }

        let base_score_ = mean(y);
        let mut predictions = vec![base_score_; n_rows];
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let sample_size = ((n_rows as f64 * self.params.subsample).round() as usize)
            .clamp(1, n_rows);
        let mut all_rows: Vec<usize> = (0..n_rows).collect();

        for round in 0..self.params.n_estimators {
            let rows: Vec<usize> = if sample_size < n_rows {
                all_rows.shuffle(&mut rng);
                all_rows[..sample_size].to_vec()
            } else {
                all_rows.clone()
            };

            let residuals: Vec<f64> = (0..n_rows).map(|i| y[i] - predictions[i]).collect();
            let mut builder = TreeBuilder {
                x,
                residuals: &residuals,
                params: &self.params,
                nodes: Vec::new(),
            };
            builder.build(rows, 0);
            let tree = Tree {
                nodes: builder.nodes,
            };

            for (i, pred) in predictions.iter_mut().enumerate() {
                let row: Vec<f64> = x.row(i).to_vec();
                *pred += self.params.learning_rate * tree.predict_row(&row);
            }
            trees.push(tree);

            if round % 100 == 0 {
                tracing::debug!(round, "boosting");
            }
        }

        Ok(FittedGbdt {
            base_score_,
            learning_rate: self.params.learning_rate,
            trees,
            n_features_in_: x.ncols(),
        })
    }
}

struct TreeBuilder<'a, 'b> {
    x: ArrayView2<'a, f64>,
    residuals: &'b [f64],
    params: &'b GbdtParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_, '_> {
    /// Grow a node over `rows` at `depth`; returns its index.
    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let grad_sum: f64 = rows.iter().map(|&i| self.residuals[i]).sum();
        let count = rows.len() as f64;
        let leaf_value = grad_sum / (count + self.params.lambda);

        let can_split =
            depth < self.params.max_depth && rows.len() >= 2 * self.params.min_samples_leaf;
        let split = if can_split {
            self.best_split(&rows, grad_sum)
        } else {
            None
        };

        match split {
            Some((feature, threshold)) => {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&i| self.x[[i, feature]] <= threshold);
                let node_idx = self.nodes.len();
                self.nodes.push(Node::Leaf { value: 0.0 }); // placeholder
                let left = self.build(left_rows, depth + 1);
                let right = self.build(right_rows, depth + 1);
                self.nodes[node_idx] = Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
                node_idx
            }
            None => {
                self.nodes.push(Node::Leaf { value: leaf_value });
                self.nodes.len() - 1
            }
        }
    }

    /// Best `(feature, threshold)` by L2-regularized variance reduction.
    fn best_split(&self, rows: &[usize], grad_sum: f64) -> Option<(usize, f64)> {
        let lambda = self.params.lambda;
        let min_leaf = self.params.min_samples_leaf;
        let n = rows.len();
        let parent_score = grad_sum * grad_sum / (n as f64 + lambda);

        let mut best: Option<(usize, f64, f64)> = None;
        for feature in 0..self.x.ncols() {
            let mut ordered: Vec<(f64, f64)> = rows
                .iter()
                .map(|&i| (self.x[[i, feature]], self.residuals[i]))
                .collect();
            ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut left_sum = 0.0;
            for (k, window) in ordered.windows(2).enumerate() {
                left_sum += window[0].1;
                let left_n = k + 1;
                let right_n = n - left_n;
                // No threshold separates equal values.
                if window[0].0 == window[1].0 {
                    continue;
                }
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }
                let right_sum = grad_sum - left_sum;
                let gain = left_sum * left_sum / (left_n as f64 + lambda)
                    + right_sum * right_sum / (right_n as f64 + lambda)
                    - parent_score;
                if gain > self.params.min_gain
                    && best.map(|(_, _, g)| gain > g).unwrap_or(true)
                {
                    let threshold = (window[0].0 + window[1].0) / 2.0;
                    best = Some((feature, threshold, gain));
                }
            }
        }
        best.map(|(feature, threshold, _)| (feature, threshold))
    }
}

/// Fitted boosted ensemble ready for inference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FittedGbdt {
    base_score_: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
    n_features_in_: usize,
}

impl FittedGbdt {
    /// Predict one target value per matrix row.
    ///
    /// # Errors
    /// Returns [`PipelineError::SchemaMismatch`] when the matrix width
    /// differs from the training width.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>, PipelineError> {
        if x.ncols() != self.n_features_in_ {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("{} features", self.n_features_in_),
                got: format!("{} features", x.ncols()),
            });
        }
        let mut out = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let row: Vec<f64> = row.to_vec();
            let boosted: f64 = self
                .trees
                .iter()
                .map(|tree| tree.predict_row(&row))
                .sum();
            out.push(self.base_score_ + self.learning_rate * boosted);
        }
        Ok(out)
    }

    /// Number of features the model was trained on.
    pub fn n_features_in(&self) -> usize {
        self.n_features_in_
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Constant base score (training-target mean).
    pub fn base_score(&self) -> f64 {
        self.base_score_
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn step_data() -> (Array2<f64>, Vec<f64>) {
        // y is a step function of the first feature; the second is noise-free
        // but uninformative.
        let n = 40;
        let mut x = Array2::<f64>::zeros((n, 2));
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let v = i as f64;
            x[[i, 0]] = v;
            x[[i, 1]] = (i % 3) as f64;
            y.push(if v < 20.0 { 100.0 } else { 300.0 });
        }
        (x, y)
    }

    fn small_params() -> GbdtParams {
        GbdtParams {
            n_estimators: 50,
            learning_rate: 0.2,
            max_depth: 3,
            subsample: 1.0,
            lambda: 1.0,
            ..GbdtParams::default()
        }
    }

    #[test]
    fn test_fits_step_function() {
        let (x, y) = step_data();
        let fitted = GradientBoostedRegressor::new(small_params())
            .fit(x.view(), &y)
            .unwrap();
        let preds = fitted.predict(x.view()).unwrap();
        assert!((preds[0] - 100.0).abs() < 15.0, "low step: {}", preds[0]);
        assert!((preds[39] - 300.0).abs() < 15.0, "high step: {}", preds[39]);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let (x, y) = step_data();
        let params = GbdtParams {
            subsample: 0.7,
            ..small_params()
        };
        let a = GradientBoostedRegressor::new(params.clone())
            .fit(x.view(), &y)
            .unwrap();
        let b = GradientBoostedRegressor::new(params).fit(x.view(), &y).unwrap();
        let pa = a.predict(x.view()).unwrap();
        let pb = b.predict(x.view()).unwrap();
        for (u, v) in pa.iter().zip(pb.iter()) {
            assert_eq!(u.to_bits(), v.to_bits());
        }
    }

    #[test]
    fn test_constant_target_predicts_constant() {
        let (x, _) = step_data();
        let y = vec![42.0; x.nrows()];
        let fitted = GradientBoostedRegressor::new(small_params())
            .fit(x.view(), &y)
            .unwrap();
        let preds = fitted.predict(x.view()).unwrap();
        for p in preds {
            assert!((p - 42.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_feature_width_mismatch_is_error() {
        let (x, y) = step_data();
        let fitted = GradientBoostedRegressor::new(small_params())
            .fit(x.view(), &y)
            .unwrap();
        let narrow = Array2::<f64>::zeros((2, 1));
        let result = fitted.predict(narrow.view());
        assert!(matches!(result, Err(PipelineError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_empty_matrix_is_error() {
        let x = Array2::<f64>::zeros((0, 2));
        let result = GradientBoostedRegressor::new(small_params()).fit(x.view(), &[]);
        assert!(matches!(result, Err(PipelineError::EmptyData(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (x, y) = step_data();
        let params = GbdtParams {
            subsample: 0.0,
            ..GbdtParams::default()
        };
        let result = GradientBoostedRegressor::new(params).fit(x.view(), &y);
        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_serialization_round_trip() {
        let (x, y) = step_data();
        let fitted = GradientBoostedRegressor::new(small_params())
            .fit(x.view(), &y)
            .unwrap();
        let bytes = bincode::serialize(&fitted).unwrap();
        let restored: FittedGbdt = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.n_trees(), fitted.n_trees());
        let a = fitted.predict(x.view()).unwrap();
        let b = restored.predict(x.view()).unwrap();
        for (u, v) in a.iter().zip(b.iter()) {
            assert!((u - v).abs() < 1e-12);
        }
    }
}
