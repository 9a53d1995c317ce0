//! Offline training orchestration.
//!
//! Single-shot batch process: load, split, fit the pipeline and model on the
//! training split only, cross-validate, measure held-out error, estimate the
//! residual spread for interval construction, and bundle the artifact.
//! Serving never re-enters this module.

use crate::artifact::{PipelineArtifact, TrainMetrics, ARTIFACT_VERSION};
use crate::config::{FeatureConfig, TrainConfig};
use crate::error::PipelineError;
use crate::frame::Frame;
use crate::model::{FittedGbdt, GradientBoostedRegressor};
use crate::preprocessing::{FittedPreprocessor, PreprocessingPipeline};
use crate::schema;
use crate::stats::{mean, r2_score, rmse, std_dev};
use crate::tracking::ExperimentTracker;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Result of a training run.
#[derive(Debug)]
pub struct TrainOutcome {
    pub artifact: PipelineArtifact,
    pub metrics: TrainMetrics,
}

/// Split the target column off a raw frame.
///
/// Rows with a missing target are excluded. A missing target column aborts
/// training.
pub fn extract_target(frame: &Frame) -> Result<(Frame, Vec<f64>), PipelineError> {
    let cells = frame.require_column(schema::TARGET)?;
    let keep: Vec<usize> = (0..frame.n_rows())
        .filter(|&i| cells[i].as_num().is_some())
        .collect();
    if keep.is_empty() {
        return Err(PipelineError::EmptyData(format!(
            "target column {} has no observed values",
            schema::TARGET
        )));
    }
    if keep.len() < frame.n_rows() {
        tracing::warn!(
            dropped = frame.n_rows() - keep.len(),
            "rows with missing target excluded"
        );
    }
    let kept = frame.take_rows(&keep);
    let target: Vec<f64> = keep
        .iter()
        .filter_map(|&i| cells[i].as_num())
        .collect();
    Ok((kept, target))
}

/// Shuffled train/test index split.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let n_test = ((n as f64 * test_size).round() as usize).clamp(1, n.saturating_sub(1).max(1));
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Shuffled K-fold `(train, validation)` index pairs.
pub fn kfold_indices(n: usize, folds: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut out = Vec::with_capacity(folds);
    let base = n / folds;
    let extra = n % folds;
    let mut start = 0;
    for fold in 0..folds {
        let size = base + usize::from(fold < extra);
        let val: Vec<usize> = indices[start..start + size].to_vec();
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[start + size..].iter())
            .copied()
            .collect();
        out.push((train, val));
        start += size;
    }
    out
}

fn pipeline_from(features: &FeatureConfig) -> PreprocessingPipeline {
    PreprocessingPipeline::new()
        .with_target_encoded(features.target_encoded_columns.clone())
        .with_te_alpha(features.te_alpha)
        .with_rare_min_count(features.rare_min_count)
        .with_n_quantiles(features.n_quantiles)
}

/// Fit pipeline and model on a row subset.
fn fit_once(
    frame: &Frame,
    target: &[f64],
    rows: &[usize],
    config: &TrainConfig,
) -> Result<(FittedPreprocessor, FittedGbdt), PipelineError> {
    let train_frame = frame.take_rows(rows);
    let train_target: Vec<f64> = rows.iter().map(|&i| target[i]).collect();
    let (preprocessor, matrix) =
        pipeline_from(&config.features).fit_transform(&train_frame, &train_target)?;
    let model = GradientBoostedRegressor::new(config.model.clone())
        .fit(matrix.view(), &train_target)?;
    Ok((preprocessor, model))
}

/// Predict a row subset through a fitted pipeline and model.
fn predict_rows(
    preprocessor: &FittedPreprocessor,
    model: &FittedGbdt,
    frame: &Frame,
    rows: &[usize],
) -> Result<Vec<f64>, PipelineError> {
    let subset = frame.take_rows(rows);
    let matrix = preprocessor.transform(&subset)?;
    model.predict(matrix.view())
}

/// Run the full training protocol and assemble the artifact.
pub fn train(
    frame: &Frame,
    config: &TrainConfig,
    tracker: &mut dyn ExperimentTracker,
) -> Result<TrainOutcome, PipelineError> {
    config.validate()?;
    let (frame, target) = extract_target(frame)?;
    let n = frame.n_rows();
    if n < 4 {
        return Err(PipelineError::EmptyData(format!(
            "{} rows is not enough to train",
            n
        )));
    }

    tracker.log_param("model_type", "gbdt");
    tracker.log_param("n_estimators", &config.model.n_estimators.to_string());
    tracker.log_param("learning_rate", &config.model.learning_rate.to_string());
    tracker.log_param("max_depth", &config.model.max_depth.to_string());
    tracker.log_param("subsample", &config.model.subsample.to_string());
    tracker.log_param("lambda", &config.model.lambda.to_string());
    tracker.log_param("te_alpha", &config.features.te_alpha.to_string());
    tracker.log_param(
        "rare_min_count",
        &config.features.rare_min_count.to_string(),
    );

    let (train_rows, test_rows) =
        train_test_split(n, config.evaluation.test_size, config.evaluation.seed);
    tracing::info!(
        train = train_rows.len(),
        test = test_rows.len(),
        "split data"
    );

    // Cross-validation on the training split only; each fold refits the
    // pipeline so encoder statistics never leak into their validation part.
    let mut cv_rmse = Vec::new();
    let mut cv_r2 = Vec::new();
    let folds = config.evaluation.cv_folds;
    if folds >= 2 && train_rows.len() >= folds * 2 {
        for (fold, (fold_train, fold_val)) in
            kfold_indices(train_rows.len(), folds, config.evaluation.seed)
                .into_iter()
                .enumerate()
        {
            let fold_train: Vec<usize> = fold_train.iter().map(|&i| train_rows[i]).collect();
            let fold_val: Vec<usize> = fold_val.iter().map(|&i| train_rows[i]).collect();
            let (preprocessor, model) = fit_once(&frame, &target, &fold_train, config)?;
            let preds = predict_rows(&preprocessor, &model, &frame, &fold_val)?;
            let truth: Vec<f64> = fold_val.iter().map(|&i| target[i]).collect();
            let fold_rmse = rmse(&truth, &preds);
            let fold_r2 = r2_score(&truth, &preds);
            tracing::debug!(fold, rmse = fold_rmse, r2 = fold_r2, "cv fold");
            cv_rmse.push(fold_rmse);
            cv_r2.push(fold_r2);
        }
    } else if folds >= 2 {
        tracing::warn!(rows = train_rows.len(), folds, "too few rows, skipping CV");
    }

    // Final fit on the training split, evaluated on the held-out split.
    let (preprocessor, model) = fit_once(&frame, &target, &train_rows, config)?;
    let test_preds = predict_rows(&preprocessor, &model, &frame, &test_rows)?;
    let test_truth: Vec<f64> = test_rows.iter().map(|&i| target[i]).collect();
    let test_rmse = rmse(&test_truth, &test_preds);
    let test_r2 = r2_score(&test_truth, &test_preds);
    let residuals: Vec<f64> = test_truth
        .iter()
        .zip(test_preds.iter())
        .map(|(t, p)| t - p)
        .collect();
    let residual_std_ = std_dev(&residuals);

    let metrics = TrainMetrics {
        cv_rmse_mean: mean(&cv_rmse),
        cv_rmse_std: std_dev(&cv_rmse),
        cv_r2_mean: mean(&cv_r2),
        cv_r2_std: std_dev(&cv_r2),
        test_rmse,
        test_r2,
    };

    tracker.log_metric("cv_rmse_mean", metrics.cv_rmse_mean);
    tracker.log_metric("cv_rmse_std", metrics.cv_rmse_std);
    tracker.log_metric("cv_r2_mean", metrics.cv_r2_mean);
    tracker.log_metric("cv_r2_std", metrics.cv_r2_std);
    tracker.log_metric("test_rmse", metrics.test_rmse);
    tracker.log_metric("test_r2", metrics.test_r2);
    tracker.log_metric("residual_std", residual_std_);

    tracing::info!(
        test_rmse = metrics.test_rmse,
        test_r2 = metrics.test_r2,
        "training complete"
    );

    let artifact = PipelineArtifact {
        preprocessor,
        model,
        interval: config.interval,
        residual_std_,
        metrics: metrics.clone(),
        version: ARTIFACT_VERSION.to_string(),
    };

    Ok(TrainOutcome { artifact, metrics })
}
