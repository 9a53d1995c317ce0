//! End-to-end: train on synthetic raw data, persist the artifact, reload it
//! and serve predictions.

use housecast::config::TrainConfig;
use housecast::frame::{Frame, Value};
use housecast::serve::{HouseRecord, InferenceService};
use housecast::tracking::NoopTracker;
use housecast::{schema, train};
use serde_json::json;

fn cat(s: &str) -> Value {
    Value::Cat(s.to_string())
}

/// Synthetic raw dataset shaped like the real one: numeric, ordinal and
/// categorical columns, missing values, and a learnable price signal.
fn synthetic_frame(n: usize) -> Frame {
    let grliv: Vec<Value> = (0..n)
        .map(|i| Value::Num(800.0 + (i % 16) as f64 * 95.0))
        .collect();
    let qual: Vec<Value> = (0..n).map(|i| Value::Num(3.0 + (i % 7) as f64)).collect();
    let year: Vec<Value> = (0..n)
        .map(|i| Value::Num(1948.0 + (i % 30) as f64 * 2.0))
        .collect();
    let first: Vec<Value> = (0..n)
        .map(|i| Value::Num(550.0 + (i % 12) as f64 * 55.0))
        .collect();
    let second: Vec<Value> = (0..n)
        .map(|i| Value::Num(if i % 2 == 0 { 0.0 } else { 400.0 + (i % 5) as f64 * 80.0 }))
        .collect();
    let bsmt: Vec<Value> = (0..n)
        .map(|i| {
            if i % 13 == 0 {
                Value::Missing
            } else {
                Value::Num(280.0 + (i % 8) as f64 * 70.0)
            }
        })
        .collect();
    let frontage: Vec<Value> = (0..n)
        .map(|i| {
            if i % 9 == 0 {
                Value::Missing
            } else {
                Value::Num(40.0 + (i % 20) as f64 * 2.0)
            }
        })
        .collect();
    let nbhd: Vec<Value> = (0..n)
        .map(|i| cat(["CollgCr", "NoRidge", "OldTown", "Sawyer"][i % 4]))
        .collect();
    let bldg: Vec<Value> = (0..n)
        .map(|i| cat(if i % 5 == 0 { "Twnhs" } else { "1Fam" }))
        .collect();
    let exter: Vec<Value> = (0..n)
        .map(|i| cat(["TA", "TA", "Gd", "Ex"][i % 4]))
        .collect();
    let month: Vec<Value> = (0..n).map(|i| Value::Num(1.0 + (i % 12) as f64)).collect();
    let full_bath: Vec<Value> = (0..n).map(|i| Value::Num(1.0 + (i % 2) as f64)).collect();
    let garage_cars: Vec<Value> = (0..n).map(|i| Value::Num((i % 4) as f64)).collect();
    let garage_area: Vec<Value> = (0..n)
        .map(|i| Value::Num(180.0 + (i % 4) as f64 * 130.0))
        .collect();

    let price: Vec<Value> = (0..n)
        .map(|i| {
            let g = 800.0 + (i % 16) as f64 * 95.0;
            let q = 3.0 + (i % 7) as f64;
            let c = (i % 4) as f64;
            Value::Num(25_000.0 + 95.0 * g + 13_000.0 * q + 6_000.0 * c)
        })
        .collect();

    Frame::from_columns([
        ("GrLivArea", grliv),
        ("OverallQual", qual),
        ("YearBuilt", year),
        ("YrSold", vec![Value::Num(2008.0); n]),
        ("1stFlrSF", first),
        ("2ndFlrSF", second),
        ("TotalBsmtSF", bsmt),
        ("LotFrontage", frontage),
        ("Neighborhood", nbhd),
        ("BldgType", bldg),
        ("ExterQual", exter),
        ("MoSold", month),
        ("FullBath", full_bath),
        ("GarageCars", garage_cars),
        ("GarageArea", garage_area),
        (schema::TARGET, price),
    ])
    .unwrap()
}

fn quick_config() -> TrainConfig {
    let mut config = TrainConfig::default();
    config.model.n_estimators = 80;
    config.model.learning_rate = 0.1;
    config.model.subsample = 1.0;
    config.features.rare_min_count = 3;
    config.evaluation.cv_folds = 0;
    config
}

fn trained_service() -> InferenceService {
    let frame = synthetic_frame(96);
    let outcome = train::train(&frame, &quick_config(), &mut NoopTracker).unwrap();

    // Persist and reload: serving always goes through the artifact file.
    let path = std::env::temp_dir().join("housecast_e2e_artifact.bin");
    outcome.artifact.save(&path).unwrap();
    let service = InferenceService::load(&path).unwrap();
    std::fs::remove_file(path).ok();
    service
}

#[test]
fn documented_example_request_predicts_inside_interval() {
    let service = trained_service();
    let record: HouseRecord = serde_json::from_value(json!({
        "OverallQual": 7,
        "GrLivArea": 1710,
        "YearBuilt": 2003,
        "FullBath": 2,
        "GarageCars": 2,
        "GarageArea": 548
    }))
    .unwrap();

    let prediction = service.predict(&record).unwrap();
    assert!(prediction.predicted_price > 0.0);
    assert!(prediction.confidence_interval.lower < prediction.predicted_price);
    assert!(prediction.predicted_price < prediction.confidence_interval.upper);
}

#[test]
fn empty_request_resolves_through_fitted_defaults() {
    let service = trained_service();
    let prediction = service.predict(&HouseRecord::default()).unwrap();
    assert!(prediction.predicted_price.is_finite());
    assert!(prediction.predicted_price > 0.0);
}

#[test]
fn repeated_transform_is_bit_identical() {
    let service = trained_service();
    let record: HouseRecord = serde_json::from_value(json!({
        "GrLivArea": 1262,
        "Neighborhood": "NoRidge",
        "ExterQual": "Gd"
    }))
    .unwrap();
    let frame = record.to_frame();
    let a = service.artifact().preprocessor.transform(&frame).unwrap();
    let b = service.artifact().preprocessor.transform(&frame).unwrap();
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn batch_isolates_errors_and_preserves_order() {
    let service = trained_service();
    let records = vec![
        json!({"GrLivArea": 1000}),
        json!({"GrLivArea": 1500}),
        json!({"GrLivArea": {"nested": true}}),
        json!({"GrLivArea": 2300}),
    ];
    let response = service.predict_batch(&records);

    assert_eq!(response.results.len(), 4);
    assert_eq!(response.count, 3);
    assert!(response.results[2].prediction().is_none());
    for idx in [0usize, 1, 3] {
        assert!(response.results[idx].prediction().is_some(), "index {}", idx);
    }
    assert!(response.statistics.is_some());
}

#[test]
fn unseen_category_is_not_an_error() {
    let service = trained_service();
    let record: HouseRecord = serde_json::from_value(json!({
        "Neighborhood": "NeverSeenBefore",
        "BldgType": "AlsoNew",
        "GrLivArea": 1400
    }))
    .unwrap();
    let prediction = service.predict(&record).unwrap();
    assert!(prediction.predicted_price > 0.0);
}

#[test]
fn artifact_round_trip_predicts_identically() {
    let frame = synthetic_frame(96);
    let outcome = train::train(&frame, &quick_config(), &mut NoopTracker).unwrap();

    let record: HouseRecord = serde_json::from_value(json!({"GrLivArea": 1600})).unwrap();
    let direct = InferenceService::new(outcome.artifact.clone())
        .predict(&record)
        .unwrap();

    let path = std::env::temp_dir().join("housecast_e2e_roundtrip.bin");
    outcome.artifact.save(&path).unwrap();
    let reloaded = InferenceService::load(&path).unwrap().predict(&record).unwrap();
    std::fs::remove_file(path).ok();

    assert!((direct.predicted_price - reloaded.predicted_price).abs() < 1e-9);
}

#[test]
fn trained_model_tracks_the_signal() {
    let frame = synthetic_frame(120);
    let mut config = quick_config();
    config.evaluation.cv_folds = 3;
    let outcome = train::train(&frame, &config, &mut NoopTracker).unwrap();
    assert!(
        outcome.metrics.test_r2 > 0.5,
        "test_r2 = {}",
        outcome.metrics.test_r2
    );
    assert!(outcome.metrics.cv_rmse_mean > 0.0);
}
