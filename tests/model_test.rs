//! Tests for loading model artifacts and scoring through the service.

use std::path::{Path, PathBuf};

use pricecast::model::Aggregation;
use pricecast::{ModelHandle, PredictionService, PricecastError, TreeEnsemble};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Two stumps over a 105-wide input: one on category, one on qty.
fn price_forest() -> Value {
    json!({
        "model_type": "RandomForestRegressor",
        "n_features_in": 105,
        "estimators": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [2, -2, -2],
                "threshold": [4.5, -2.0, -2.0],
                "value": [0.0, 400.0, 800.0],
            },
            {
                "children_left": [1, 3, -1, -1, -1],
                "children_right": [2, 4, -1, -1, -1],
                "feature": [6, 3, -2, -2, -2],
                "threshold": [1.5, 5.5, -2.0, -2.0, -2.0],
                "value": [0.0, 0.0, 1200.0, 500.0, 600.0],
            },
        ],
    })
}

fn write_artifact(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn load(path: &Path) -> ModelHandle {
    ModelHandle::load(path).expect("artifact should load")
}

#[test]
fn json_artifact_loads_with_introspected_width() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "Price_model.json", &price_forest().to_string());

    let handle = load(&path);
    assert_eq!(handle.expected_width(), 105);
    let info = handle.info();
    assert_eq!(info.model_type, "RandomForestRegressor");
    assert_eq!(info.n_estimators, Some(2));
    assert_eq!(info.source.as_deref(), Some(path.as_path()));
}

#[test]
fn extension_match_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "PRICE_MODEL.JSON", &price_forest().to_string());
    assert_eq!(load(&path).expected_width(), 105);
}

#[test]
fn service_scores_through_forest() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "Price_model.json", &price_forest().to_string());
    let service = PredictionService::new(Some(load(&path)));

    // category 2 -> 400; qty 1 and size 3 -> 500; mean 450
    let small = service
        .predict_value(json!({"category": 2, "size": 3, "qty": 1}))
        .unwrap();
    assert_eq!(small.value, 450.0);
    assert_eq!(small.features_used, 105);

    // category 8 -> 800; qty 3 -> 1200; mean 1000
    let large = service
        .predict_value(json!({"category": 8, "size": 3, "qty": 3}))
        .unwrap();
    assert_eq!(large.value, 1000.0);
}

#[test]
fn corrupt_artifact_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "Price_model.json", "{\"n_features_in\": 7");
    let err = ModelHandle::load(&path).unwrap_err();
    assert!(matches!(err, PricecastError::ModelLoad(_)));
}

#[test]
fn invalid_tree_is_a_load_error() {
    let mut model = price_forest();
    model["estimators"][0]["feature"][0] = json!(200);
    let err = TreeEnsemble::from_json(&model.to_string()).unwrap_err();
    assert!(err.to_string().contains("estimator 0"));
}

#[cfg(not(feature = "onnx"))]
#[test]
fn onnx_without_feature_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = write_artifact(&dir, "Price_model.onnx", "not really onnx");
    let err = ModelHandle::load(&path).unwrap_err();
    assert!(err.to_string().contains("`onnx` feature"));
}

#[test]
fn boosted_artifact_uses_sum_aggregation() {
    let model = json!({
        "model_type": "GradientBoostingRegressor",
        "n_features_in": 7,
        "aggregation": "sum",
        "base_score": 650.0,
        "learning_rate": 0.1,
        "estimators": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [5, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [0.0, -50.0, 150.0],
        }],
    });
    let forest = TreeEnsemble::from_json(&model.to_string()).unwrap();
    assert_eq!(forest.aggregation(), Aggregation::Sum);

    let service = PredictionService::new(Some(ModelHandle::new(forest)));
    let retail = service.predict_value(json!({"b2b": 0})).unwrap();
    let wholesale = service.predict_value(json!({"b2b": true})).unwrap();
    assert_eq!(retail.value, 645.0);
    assert_eq!(wholesale.value, 665.0);
}
