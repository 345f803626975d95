//! Unit tests for the classifier artifact and hot-swap cell

use serde_json::json;
use signalis::classifier::{ClassifierCell, ModelArtifact};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

fn write_artifact(path: &Path, bias: f64, version: &str) {
    let artifact = json!({
        "feature_names": ["x", "y"],
        "scaler": { "mean": [10.0, 0.0], "std": [2.0, 1.0] },
        "model": { "weights": [1.0, 0.0], "bias": bias },
        "version": version
    });
    std::fs::write(path, artifact.to_string()).unwrap();
}

#[test]
fn test_predict_scales_then_applies_logistic() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!({
            "feature_names": ["x"],
            "scaler": { "mean": [0.0], "std": [1.0] },
            "model": { "weights": [1.0], "bias": 0.0 }
        })
    )
    .unwrap();

    let artifact = ModelArtifact::load(file.path()).unwrap();
    // z = 0 -> sigmoid = 0.5.
    let p = artifact.predict(&HashMap::from([("x", 0.0)])).unwrap();
    assert!((p - 0.5).abs() < 1e-12);

    // x = 2 -> sigmoid(2) ~ 0.8808.
    let p = artifact.predict(&HashMap::from([("x", 2.0)])).unwrap();
    assert!((p - 0.880797).abs() < 1e-5);
}

#[test]
fn test_predict_applies_scaler() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_artifact(&path, 0.0, "v1");

    let artifact = ModelArtifact::load(&path).unwrap();
    // x scaled: (10 - 10) / 2 = 0 -> z = 0 -> 0.5.
    let p = artifact
        .predict(&HashMap::from([("x", 10.0), ("y", 123.0)]))
        .unwrap();
    assert!((p - 0.5).abs() < 1e-12);
}

#[test]
fn test_missing_feature_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_artifact(&path, 0.0, "v1");

    let artifact = ModelArtifact::load(&path).unwrap();
    assert!(artifact.predict(&HashMap::from([("x", 1.0)])).is_err());
}

#[test]
fn test_load_failure_leaves_cell_empty() {
    let cell = ClassifierCell::load_from(Path::new("/nonexistent/artifact.json"));
    assert!(cell.current().is_none());
}

#[test]
fn test_reload_swaps_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_artifact(&path, 0.0, "v1");

    let cell = ClassifierCell::load_from(&path);
    assert_eq!(cell.current().unwrap().version.as_deref(), Some("v1"));

    write_artifact(&path, 1.0, "v2");
    cell.reload(&path);
    assert_eq!(cell.current().unwrap().version.as_deref(), Some("v2"));
}

#[test]
fn test_failed_reload_keeps_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_artifact(&path, 0.0, "v1");

    let cell = ClassifierCell::load_from(&path);
    std::fs::write(&path, "broken json").unwrap();
    cell.reload(&path);
    // The corrupt rewrite never replaces the active artifact.
    assert_eq!(cell.current().unwrap().version.as_deref(), Some("v1"));
}
