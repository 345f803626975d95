//! Learned-classifier artifact: a feature scaler plus a logistic model,
//! versioned and hot-swapped as one unit.
//!
//! The offline trainer periodically rewrites the artifact file; `reload`
//! replaces the in-memory pair atomically so the scoring engine never
//! observes a scaler and model from two different training runs.

use crate::error::EngineError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Standard feature scaling: (x - mean) / std per feature.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl FeatureScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, EngineError> {
        if features.len() != self.mean.len() || features.len() != self.std.len() {
            return Err(EngineError::Model(format!(
                "feature shape mismatch: {} values, scaler expects {}",
                features.len(),
                self.mean.len()
            )));
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(x, (m, s))| if *s > 0.0 { (x - m) / s } else { x - m })
            .collect())
    }
}

/// Logistic regression head exported by the trainer.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticModel {
    fn predict(&self, scaled: &[f64]) -> Result<f64, EngineError> {
        if scaled.len() != self.weights.len() {
            return Err(EngineError::Model(format!(
                "feature shape mismatch: {} values, model expects {}",
                scaled.len(),
                self.weights.len()
            )));
        }
        let z: f64 = self
            .weights
            .iter()
            .zip(scaled.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

/// One training run's output, loaded and swapped as a unit.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Declared feature order; the caller supplies values by name.
    pub feature_names: Vec<String>,
    pub scaler: FeatureScaler,
    pub model: LogisticModel,
    #[serde(default)]
    pub version: Option<String>,
}

impl ModelArtifact {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Model(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| EngineError::Model(format!("parse {}: {}", path.display(), e)))
    }

    /// Assemble the declared feature vector, scale it and return the
    /// predicted probability. A missing feature is a model error, left to
    /// the caller's heuristic fallback.
    pub fn predict(&self, features: &HashMap<&str, f64>) -> Result<f64, EngineError> {
        let mut ordered = Vec::with_capacity(self.feature_names.len());
        for name in &self.feature_names {
            let value = features
                .get(name.as_str())
                .ok_or_else(|| EngineError::Model(format!("missing feature '{}'", name)))?;
            ordered.push(*value);
        }
        let scaled = self.scaler.transform(&ordered)?;
        self.model.predict(&scaled)
    }
}

/// Atomically swappable artifact cell read by the scoring engine.
#[derive(Default)]
pub struct ClassifierCell {
    inner: RwLock<Option<Arc<ModelArtifact>>>,
}

impl ClassifierCell {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the artifact at startup. A load failure leaves the cell empty
    /// and the engine on heuristic-only scoring.
    pub fn load_from(path: &Path) -> Self {
        let cell = Self::empty();
        cell.reload(path);
        cell
    }

    /// Replace the artifact in place. On failure the previous artifact stays
    /// active.
    pub fn reload(&self, path: &Path) {
        match ModelArtifact::load(path) {
            Ok(artifact) => {
                info!(
                    path = %path.display(),
                    version = artifact.version.as_deref().unwrap_or("unversioned"),
                    features = artifact.feature_names.len(),
                    "classifier artifact loaded"
                );
                let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
                *guard = Some(Arc::new(artifact));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "classifier not loaded, heuristic scoring only");
            }
        }
    }

    pub fn current(&self) -> Option<Arc<ModelArtifact>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
