//! The opaque scoring capability and its process-wide handle.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::TreeEnsemble;
use crate::error::{PricecastError, Result};
use crate::types::ModelInfo;

/// A loaded regression model.
///
/// Implementations must be safe to call from many request tasks at once.
/// Scorers whose runtime is not reentrant serialize internally.
pub trait Scorer: Send + Sync {
    /// Describe the loaded model.
    fn info(&self) -> ModelInfo;

    /// Number of scalar inputs `score` requires.
    fn expected_width(&self) -> usize {
        self.info().n_features_in
    }

    /// Score one feature vector of exactly `expected_width()` values.
    fn score(&self, features: &[f64]) -> Result<f64>;
}

/// Shared, read-only handle to the one model a process serves.
///
/// Cloning is cheap; every clone scores through the same scorer.
#[derive(Clone)]
pub struct ModelHandle {
    scorer: Arc<dyn Scorer>,
    info: ModelInfo,
}

impl ModelHandle {
    /// Wrap an already constructed scorer.
    pub fn new(scorer: impl Scorer + 'static) -> Self {
        Self::from_arc(Arc::new(scorer))
    }

    /// Wrap a shared scorer.
    ///
    /// The scorer's `expected_width()` is authoritative; the cached
    /// [`ModelInfo`] reports the same width.
    pub fn from_arc(scorer: Arc<dyn Scorer>) -> Self {
        let mut info = scorer.info();
        info.n_features_in = scorer.expected_width();
        Self { scorer, info }
    }

    /// Load a model artifact, picking the format from the file extension.
    ///
    /// - `.json`: tree ensemble export (always available)
    /// - `.onnx`: ONNX graph (requires the `onnx` feature)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PricecastError::ModelLoad(format!(
                "model artifact not found: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let mut handle = match extension.as_deref() {
            Some("json") => Self::new(TreeEnsemble::from_path(path)?),
            #[cfg(feature = "onnx")]
            Some("onnx") => Self::new(super::OnnxScorer::load(path)?),
            #[cfg(not(feature = "onnx"))]
            Some("onnx") => {
                return Err(PricecastError::ModelLoad(
                    "ONNX artifacts require the `onnx` feature".to_string(),
                ));
            }
            _ => {
                return Err(PricecastError::ModelLoad(format!(
                    "unsupported model artifact format: {}",
                    path.display()
                )));
            }
        };
        if handle.info.source.is_none() {
            handle.info.source = Some(path.to_path_buf());
        }

        info!(
            path = %path.display(),
            model_type = %handle.info.model_type,
            n_features_in = handle.info.n_features_in,
            "model loaded"
        );
        Ok(handle)
    }

    /// Number of scalar inputs the model requires.
    pub fn expected_width(&self) -> usize {
        self.info.n_features_in
    }

    /// Model metadata captured at load time.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Score a feature vector.
    ///
    /// Callers are expected to have checked the width already; a mismatched
    /// slice is still refused here rather than handed to the scorer.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        let expected = self.expected_width();
        if features.len() != expected {
            return Err(PricecastError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }
        self.scorer.score(features)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
