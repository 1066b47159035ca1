//! Model metadata types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};

/// Introspected description of a loaded model artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Estimator family (e.g., "RandomForestRegressor", "onnx").
    pub model_type: String,
    /// Number of scalar inputs the model requires.
    pub n_features_in: usize,
    /// Number of trees, for ensemble models.
    pub n_estimators: Option<usize>,
    /// Artifact the model was loaded from, if any.
    ///
    /// Serialized as the file name only; the directory stays server-side.
    #[serde(serialize_with = "serialize_file_name")]
    pub source: Option<PathBuf>,
}

impl ModelInfo {
    /// Create model info with required fields.
    pub fn new(model_type: impl Into<String>, n_features_in: usize) -> Self {
        Self {
            model_type: model_type.into(),
            n_features_in,
            n_estimators: None,
            source: None,
        }
    }

    /// Set the estimator count.
    pub fn with_estimators(mut self, n: usize) -> Self {
        self.n_estimators = Some(n);
        self
    }

    /// Record where the artifact came from.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

fn serialize_file_name<S: Serializer>(
    source: &Option<PathBuf>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match source.as_deref().and_then(Path::file_name) {
        Some(name) => serializer.serialize_some(&name.to_string_lossy()),
        None => serializer.serialize_none(),
    }
}
