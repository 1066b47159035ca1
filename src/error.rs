//! Pricecast error types

use serde::{Deserialize, Serialize};

/// Pricecast error types
#[derive(Debug, thiserror::Error)]
pub enum PricecastError {
    // Request errors
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A field value could not be turned into a number.
    ///
    /// Reported to callers as a bad request naming the field.
    #[error("invalid value for field '{field}': {reason}")]
    FeaturePreparation { field: String, reason: String },

    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Model errors
    #[error("model not loaded")]
    ModelUnavailable,

    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PricecastError {
    /// Whether the caller is at fault (maps to a 4xx status).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_)
                | Self::FeaturePreparation { .. }
                | Self::DimensionMismatch { .. }
                | Self::Json(_)
        )
    }

    /// Stable machine-readable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) | Self::Json(_) => ErrorKind::BadRequest,
            Self::FeaturePreparation { .. } => ErrorKind::FeaturePreparation,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::ModelUnavailable => ErrorKind::ModelUnavailable,
            Self::PredictionFailed(_) => ErrorKind::PredictionFailed,
            Self::ModelLoad(_) | Self::Configuration(_) => ErrorKind::Internal,
        }
    }
}

/// Error categories exposed at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ModelUnavailable,
    BadRequest,
    /// Subtype of [`ErrorKind::BadRequest`] raised during feature assembly.
    FeaturePreparation,
    DimensionMismatch,
    PredictionFailed,
    NotFound,
    Internal,
}

impl ErrorKind {
    /// Wire name, as used in response bodies and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelUnavailable => "model_unavailable",
            Self::BadRequest => "bad_request",
            Self::FeaturePreparation => "feature_preparation",
            Self::DimensionMismatch => "dimension_mismatch",
            Self::PredictionFailed => "prediction_failed",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }

    /// Whether this kind is a (sub)kind of bad request.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest | Self::FeaturePreparation)
    }
}

/// Structured error leaving the core: a kind plus a caller-safe message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn not_found() -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: "not found".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: "internal server error".to_string(),
        }
    }
}

impl From<&PricecastError> for ApiError {
    fn from(err: &PricecastError) -> Self {
        match err.kind() {
            // Startup-side failures never echo their detail to callers.
            ErrorKind::Internal => Self::internal(),
            kind => Self {
                kind,
                message: err.to_string(),
            },
        }
    }
}

impl From<PricecastError> for ApiError {
    fn from(err: PricecastError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for Pricecast operations
pub type Result<T> = std::result::Result<T, PricecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_names_both_widths() {
        let err = PricecastError::DimensionMismatch {
            expected: 7,
            actual: 105,
        };
        assert!(err.to_string().contains("expected 7, got 105"));
    }

    #[test]
    fn internal_errors_are_not_echoed() {
        let err = PricecastError::ModelLoad("/secret/path/model.json: denied".into());
        let api = ApiError::from(&err);
        assert_eq!(api.kind, ErrorKind::Internal);
        assert!(!api.message.contains("secret"));
    }

    #[test]
    fn kind_wire_names_match_serde() {
        for kind in [
            ErrorKind::ModelUnavailable,
            ErrorKind::BadRequest,
            ErrorKind::FeaturePreparation,
            ErrorKind::DimensionMismatch,
            ErrorKind::PredictionFailed,
            ErrorKind::NotFound,
            ErrorKind::Internal,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
