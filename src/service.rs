//! The prediction pipeline.
//!
//! A request moves through fixed stages, each of which can end it with a
//! typed error:
//!
//! 1. receive: the body must parse as a JSON object
//! 2. model check: degraded mode fails fast with `ModelUnavailable`
//! 3. catalog check: optional, per [`CatalogPolicy`]
//! 4. feature assembly
//! 5. width check against the model, always before scoring
//! 6. scoring, with scorer failures and panics wrapped as `PredictionFailed`
//! 7. response, only for finite values
//!
//! Nothing is retried: scoring is local and deterministic.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::catalog::catalog;
use crate::error::{PricecastError, Result};
use crate::features::FeatureAssembler;
use crate::model::ModelHandle;
use crate::telemetry;
use crate::types::{CatalogPolicy, InputRecord, ModelInfo, PredictionResult};

/// Service health snapshot. Always available, even in degraded mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    /// Declared model width, `None` in degraded mode.
    pub model_features: Option<usize>,
    pub message: String,
    pub version: String,
}

/// Orchestrates feature preparation and scoring for one process.
///
/// Holds the process's single model handle (or none, in degraded mode).
/// The service carries no per-request state and is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: Option<ModelHandle>,
    assembler: FeatureAssembler,
    catalog_policy: CatalogPolicy,
}

impl PredictionService {
    /// Create a service around an optional model handle.
    pub fn new(model: Option<ModelHandle>) -> Self {
        metrics::gauge!(telemetry::MODEL_LOADED).set(if model.is_some() { 1.0 } else { 0.0 });
        Self {
            model,
            assembler: FeatureAssembler::default(),
            catalog_policy: CatalogPolicy::default(),
        }
    }

    /// Replace the feature assembler.
    pub fn with_assembler(mut self, assembler: FeatureAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Set how out-of-catalog codes are handled.
    pub fn with_catalog_policy(mut self, policy: CatalogPolicy) -> Self {
        self.catalog_policy = policy;
        self
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn catalog_policy(&self) -> CatalogPolicy {
        self.catalog_policy
    }

    /// Current health. Never fails.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            model_loaded: self.is_model_loaded(),
            model_features: self.model.as_ref().map(ModelHandle::expected_width),
            message: if self.is_model_loaded() {
                "Price prediction API is running".to_string()
            } else {
                "Price prediction API is running without a model".to_string()
            },
            version: crate::version_string(),
        }
    }

    /// Metadata of the loaded model.
    pub fn model_info(&self) -> Result<ModelInfo> {
        self.model
            .as_ref()
            .map(|model| model.info().clone())
            .ok_or(PricecastError::ModelUnavailable)
    }

    /// Run the full pipeline on a raw request body.
    pub fn predict_value(&self, body: Value) -> Result<PredictionResult> {
        let start = Instant::now();
        let result = InputRecord::from_value(body).and_then(|record| self.run(&record));
        Self::record_outcome(start, &result);
        result
    }

    /// Run the full pipeline on raw body bytes, as read off the wire.
    ///
    /// Text that is not JSON at all fails as [`PricecastError::Json`].
    pub fn predict_slice(&self, body: &[u8]) -> Result<PredictionResult> {
        let start = Instant::now();
        let result = Self::parse_body(body).and_then(|record| self.run(&record));
        Self::record_outcome(start, &result);
        result
    }

    /// Run the pipeline on an already parsed record.
    pub fn predict(&self, record: &InputRecord) -> Result<PredictionResult> {
        let start = Instant::now();
        let result = self.run(record);
        Self::record_outcome(start, &result);
        result
    }

    fn parse_body(body: &[u8]) -> Result<InputRecord> {
        let value: Value = serde_json::from_slice(body)?;
        InputRecord::from_value(value)
    }

    #[instrument(skip_all, fields(fields = record.len()))]
    fn run(&self, record: &InputRecord) -> Result<PredictionResult> {
        let model = self.model.as_ref().ok_or(PricecastError::ModelUnavailable)?;

        self.check_catalog(record)?;

        let features = self.assembler.assemble(record, model)?;

        let expected = model.expected_width();
        if features.len() != expected {
            return Err(PricecastError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }

        let value = match panic::catch_unwind(AssertUnwindSafe(|| model.score(&features))) {
            Ok(Ok(value)) => value,
            Ok(Err(PricecastError::PredictionFailed(msg))) => {
                return Err(PricecastError::PredictionFailed(msg));
            }
            Ok(Err(err)) => return Err(PricecastError::PredictionFailed(err.to_string())),
            Err(_) => {
                error!("scorer panicked");
                return Err(PricecastError::PredictionFailed(
                    "scorer aborted unexpectedly".to_string(),
                ));
            }
        };

        if !value.is_finite() {
            return Err(PricecastError::PredictionFailed(format!(
                "model returned a non-finite value ({value})"
            )));
        }

        Ok(PredictionResult::new(
            value,
            features.len(),
            self.assembler.layout().fill_value(),
        ))
    }

    fn check_catalog(&self, record: &InputRecord) -> Result<()> {
        if self.catalog_policy == CatalogPolicy::Ignore {
            return Ok(());
        }
        let violations = catalog().violations(record);
        let Some(first) = violations.first() else {
            return Ok(());
        };
        match self.catalog_policy {
            CatalogPolicy::Reject => Err(PricecastError::BadRequest(first.to_string())),
            _ => {
                for violation in &violations {
                    warn!(field = %violation.field, value = violation.value, "value not in catalog");
                }
                Ok(())
            }
        }
    }

    fn record_outcome(start: Instant, result: &Result<PredictionResult>) {
        let (status, kind) = match result {
            Ok(_) => ("ok", "none"),
            Err(err) => ("error", err.kind().as_str()),
        };
        metrics::counter!(telemetry::PREDICTIONS_TOTAL,
            "status" => status,
            "kind" => kind,
        )
        .increment(1);
        metrics::histogram!(telemetry::PREDICTION_DURATION_SECONDS, "status" => status)
            .record(start.elapsed().as_secs_f64());
        if let Err(err) = result {
            // Degraded mode is reported once, at startup.
            if matches!(err, PricecastError::ModelUnavailable) {
                debug!("prediction refused: no model loaded");
            } else if err.is_client_error() {
                warn!(error = %err, "prediction rejected");
            } else {
                error!(error = %err, "prediction failed");
            }
        }
    }
}
