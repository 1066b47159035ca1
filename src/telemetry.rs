//! Telemetry metric name constants.
//!
//! Centralised metric names for pricecast operations. The daemon does not
//! install an exporter; embedders install their own `metrics` recorder
//! (e.g. prometheus, statsd). Without a recorder, all metric calls are
//! no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `pricecast_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: outcome, "ok" or "error"
//! - `kind`: error kind wire name (e.g. "dimension_mismatch"), or "none"

/// Total prediction requests handled by the service.
///
/// Labels: `status` ("ok" | "error"), `kind`.
pub const PREDICTIONS_TOTAL: &str = "pricecast_predictions_total";

/// Prediction duration in seconds, from receipt to response.
///
/// Labels: `status`.
pub const PREDICTION_DURATION_SECONDS: &str = "pricecast_prediction_duration_seconds";

/// 1 when a model handle is loaded, 0 in degraded mode.
pub const MODEL_LOADED: &str = "pricecast_model_loaded";
