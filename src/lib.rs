//! Pricecast - order price prediction over an opaque regression model
//!
//! This crate turns a handful of categorical order attributes into the
//! fixed-width feature vector a pre-trained regressor expects, checks the
//! vector against the model's declared width, and scores it. Every failure
//! along the way comes back as a typed [`PricecastError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use pricecast::{Field, InputRecord, ModelHandle, PredictionService};
//!
//! fn main() -> pricecast::Result<()> {
//!     let model = ModelHandle::load("Price_model.json")?;
//!     let service = PredictionService::new(Some(model));
//!
//!     let record = InputRecord::new()
//!         .with(Field::Category, 2)
//!         .with(Field::Size, 3)
//!         .with(Field::ShipState, 1);
//!
//!     let result = service.predict(&record)?;
//!     println!("{} ({} of {} features supplied)",
//!         result.value, result.features_received, result.features_used);
//!     Ok(())
//! }
//! ```
//!
//! The `server` feature (on by default) adds an axum HTTP layer and the
//! `pricecastd` daemon; the `onnx` feature adds ONNX model artifacts.

pub mod catalog;
pub mod error;
pub mod features;
pub mod model;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use catalog::{Catalog, catalog};
pub use error::{ApiError, ErrorKind, PricecastError, Result};
pub use features::{FeatureAssembler, FeatureLayout, FeatureVector, WidthPolicy};
pub use model::{ModelHandle, Scorer, TreeEnsemble};
pub use service::{HealthStatus, PredictionService};
pub use version::{BuildInfo, PKG_VERSION, version_string};

// Re-export all types
pub use types::{CatalogPolicy, Field, InputRecord, ModelInfo, PredictionResult, PredictionStatus};
