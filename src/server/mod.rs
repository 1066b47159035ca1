//! HTTP service mode.
//!
//! This module provides:
//! - The axum router and serve loop (`routes`)
//! - Mapping of core errors to HTTP responses (`convert`)
//! - Daemon configuration (`config`)
//!
//! Every decision about a request is made by
//! [`PredictionService`](crate::PredictionService).

pub mod config;
pub mod convert;
pub mod routes;

pub use convert::ErrorBody;
pub use routes::{router, serve};
