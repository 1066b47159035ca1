//! Model loading and scoring.

mod forest;
mod handle;
#[cfg(feature = "onnx")]
mod onnx;

pub use forest::{Aggregation, TreeEnsemble};
pub use handle::{ModelHandle, Scorer};
#[cfg(feature = "onnx")]
pub use onnx::OnnxScorer;
