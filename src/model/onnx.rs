//! ONNX graph scoring via ONNX Runtime.
//!
//! Expects a regressor exported with a single float input of shape
//! `[batch, W]` (e.g. skl2onnx's `float_input`) and a single output.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use super::Scorer;
use crate::error::{PricecastError, Result};
use crate::types::ModelInfo;

/// ONNX-backed scorer.
///
/// A session run needs exclusive access, so runs are serialized through a
/// mutex.
pub struct OnnxScorer {
    session: Mutex<Session>,
    input_name: String,
    info: ModelInfo,
}

impl OnnxScorer {
    /// Build a session from a model file and introspect its input width.
    pub fn load(path: &Path) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| load_error("failed to create session builder", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error("failed to set optimization level", e))?
            .commit_from_file(path)
            .map_err(|e| load_error("failed to load ONNX model", e))?;

        let input = session.inputs().first().ok_or_else(|| {
            PricecastError::ModelLoad("ONNX model declares no inputs".to_string())
        })?;
        let width = input
            .dtype()
            .tensor_shape()
            .and_then(|shape| shape.last().copied())
            .and_then(|dim| usize::try_from(dim).ok())
            .filter(|&dim| dim > 0)
            .ok_or_else(|| {
                PricecastError::ModelLoad(format!(
                    "ONNX input '{}' has no static feature dimension",
                    input.name()
                ))
            })?;
        let input_name = input.name().to_string();

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            info: ModelInfo::new("onnx", width).with_source(path),
        })
    }
}

/// Take the lock even if an earlier run panicked while holding it.
/// Runs share no state, so the session stays usable.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn load_error(context: &str, err: impl std::fmt::Display) -> PricecastError {
    PricecastError::ModelLoad(format!("{context}: {err}"))
}

impl Scorer for OnnxScorer {
    fn info(&self) -> ModelInfo {
        self.info.clone()
    }

    fn score(&self, features: &[f64]) -> Result<f64> {
        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let tensor = TensorRef::from_array_view(([1_usize, input.len()], input.as_slice()))
            .map_err(|e| PricecastError::PredictionFailed(format!("invalid input tensor: {e}")))?;

        let mut session = lock_recovering(&self.session);
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| PricecastError::PredictionFailed(format!("ONNX inference failed: {e}")))?;

        let (_, values) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PricecastError::PredictionFailed(format!("unexpected model output: {e}")))?;
        values
            .first()
            .map(|&v| f64::from(v))
            .ok_or_else(|| PricecastError::PredictionFailed("model returned no output".to_string()))
    }
}
