//! Prediction response types.

use serde::{Deserialize, Serialize};

use super::Field;

/// Outcome marker carried by successful responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    #[default]
    Success,
}

/// A successful price prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted price.
    #[serde(rename = "prediction")]
    pub value: f64,
    pub status: PredictionStatus,
    /// Positions that carry caller-supplied signal (always the leading ones).
    pub features_received: usize,
    /// Width of the vector the model actually scored.
    pub features_used: usize,
    pub message: String,
}

impl PredictionResult {
    /// `fill_value` is what the padded positions held, reported in `message`.
    pub(crate) fn new(value: f64, features_used: usize, fill_value: f64) -> Self {
        let message = if features_used > Field::COUNT {
            format!(
                "Converted {} input features to {features_used} model features; positions {}..{features_used} are placeholders set to {fill_value}",
                Field::COUNT,
                Field::COUNT
            )
        } else {
            format!("Scored {features_used} input features")
        };
        Self {
            value,
            status: PredictionStatus::Success,
            features_received: Field::COUNT,
            features_used,
            message,
        }
    }

    /// Whether the model saw positions that were padded rather than supplied.
    pub fn is_padded(&self) -> bool {
        self.features_used > self.features_received
    }
}
