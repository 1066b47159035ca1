//! Input record to feature vector expansion.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{PricecastError, Result};
use crate::model::ModelHandle;
use crate::types::{Field, InputRecord, json_type_name};

/// Where the assembler takes its target width from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthPolicy {
    /// Ask the model handle for its declared input width.
    #[default]
    FromModel,
    /// Always produce this many positions, whatever the model declares.
    Fixed(usize),
}

/// Declared layout: target width and the value used for padding.
///
/// Positions `0..7` always hold the seven [`Field`]s in vector order.
/// Positions past that hold `fill_value`. This is a placeholder, not a
/// re-derivation of whatever engineered features the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureLayout {
    width: WidthPolicy,
    fill_value: f64,
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self {
            width: WidthPolicy::FromModel,
            fill_value: 0.0,
        }
    }
}

impl FeatureLayout {
    /// Layout that follows the model's declared width, padded with 0.0.
    pub fn from_model() -> Self {
        Self::default()
    }

    /// Layout pinned to a fixed width.
    pub fn fixed(width: usize) -> Result<Self> {
        if width < Field::COUNT {
            return Err(PricecastError::Configuration(format!(
                "feature width {width} cannot hold the {} input fields",
                Field::COUNT
            )));
        }
        Ok(Self {
            width: WidthPolicy::Fixed(width),
            ..Self::default()
        })
    }

    /// Replace the padding value.
    pub fn with_fill_value(mut self, fill_value: f64) -> Result<Self> {
        if !fill_value.is_finite() {
            return Err(PricecastError::Configuration(
                "feature fill value must be finite".to_string(),
            ));
        }
        self.fill_value = fill_value;
        Ok(self)
    }

    pub fn width_policy(&self) -> WidthPolicy {
        self.width
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }
}

/// A numeric vector ready to be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for FeatureVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Expands [`InputRecord`]s into [`FeatureVector`]s.
///
/// The assembler only decides how wide the vector is; it never compares
/// the result against the model. That check belongs to the prediction
/// service.
#[derive(Debug, Clone, Default)]
pub struct FeatureAssembler {
    layout: FeatureLayout,
}

impl FeatureAssembler {
    pub fn new(layout: FeatureLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Width this assembler will produce for the given model.
    ///
    /// Never less than the number of input fields: a model narrower than
    /// that gets a vector it will refuse, rather than a truncated one.
    pub fn target_width(&self, model: &ModelHandle) -> usize {
        let width = match self.layout.width {
            WidthPolicy::FromModel => model.expected_width(),
            WidthPolicy::Fixed(width) => width,
        };
        width.max(Field::COUNT)
    }

    /// Assemble a vector sized for `model`.
    pub fn assemble(&self, record: &InputRecord, model: &ModelHandle) -> Result<FeatureVector> {
        self.assemble_to_width(record, self.target_width(model))
    }

    /// Assemble a vector of an explicit width (at least the field count).
    pub fn assemble_to_width(&self, record: &InputRecord, width: usize) -> Result<FeatureVector> {
        let width = width.max(Field::COUNT);
        let mut values = vec![self.layout.fill_value; width];
        for field in Field::ALL {
            values[field.position()] = match record.get(field) {
                Some(value) => coerce(field, value)?,
                None => field.default_value(),
            };
        }
        debug!(width, raw = ?&values[..Field::COUNT], "features assembled");
        Ok(FeatureVector(values))
    }
}

/// Turn a raw JSON value into a finite number, or say why not.
pub(crate) fn coerce(field: Field, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(PricecastError::FeaturePreparation {
            field: field.name().to_string(),
            reason: match value {
                Value::String(s) => format!("expected a number, got string {s:?}"),
                other => format!("expected a number, got {}", json_type_name(other)),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> InputRecord {
        InputRecord::from_value(json!({
            "fulfilment": 0, "sales_channel": 1, "category": 2, "size": 3,
            "ship_state": 4, "b2b": 0, "qty": 5,
        }))
        .unwrap()
    }

    #[test]
    fn seven_wide_is_exact_field_order() {
        let vector = FeatureAssembler::default()
            .assemble_to_width(&full_record(), 7)
            .unwrap();
        assert_eq!(vector.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 5.0]);
    }

    #[test]
    fn wide_vectors_are_zero_padded() {
        let vector = FeatureAssembler::default()
            .assemble_to_width(&full_record(), 105)
            .unwrap();
        assert_eq!(vector.len(), 105);
        assert_eq!(&vector[..7], &[0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 5.0]);
        assert!(vector[7..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn custom_fill_value_pads_tail_only() {
        let layout = FeatureLayout::from_model().with_fill_value(-1.0).unwrap();
        let vector = FeatureAssembler::new(layout)
            .assemble_to_width(&InputRecord::new(), 10)
            .unwrap();
        assert_eq!(&vector[..7], &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&vector[7..], &[-1.0, -1.0, -1.0]);
    }

    #[test]
    fn narrow_width_is_never_truncated() {
        let vector = FeatureAssembler::default()
            .assemble_to_width(&full_record(), 3)
            .unwrap();
        assert_eq!(vector.len(), 7);
    }

    #[test]
    fn coerces_booleans_and_numeric_strings() {
        let record = InputRecord::new()
            .with(Field::B2b, true)
            .with(Field::Size, " 4 ")
            .with(Field::Qty, "2.5");
        let vector = FeatureAssembler::default()
            .assemble_to_width(&record, 7)
            .unwrap();
        assert_eq!(vector[Field::B2b.position()], 1.0);
        assert_eq!(vector[Field::Size.position()], 4.0);
        assert_eq!(vector[Field::Qty.position()], 2.5);
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        for text in ["NaN", "inf", "-infinity", ""] {
            let record = InputRecord::new().with(Field::Size, text);
            let err = FeatureAssembler::default()
                .assemble_to_width(&record, 7)
                .unwrap_err();
            assert!(
                matches!(&err, PricecastError::FeaturePreparation { field, .. } if field == "size"),
                "{text:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn structured_values_are_rejected() {
        let record = InputRecord::new().with(Field::ShipState, json!([1, 2]));
        let err = FeatureAssembler::default()
            .assemble_to_width(&record, 7)
            .unwrap_err();
        assert!(err.to_string().contains("ship_state"));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn fixed_layout_must_fit_fields() {
        assert!(FeatureLayout::fixed(6).is_err());
        assert_eq!(
            FeatureLayout::fixed(105).unwrap().width_policy(),
            WidthPolicy::Fixed(105)
        );
        assert!(FeatureLayout::from_model().with_fill_value(f64::NAN).is_err());
    }
}
