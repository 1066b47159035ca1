//! Loosely typed request records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Field;
use crate::{PricecastError, Result};

/// A prediction request as received: field name to raw JSON value.
///
/// Keys other than the seven [`Field`]s are kept but never read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    values: Map<String, Value>,
}

impl InputRecord {
    /// Create an empty record (every field takes its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a request body, which must be a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Err(PricecastError::BadRequest(
                "request body is required".to_string(),
            )),
            other => Err(PricecastError::BadRequest(format!(
                "request body must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Set a field value.
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.values.insert(field.name().to_string(), value.into());
        self
    }

    /// Set an arbitrary key (including ones that are not fields).
    pub fn with_raw(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw value supplied for a field. `null` counts as absent.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(field.name()).filter(|v| !v.is_null())
    }

    /// Number of keys in the record, recognized or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
