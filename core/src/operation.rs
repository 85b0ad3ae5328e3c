//! Transformation operations applied to a project.
//!
//! An operation is opaque to this crate: it only has to render itself as a
//! complete JSON text. The text is sent verbatim, so whatever formatting it
//! carries reaches the server unchanged.

use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::{RefineError, Result};

/// One transformation step.
pub trait Operation {
    /// The operation as JSON text.
    fn to_json(&self) -> String;
}

impl Operation for Value {
    fn to_json(&self) -> String {
        self.to_string()
    }
}

impl<T: Operation + ?Sized> Operation for Box<T> {
    fn to_json(&self) -> String {
        (**self).to_json()
    }
}

/// A pre-rendered JSON operation, kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOperation(String);

impl JsonOperation {
    pub fn new(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    /// Split a JSON array of operations, as exported from a project's undo
    /// history, into one `JsonOperation` per element. Each element keeps its
    /// original text, including key order and whitespace.
    pub fn list_from_json(json: &str) -> Result<Vec<JsonOperation>> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_array() {
            return Err(RefineError::Deserialization(format!(
                "expected an array of operations, got {}",
                json_kind(&value)
            )));
        }
        let items: Vec<Box<RawValue>> = serde_json::from_str(json)?;
        Ok(items
            .into_iter()
            .map(|item| JsonOperation(item.get().to_string()))
            .collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Operation for JsonOperation {
    fn to_json(&self) -> String {
        self.0.clone()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render `operations` as a JSON array by joining their texts with commas.
/// The fragments are not re-encoded.
pub fn operations_json_array<O: Operation>(operations: &[O]) -> String {
    let fragments: Vec<String> = operations.iter().map(Operation::to_json).collect();
    format!("[{}]", fragments.join(","))
}
