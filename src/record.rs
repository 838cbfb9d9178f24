use crate::error::{ShadowError, ShadowResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single input column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f32),
    String(String),
}

impl From<f32> for InputValue {
    fn from(value: f32) -> Self {
        InputValue::Number(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::String(value.to_owned())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::String(value)
    }
}

/// One prediction input, keyed by column name.
pub type Record = BTreeMap<String, InputValue>;

/// Reject numbers JSON cannot carry. serde_json writes NaN and infinities as `null`.
pub fn validate_record(record: &Record) -> ShadowResult<()> {
    for (column, value) in record {
        if let InputValue::Number(n) = value {
            if !n.is_finite() {
                return Err(ShadowError::invalid(
                    "input",
                    format!("column {:?} must be finite, got {}", column, n),
                ));
            }
        }
    }
    Ok(())
}
