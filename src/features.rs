//! Request payload validation.
//!
//! Turns an untrusted JSON object into the fixed-order feature vector the
//! classifier was trained on. Nothing reaches the model unless every field
//! is present and numeric.

use serde_json::{Map, Value};

use crate::error::{CropError, Result};

/// Feature names in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

pub const FEATURE_COUNT: usize = 7;

/// One sample of soil and weather readings, in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Parse a raw request body.
    ///
    /// Anything that is not a JSON object is a malformed request; an object
    /// with missing or non-numeric fields is a validation failure.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|_| invalid_body())?;
        match value {
            Value::Object(map) => Self::from_map(&map),
            _ => Err(invalid_body()),
        }
    }

    /// Validate a JSON object and assemble the vector.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let missing: Vec<&str> = FEATURE_NAMES
            .iter()
            .copied()
            .filter(|name| !map.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(CropError::Validation(format!(
                "Missing fields: {}",
                missing.join(", ")
            )));
        }

        let mut values = [0.0_f64; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = &map[name];
            *slot = coerce_f64(raw).ok_or_else(|| {
                CropError::Validation(format!(
                    "Invalid number in input: field '{name}' has non-numeric value {raw}"
                ))
            })?;
        }

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

fn invalid_body() -> CropError {
    CropError::MalformedRequest("Invalid or missing JSON body".to_string())
}

/// Numbers pass through, numeric strings are parsed, booleans become 1/0.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
