// src/parsers/json.rs

use serde_json::Value;

use crate::error::{MockError, Result};

/// Parses a stored value as a JSON payload.
pub fn parse_payload(raw: &str) -> Result<Value> {
    Ok(serde_json::from_str(raw)?)
}

/// Serializes a payload with two-space indentation, the layout the popup writes back.
pub fn to_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(MockError::Serialize)
}

/// Re-indents `raw` if it is JSON, otherwise returns it untouched.
pub fn format_json(raw: &str) -> String {
    match parse_payload(raw).and_then(|v| to_pretty(&v)) {
        Ok(pretty) => pretty,
        Err(_) => raw.to_string(),
    }
}
