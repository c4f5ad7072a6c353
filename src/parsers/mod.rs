// File: src/parsers/mod.rs

pub mod json;
pub mod key;

use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::search;
use crate::status;
pub use key::{parse_key, KeyShape, StructuredKey};

/// One `{key, value}` pair read from the page's localStorage, decoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageItem {
    pub key: String,
    pub value: String,
    pub parsed_value: Option<Value>,
    pub error: Option<String>,
    pub mock_parts: Option<StructuredKey>,
    pub status_code: Option<u16>,
    pub has_status_field: bool,
}

impl StorageItem {
    /// Decodes a raw storage pair. Invalid JSON is recorded, not rejected.
    pub fn from_pair(key: &str, value: &str) -> Self {
        let (parsed_value, error) = match json::parse_payload(value) {
            Ok(v) => (Some(v), None),
            Err(e) => (None, Some(e.to_string())),
        };

        let status_code = parsed_value.as_ref().and_then(status::status_code);
        let has_status_field = parsed_value
            .as_ref()
            .map(status::has_status_field)
            .unwrap_or(false);

        StorageItem {
            key: key.to_string(),
            value: value.to_string(),
            parsed_value,
            error,
            mock_parts: parse_key(key),
            status_code,
            has_status_field,
        }
    }

    pub fn is_valid_json(&self) -> bool {
        self.parsed_value.is_some()
    }

    pub fn is_timeless(&self) -> bool {
        self.mock_parts
            .as_ref()
            .map(StructuredKey::is_timeless)
            .unwrap_or(false)
    }

    /// Status code for display; payloads with the field but no usable number (or 0) show the default.
    pub fn display_status_code(&self) -> Option<u16> {
        if !self.has_status_field {
            return None;
        }
        Some(
            self.status_code
                .filter(|code| *code != 0)
                .unwrap_or(status::DEFAULT_STATUS_CODE),
        )
    }

    /// An empty term matches everything; otherwise the key or raw value must contain it.
    pub fn matches(&self, term: &str) -> bool {
        if term.trim().is_empty() {
            return true;
        }
        !search::find_matches(&self.key, term).is_empty()
            || !search::find_matches(&self.value, term).is_empty()
    }
}

/// Keeps the pairs whose key starts with `prefix`, in storage order.
pub fn scan<'a, I>(pairs: I, prefix: &str) -> Vec<StorageItem>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| StorageItem::from_pair(key, value))
        .collect()
}

/// Splits items into (date-ranged, timeless). Unstructured keys count as date-ranged.
pub fn partition_by_shape(items: Vec<StorageItem>) -> (Vec<StorageItem>, Vec<StorageItem>) {
    items.into_iter().partition(|item| !item.is_timeless())
}

/// Checks a value before it is handed to storage for writing.
pub fn validate_write(key: &str, value: &str) -> Result<()> {
    if let Err(e) = json::parse_payload(value) {
        warn!("rejecting write to '{}': {}", key, e);
        return Err(e);
    }
    Ok(())
}
