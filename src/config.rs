// src/config.rs

use serde::Deserialize;

use crate::error::Result;

/// Popup settings. Every field has a default, so the host may send a partial object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Only storage keys starting with this are listed.
    pub storage_prefix: String,
    /// localStorage key holding the comma-separated ids with mocks enabled.
    pub toggle_storage_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            storage_prefix: "mock_".to_string(),
            toggle_storage_key: "useMockApis".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_json::from_str(raw)?)
    }
}
