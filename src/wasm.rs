use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::dates::{compute_window, DateFilterSelection, DateWindow};
use crate::favorites::{self, FavoriteEntry};
use crate::parsers;
use crate::rewrite;

// Every export returns this envelope as a JSON string so the popup can
// branch on `ok` without catching exceptions.
#[derive(Serialize)]
struct WasmResult {
    ok: bool,
    result: Option<Value>,
    error: Option<String>,
}

fn respond<T: Serialize, E: std::fmt::Display>(outcome: Result<T, E>) -> String {
    let envelope = match outcome.map(|v| serde_json::to_value(v)) {
        Ok(Ok(value)) => WasmResult {
            ok: true,
            result: Some(value),
            error: None,
        },
        Ok(Err(e)) => WasmResult {
            ok: false,
            result: None,
            error: Some(format!("Serialization Error: {}", e)),
        },
        Err(e) => WasmResult {
            ok: false,
            result: None,
            error: Some(e.to_string()),
        },
    };
    serde_json::to_string(&envelope).unwrap_or_default()
}

/// Decodes a storage key; `result` is null when the key is not a mock key.
#[wasm_bindgen]
pub fn parse_mock_key(key: &str) -> String {
    respond::<_, String>(Ok(parsers::parse_key(key)))
}

#[wasm_bindgen]
pub fn date_window(selection: &str) -> String {
    respond(selection.parse::<DateFilterSelection>().map(compute_window))
}

#[wasm_bindgen]
pub fn rewrite_mock_key(key: &str, start_date: &str, end_date: &str) -> String {
    respond(DateWindow::parse(start_date, end_date).map(|window| rewrite::rewrite_key(key, &window)))
}

/// Takes a favorite as JSON and returns the key/value pair to write back.
#[wasm_bindgen]
pub fn apply_favorite(favorite_json: &str) -> String {
    let outcome = serde_json::from_str::<FavoriteEntry>(favorite_json)
        .map_err(|e| format!("Invalid favorite: {}", e))
        .and_then(|entry| favorites::apply_favorite(&entry).map_err(|e| e.to_string()));
    respond(outcome)
}
