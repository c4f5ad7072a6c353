// File: src/toggle.rs

use log::debug;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::config::Settings;
use crate::error::{MockError, Result};

/// Identifiers taken from the current tab's path:
/// `/environments/<env_id>[/bots/<bot_id>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIds {
    pub env_id: Option<String>,
    pub bot_id: Option<String>,
}

/// Mock state for one page, plus the value to store under the toggle key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleState {
    pub is_enabled: bool,
    pub env_id: String,
    pub bot_id: Option<String>,
    pub storage_key: String,
    pub stored_value: String,
}

fn url_path_regex() -> &'static Regex {
    static URL_PATH_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_PATH_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/?#]+(?P<path>/[^?#]*)?")
            .expect("Invalid URL regex")
    })
}

/// Pulls environment and bot ids out of an absolute URL. Anything unparseable yields no ids.
pub fn extract_page_ids(url: &str) -> PageIds {
    let caps = match url_path_regex().captures(url.trim()) {
        Some(caps) => caps,
        None => {
            debug!("'{}' is not an absolute URL", url);
            return PageIds::default();
        }
    };
    let path = caps.name("path").map(|m| m.as_str()).unwrap_or("/");
    let parts: Vec<&str> = path.split('/').collect();

    PageIds {
        env_id: segment_after(&parts, "environments"),
        bot_id: segment_after(&parts, "bots"),
    }
}

/// Reads whether mocks are on for the page. `stored` is the comma-separated id list.
pub fn read_toggle_state(settings: &Settings, stored: &str, page: &PageIds) -> Result<ToggleState> {
    let env_id = page.env_id.clone().ok_or(MockError::MissingEnvironment)?;
    let ids = split_ids(stored);

    Ok(ToggleState {
        is_enabled: is_enabled(&ids, &env_id, page.bot_id.as_deref()),
        env_id,
        bot_id: page.bot_id.clone(),
        storage_key: settings.toggle_storage_key.clone(),
        stored_value: ids.join(","),
    })
}

/// Flips mocks for the page: removes both ids when enabled, otherwise adds the missing ones.
pub fn toggle(settings: &Settings, stored: &str, page: &PageIds) -> Result<ToggleState> {
    let env_id = page.env_id.clone().ok_or(MockError::MissingEnvironment)?;
    let bot_id = page.bot_id.as_deref();
    let mut ids = split_ids(stored);

    if is_enabled(&ids, &env_id, bot_id) {
        ids.retain(|id| id != &env_id && Some(id.as_str()) != bot_id);
    } else {
        if !ids.contains(&env_id) {
            ids.push(env_id.clone());
        }
        if let Some(bot) = bot_id {
            if !ids.iter().any(|id| id == bot) {
                ids.push(bot.to_string());
            }
        }
    }

    let enabled = is_enabled(&ids, &env_id, bot_id);
    debug!("mocks for env '{}' now {}", env_id, if enabled { "on" } else { "off" });

    Ok(ToggleState {
        is_enabled: enabled,
        env_id,
        bot_id: page.bot_id.clone(),
        storage_key: settings.toggle_storage_key.clone(),
        stored_value: ids.join(","),
    })
}

// --- Helpers ---

fn segment_after(parts: &[&str], marker: &str) -> Option<String> {
    let idx = parts.iter().position(|part| *part == marker)?;
    parts
        .get(idx + 1)
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
}

fn split_ids(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .filter(|id| !id.trim().is_empty())
        .map(|id| id.to_string())
        .collect()
}

fn is_enabled(ids: &[String], env_id: &str, bot_id: Option<&str>) -> bool {
    let env_enabled = ids.iter().any(|id| id == env_id);
    // No bot on the page means only the environment counts
    let bot_enabled = bot_id.map_or(true, |bot| ids.iter().any(|id| id == bot));
    env_enabled && bot_enabled
}
