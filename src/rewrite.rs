// File: src/rewrite.rs

use chrono::{Datelike, Utc};
use log::{debug, warn};
use serde_json::Value;
use std::borrow::Cow;

use crate::dates::{DateWindow, DisplayDate};
use crate::parsers::key::{parse_key, KEY_DELIMITER};
use crate::remap::remap_timestamp_in;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    StartDate,
    EndDate,
    Timestamp,
}

/// Field-name fragments, checked in order against the lowercased name. First hit wins.
const FIELD_RULES: &[(&str, FieldRule)] = &[
    ("startdate", FieldRule::StartDate),
    ("enddate", FieldRule::EndDate),
    ("timestamp", FieldRule::Timestamp),
];

fn rule_for(field: &str) -> Option<FieldRule> {
    let lower = field.to_lowercase();
    FIELD_RULES
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, rule)| *rule)
}

struct DateRewriter<'w> {
    new_window: &'w DateWindow,
    old_window: Option<&'w DateWindow>,
    year: i32,
}

impl DateRewriter<'_> {
    fn walk(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(name, field)| (name.clone(), self.rewrite_field(name, field)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.walk(item)).collect()),
            primitive => primitive.clone(),
        }
    }

    fn rewrite_field(&self, name: &str, value: &Value) -> Value {
        match rule_for(name) {
            Some(FieldRule::StartDate) => self.replace_date(value, &self.new_window.start_date),
            Some(FieldRule::EndDate) => self.replace_date(value, &self.new_window.end_date),
            Some(FieldRule::Timestamp) => match (value, self.old_window) {
                (Value::String(ts), Some(old)) => Value::String(self.remap(ts, old)),
                // Containers under a timestamp-like name are still searched
                _ => self.walk(value),
            },
            None => self.walk(value),
        }
    }

    /// Strings are remapped when the old window is known; anything else becomes the display date.
    fn replace_date(&self, value: &Value, fallback: &DisplayDate) -> Value {
        match (value, self.old_window) {
            (Value::String(ts), Some(old)) => Value::String(self.remap(ts, old)),
            _ => Value::String(fallback.to_string()),
        }
    }

    fn remap(&self, ts: &str, old: &DateWindow) -> String {
        remap_timestamp_in(ts, old, self.new_window, self.year)
    }
}

/// Rewrites date-like fields of `payload` for `new_window`, resolving windows in `year`.
///
/// Fields are matched by case-insensitive name fragment (`startdate`, `enddate`,
/// `timestamp`), so `lastStartDateSeen` counts as a start date. Timeless payloads
/// are returned borrowed and untouched.
pub fn rewrite_dates_in<'a>(
    payload: &'a Value,
    new_window: &DateWindow,
    old_window: Option<&DateWindow>,
    timeless: bool,
    year: i32,
) -> Cow<'a, Value> {
    if timeless {
        return Cow::Borrowed(payload);
    }

    let rewriter = DateRewriter {
        new_window,
        old_window,
        year,
    };
    Cow::Owned(rewriter.walk(payload))
}

/// [`rewrite_dates_in`] for the current UTC year.
pub fn rewrite_dates<'a>(
    payload: &'a Value,
    new_window: &DateWindow,
    old_window: Option<&DateWindow>,
    timeless: bool,
) -> Cow<'a, Value> {
    rewrite_dates_in(payload, new_window, old_window, timeless, Utc::now().year())
}

/// Re-encodes a date-ranged key for `new_window`, keeping api name, id and any
/// trailing segments. The end segment is the day after `new_window.end_date`.
/// Keys that are not structured, or are timeless, come back unchanged.
pub fn rewrite_key_in(key: &str, new_window: &DateWindow, year: i32) -> String {
    match parse_key(key) {
        Some(parsed) if !parsed.is_timeless() => {}
        _ => return key.to_string(),
    }

    let end_marker = match new_window.end_date.day_after_in(year) {
        Ok(date) => date,
        Err(e) => {
            warn!("cannot compute end marker for '{}': {}", key, e);
            return key.to_string();
        }
    };

    let mut segments: Vec<String> = key.split(KEY_DELIMITER).map(String::from).collect();
    if let Some(start) = segments.get_mut(2) {
        *start = new_window.start_date.to_string();
    }
    if let Some(end) = segments.get_mut(3) {
        *end = end_marker.to_string();
    }

    let rewritten = segments.join(KEY_DELIMITER);
    debug!("rewrote key '{}' -> '{}'", key, rewritten);
    rewritten
}

/// [`rewrite_key_in`] for the current UTC year.
pub fn rewrite_key(key: &str, new_window: &DateWindow) -> String {
    rewrite_key_in(key, new_window, Utc::now().year())
}
