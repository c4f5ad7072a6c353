// File: src/favorites.rs

use chrono::{Datelike, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dates::{compute_window_at, DateFilterSelection, DateWindow};
use crate::error::{MockError, Result};
use crate::parsers::json::{parse_payload, to_pretty};
use crate::parsers::key::parse_key;
use crate::rewrite::{rewrite_dates_in, rewrite_key_in};

/// A saved mock, as persisted in the extension's own storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredFavorite")]
pub struct FavoriteEntry {
    pub display_name: String,
    pub key: String,
    pub value: String,
    /// Epoch milliseconds.
    pub saved_at: i64,
    pub date_filter_option: DateFilterSelection,
    pub is_timeless: bool,
}

impl FavoriteEntry {
    /// Captures a storage item as a favorite; timelessness follows the key's shape.
    pub fn from_item(display_name: &str, key: &str, value: &str, selection: DateFilterSelection) -> Self {
        FavoriteEntry {
            display_name: display_name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            saved_at: Utc::now().timestamp_millis(),
            date_filter_option: selection,
            is_timeless: key_is_timeless(key),
        }
    }
}

/// Favorite as found in storage or an export file. Older exports nest the whole
/// storage item under `value` and may omit `isTimeless`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFavorite {
    display_name: String,
    key: String,
    value: StoredValue,
    #[serde(default)]
    saved_at: i64,
    #[serde(default)]
    date_filter_option: DateFilterSelection,
    is_timeless: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Raw(String),
    Item { value: String },
}

impl From<StoredFavorite> for FavoriteEntry {
    fn from(stored: StoredFavorite) -> Self {
        let value = match stored.value {
            StoredValue::Raw(value) | StoredValue::Item { value } => value,
        };
        let is_timeless = stored
            .is_timeless
            .unwrap_or_else(|| key_is_timeless(&stored.key));

        FavoriteEntry {
            display_name: stored.display_name,
            key: stored.key,
            value,
            saved_at: stored.saved_at,
            date_filter_option: stored.date_filter_option,
            is_timeless,
        }
    }
}

fn key_is_timeless(key: &str) -> bool {
    parse_key(key).map(|k| k.is_timeless()).unwrap_or(false)
}

/// What to write into the page's storage after applying a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedMock {
    pub key: String,
    pub value: String,
    /// The freshly computed window; `None` for timeless favorites.
    pub window: Option<DateWindow>,
    /// The stored key this one supersedes, when the key changed.
    pub replaces: Option<String>,
}

/// Re-applies `entry` as if it were saved on `today`.
///
/// The window comes from the entry's filter, the payload's date fields are moved
/// from the stored key's window into it, and the key is re-encoded to match.
pub fn apply_favorite_at(entry: &FavoriteEntry, today: NaiveDate) -> Result<AppliedMock> {
    // The key's own shape wins over a stale or defaulted flag
    if entry.is_timeless || key_is_timeless(&entry.key) {
        return Ok(AppliedMock {
            key: entry.key.clone(),
            value: entry.value.clone(),
            window: None,
            replaces: None,
        });
    }

    // 1. New window anchored to today
    let window = compute_window_at(entry.date_filter_option, today);

    // 2. Payload: shift from the window encoded in the stored key
    let payload = parse_payload(&entry.value)?;
    let stored_key = parse_key(&entry.key);
    let old_window = stored_key.as_ref().and_then(|k| k.window());
    let rewritten = rewrite_dates_in(&payload, &window, old_window, false, today.year());
    let value = to_pretty(&rewritten)?;

    // 3. Key
    let key = rewrite_key_in(&entry.key, &window, today.year());
    let replaces = (key != entry.key).then(|| entry.key.clone());

    debug!("applied favorite '{}' as '{}' ({})", entry.display_name, key, window);

    Ok(AppliedMock {
        key,
        value,
        window: Some(window),
        replaces,
    })
}

/// Re-applies `entry` for today's UTC date.
pub fn apply_favorite(entry: &FavoriteEntry) -> Result<AppliedMock> {
    apply_favorite_at(entry, Utc::now().date_naive())
}

pub fn export_favorites(favorites: &[FavoriteEntry]) -> Result<String> {
    serde_json::to_string_pretty(favorites).map_err(MockError::Serialize)
}

pub fn import_favorites(raw: &str) -> Result<Vec<FavoriteEntry>> {
    Ok(serde_json::from_str(raw)?)
}

/// Imported entries replace existing ones with the same display name in place;
/// the rest are appended in import order.
pub fn merge_favorites(existing: Vec<FavoriteEntry>, imported: Vec<FavoriteEntry>) -> Vec<FavoriteEntry> {
    let mut merged = existing;
    for entry in imported {
        match merged.iter_mut().find(|e| e.display_name == entry.display_name) {
            Some(slot) => *slot = entry,
            None => merged.push(entry),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(name: &str) -> FavoriteEntry {
        FavoriteEntry::from_item(name, "mock_billing", "{}", DateFilterSelection::NoFilter)
    }

    #[test]
    fn from_item_reads_shape_from_key() {
        assert!(entry("a").is_timeless);
        let dated = FavoriteEntry::from_item("b", "mock_usage_01/09_08/09", "{}", DateFilterSelection::Last7Days);
        assert!(!dated.is_timeless);
    }

    #[test]
    fn timeless_favorite_passes_through() {
        let fav = FavoriteEntry::from_item("evals", "mock_evaluations", "{\"a\":1}", DateFilterSelection::NoFilter);
        let applied = apply_favorite_at(&fav, ymd(2024, 9, 10)).unwrap();
        assert_eq!(applied.key, "mock_evaluations");
        assert_eq!(applied.value, "{\"a\":1}");
        assert!(applied.window.is_none());
        assert!(applied.replaces.is_none());
    }

    #[test]
    fn invalid_payload_is_reported() {
        let fav = FavoriteEntry::from_item("x", "mock_usage_01/09_08/09", "{", DateFilterSelection::Last7Days);
        assert!(matches!(apply_favorite_at(&fav, ymd(2024, 9, 10)), Err(MockError::InvalidJson(_))));
    }

    #[test]
    fn unchanged_key_replaces_nothing() {
        let fav = FavoriteEntry::from_item(
            "same",
            "mock_usage_04/09_11/09",
            r#"{"startDate":"2024-09-04T00:00:00.000Z"}"#,
            DateFilterSelection::Last7Days,
        );
        let applied = apply_favorite_at(&fav, ymd(2024, 9, 10)).unwrap();
        assert_eq!(applied.key, "mock_usage_04/09_11/09");
        assert!(applied.replaces.is_none());
        let value: serde_json::Value = serde_json::from_str(&applied.value).unwrap();
        assert_eq!(value, json!({"startDate": "2024-09-04T00:00:00.000Z"}));
    }

    #[test]
    fn serializes_with_extension_field_names() {
        let mut fav = FavoriteEntry::from_item("n", "mock_usage_01/09_08/09", "{}", DateFilterSelection::Last14Days);
        fav.saved_at = 1725926400000;
        let value = serde_json::to_value(&fav).unwrap();
        assert_eq!(
            value,
            json!({
                "displayName": "n",
                "key": "mock_usage_01/09_08/09",
                "value": "{}",
                "savedAt": 1725926400000i64,
                "dateFilterOption": "Last14Days",
                "isTimeless": false
            })
        );
    }

    #[test]
    fn export_then_import_keeps_entries() {
        let favorites = vec![entry("a"), entry("b")];
        let exported = export_favorites(&favorites).unwrap();
        assert_eq!(import_favorites(&exported).unwrap(), favorites);
    }

    #[test]
    fn import_defaults_missing_filter_fields() {
        let imported = import_favorites(r#"[{"displayName":"x","key":"mock_a_01/09_08/09","value":"{}"}]"#).unwrap();
        assert_eq!(imported[0].date_filter_option, DateFilterSelection::NoFilter);
        assert_eq!(imported[0].saved_at, 0);
        assert!(!imported[0].is_timeless);
        assert!(import_favorites("{}").is_err());
    }

    #[test]
    fn import_without_timeless_flag_uses_key_shape() {
        let imported = import_favorites(
            r#"[{"displayName":"E","key":"mock_evaluations","value":"{\"startDate\":\"2024-08-07T00:00:00.000Z\"}","dateFilterOption":"None"}]"#,
        )
        .unwrap();
        assert!(imported[0].is_timeless);

        let applied = apply_favorite_at(&imported[0], ymd(2024, 9, 10)).unwrap();
        assert_eq!(applied.value, r#"{"startDate":"2024-08-07T00:00:00.000Z"}"#);
        assert!(applied.window.is_none());
    }

    #[test]
    fn timeless_key_is_not_rewritten_even_when_flag_is_false() {
        let mut fav = FavoriteEntry::from_item(
            "E",
            "mock_evaluations",
            r#"{"startDate":"2024-08-07T00:00:00.000Z"}"#,
            DateFilterSelection::Last7Days,
        );
        fav.is_timeless = false;
        let applied = apply_favorite_at(&fav, ymd(2024, 9, 10)).unwrap();
        assert_eq!(applied.key, "mock_evaluations");
        assert_eq!(applied.value, fav.value);
    }

    #[test]
    fn imports_nested_storage_item_exports() {
        let exported = r#"[{
            "displayName": "Usage",
            "key": "mock_usage_01/09_08/09_bot7",
            "value": {
                "key": "mock_usage_01/09_08/09_bot7",
                "value": "{\"data\":[]}",
                "isValidJson": true,
                "mockParts": {"api": "usage", "startDate": "01/09", "endDate": "08/09", "id": "bot7", "isTimeless": false}
            },
            "savedAt": 1725926400000,
            "dateFilterOption": "Last7Days",
            "isTimeless": false
        }]"#;
        let imported = import_favorites(exported).unwrap();
        assert_eq!(imported[0].value, r#"{"data":[]}"#);
        assert_eq!(imported[0].saved_at, 1725926400000);
        assert_eq!(imported[0].date_filter_option, DateFilterSelection::Last7Days);
        assert!(!imported[0].is_timeless);
    }

    #[test]
    fn merge_replaces_by_display_name() {
        let mut updated = entry("b");
        updated.value = "{\"v\":2}".to_string();
        let merged = merge_favorites(vec![entry("a"), entry("b")], vec![updated.clone(), entry("c")]);
        let names: Vec<&str> = merged.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(merged[1], updated);
    }
}
