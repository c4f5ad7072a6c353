// File: src/parsers/key.rs

use log::debug;
use serde::Serialize;

use crate::dates::{DateWindow, DisplayDate};
use crate::toggle::PageIds;

/// First segment of every structured mock key.
pub const MOCK_PREFIX: &str = "mock";
pub const KEY_DELIMITER: &str = "_";

/// The optional, shape-dependent part of a structured key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum KeyShape {
    /// `mock_<api>` (anything after the api that is not a date pair is ignored).
    Timeless,
    /// `mock_<api>_<DD/MM>_<DD/MM>[_<id>]`
    DateRanged {
        window: DateWindow,
        id: Option<String>,
    },
}

/// A decoded `mock_<api>[_<DD/MM>_<DD/MM>[_<id>]]` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredKey {
    pub raw_key: String,
    pub api_name: String,
    pub shape: KeyShape,
}

impl StructuredKey {
    pub fn prefix(&self) -> &'static str {
        MOCK_PREFIX
    }

    pub fn is_timeless(&self) -> bool {
        matches!(self.shape, KeyShape::Timeless)
    }

    pub fn window(&self) -> Option<&DateWindow> {
        match &self.shape {
            KeyShape::DateRanged { window, .. } => Some(window),
            KeyShape::Timeless => None,
        }
    }

    /// The id segment, if the key carries one.
    pub fn id(&self) -> Option<&str> {
        match &self.shape {
            KeyShape::DateRanged { id, .. } => id.as_deref(),
            KeyShape::Timeless => None,
        }
    }

    /// The key's own id, else the page's bot id, else its environment id.
    pub fn resolved_id<'a>(&'a self, page: &'a PageIds) -> Option<&'a str> {
        self.id()
            .or(page.bot_id.as_deref())
            .or(page.env_id.as_deref())
    }
}

/// Decodes a structured mock key. Returns `None` for anything outside the grammar.
///
/// The third and fourth segments must both be calendar-valid `DD/MM` dates for
/// the key to be date-ranged; otherwise the tail is ignored and the key is timeless.
pub fn parse_key(key: &str) -> Option<StructuredKey> {
    let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();

    // 1. Prefix and api name are mandatory
    if segments.len() < 2 || segments[0] != MOCK_PREFIX {
        return None;
    }
    let api_name = segments[1].to_string();

    // 2. Date pair decides the shape
    let window = match (segments.get(2), segments.get(3)) {
        (Some(start), Some(end)) => match (start.parse::<DisplayDate>(), end.parse::<DisplayDate>()) {
            (Ok(start), Ok(end)) => Some(DateWindow::new(start, end)),
            _ => None,
        },
        _ => None,
    };

    let shape = match window {
        Some(window) => KeyShape::DateRanged {
            window,
            id: segments.get(4).map(|id| id.to_string()),
        },
        None => {
            if segments.len() > 2 {
                debug!("key '{}' has no date pair, treating as timeless", key);
            }
            KeyShape::Timeless
        }
    };

    Some(StructuredKey {
        raw_key: key.to_string(),
        api_name,
        shape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_date_ranged_key() {
        let key = parse_key("mock_billingSummary_07/08_14/08_4f91ba29").unwrap();
        assert_eq!(key.prefix(), "mock");
        assert_eq!(key.api_name, "billingSummary");
        assert!(!key.is_timeless());
        let window = key.window().unwrap();
        assert_eq!(window.start_date.to_string(), "07/08");
        assert_eq!(window.end_date.to_string(), "14/08");
        assert_eq!(key.id(), Some("4f91ba29"));
        assert_eq!(key.raw_key, "mock_billingSummary_07/08_14/08_4f91ba29");
    }

    #[test]
    fn date_ranged_key_without_id() {
        let key = parse_key("mock_usage_01/09_08/09").unwrap();
        assert!(!key.is_timeless());
        assert_eq!(key.id(), None);
    }

    #[test]
    fn two_segment_key_is_timeless() {
        let key = parse_key("mock_billing").unwrap();
        assert!(key.is_timeless());
        assert_eq!(key.api_name, "billing");
        assert!(key.window().is_none());
    }

    #[test]
    fn non_date_third_segment_is_ignored() {
        let key = parse_key("mock_evaluations_latest").unwrap();
        assert!(key.is_timeless());
        assert_eq!(key.api_name, "evaluations");
        assert_eq!(key.id(), None);
    }

    #[test]
    fn lone_start_date_is_timeless() {
        let key = parse_key("mock_usage_07/08").unwrap();
        assert!(key.is_timeless());
    }

    #[test]
    fn calendar_invalid_dates_make_key_timeless() {
        assert!(parse_key("mock_billing_99/99_12/08_abc").unwrap().is_timeless());
        assert!(parse_key("mock_billing_31/02_12/03_abc").unwrap().is_timeless());
        assert!(!parse_key("mock_billing_29/02_07/03_abc").unwrap().is_timeless());
    }

    #[test]
    fn rejects_foreign_keys() {
        assert!(parse_key("mock").is_none());
        assert!(parse_key("useMockApis").is_none());
        assert!(parse_key("mocks_billing").is_none());
        assert!(parse_key("").is_none());
    }

    #[test]
    fn resolved_id_falls_back_to_page_ids() {
        let page = PageIds {
            env_id: Some("env1".to_string()),
            bot_id: Some("bot9".to_string()),
        };
        let timeless = parse_key("mock_evaluations").unwrap();
        assert_eq!(timeless.resolved_id(&page), Some("bot9"));

        let env_only = PageIds {
            env_id: Some("env1".to_string()),
            bot_id: None,
        };
        assert_eq!(timeless.resolved_id(&env_only), Some("env1"));

        let ranged = parse_key("mock_usage_01/09_08/09_abc").unwrap();
        assert_eq!(ranged.resolved_id(&page), Some("abc"));
    }
}
