// src/status.rs

use serde::Serialize;
use serde_json::Value;

use crate::error::{MockError, Result};
use crate::parsers::json::parse_payload;

pub const STATUS_FIELD: &str = "statusCode";
/// Shown when a payload carries a status field without a usable number.
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// Coarse HTTP status family, used for badge styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Info,
}

impl StatusClass {
    pub fn of(code: u16) -> Self {
        match code {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500..=u16::MAX => StatusClass::ServerError,
            _ => StatusClass::Info,
        }
    }
}

pub fn has_status_field(payload: &Value) -> bool {
    payload.get(STATUS_FIELD).is_some()
}

/// Reads `statusCode` from a `{ "data": ..., "statusCode": n }` payload.
pub fn status_code(payload: &Value) -> Option<u16> {
    payload
        .get(STATUS_FIELD)?
        .as_u64()
        .and_then(|n| u16::try_from(n).ok())
}

/// Replaces `statusCode` in the stored value and re-serializes it compactly.
pub fn set_status_code(raw: &str, code: u16) -> Result<String> {
    let mut payload = parse_payload(raw)?;

    // Only payloads that already carry the field are editable
    let slot = payload
        .as_object_mut()
        .and_then(|map| map.get_mut(STATUS_FIELD))
        .ok_or(MockError::MissingStatusField)?;
    *slot = Value::from(code);

    serde_json::to_string(&payload).map_err(MockError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_status_families() {
        assert_eq!(StatusClass::of(204), StatusClass::Success);
        assert_eq!(StatusClass::of(301), StatusClass::Redirect);
        assert_eq!(StatusClass::of(404), StatusClass::ClientError);
        assert_eq!(StatusClass::of(503), StatusClass::ServerError);
        assert_eq!(StatusClass::of(101), StatusClass::Info);
    }

    #[test]
    fn reads_status_code() {
        let payload = json!({"data": [], "statusCode": 500});
        assert!(has_status_field(&payload));
        assert_eq!(status_code(&payload), Some(500));
        assert_eq!(status_code(&json!({"data": []})), None);
        assert_eq!(status_code(&json!({"statusCode": "oops"})), None);
    }

    #[test]
    fn rewrites_only_the_status_field() {
        let out = set_status_code(r#"{"data":{"x":1},"statusCode":200}"#, 404).unwrap();
        assert_eq!(out, r#"{"data":{"x":1},"statusCode":404}"#);
    }

    #[test]
    fn refuses_payloads_without_status() {
        let err = set_status_code(r#"{"data":{}}"#, 404).unwrap_err();
        assert!(matches!(err, MockError::MissingStatusField));
        assert!(matches!(set_status_code("nope", 404), Err(MockError::InvalidJson(_))));
    }
}
