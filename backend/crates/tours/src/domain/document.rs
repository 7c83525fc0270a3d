//! Stored document helpers
//!
//! Every document carries `id` (UUID v4), `__v` (revision, 0 on create)
//! and `createdAt`. Clients can set none of them.

use chrono::{DateTime, SecondsFormat, Utc};
use query::Document;
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::error::{TourError, TourResult};

pub const ID: &str = "id";
pub const VERSION: &str = "__v";
pub const CREATED_AT: &str = "createdAt";

const SYSTEM_FIELDS: [&str; 3] = [ID, VERSION, CREATED_AT];

/// Request body as a document
pub fn from_body(body: Value) -> TourResult<Document> {
    match body {
        Value::Object(doc) => Ok(doc),
        _ => Err(TourError::Validation(vec![
            "Request body must be a JSON object".to_string(),
        ])),
    }
}

/// New document with fresh system fields
pub fn stamp_new(mut doc: Document, now: DateTime<Utc>) -> (Uuid, Document) {
    for field in SYSTEM_FIELDS {
        doc.remove(field);
    }
    let id = Uuid::new_v4();
    doc.insert(ID.into(), Value::String(id.to_string()));
    doc.insert(VERSION.into(), Value::from(0));
    doc.insert(CREATED_AT.into(), timestamp(now));
    (id, doc)
}

/// `existing` with the client fields of `patch` set on top and `__v` bumped
pub fn apply_patch(existing: &Document, patch: Document) -> Document {
    let mut merged = existing.clone();
    for (field, value) in patch {
        if !SYSTEM_FIELDS.contains(&field.as_str()) {
            merged.insert(field, value);
        }
    }
    let version = existing.get(VERSION).and_then(Value::as_u64).unwrap_or(0);
    merged.insert(VERSION.into(), Value::from(version + 1));
    merged
}

/// RFC 3339, UTC, millisecond precision
pub fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn id_of(doc: &Document) -> Option<Uuid> {
    uuid_field(doc, ID)
}

pub fn uuid_field(doc: &Document, field: &str) -> Option<Uuid> {
    doc.get(field)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

/// Non-blank string value
pub fn text<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

pub fn number(doc: &Document, field: &str) -> Option<f64> {
    doc.get(field).and_then(Value::as_f64)
}

/// Present and not `null`
pub fn is_set(doc: &Document, field: &str) -> bool {
    doc.get(field).is_some_and(|v| !v.is_null())
}

pub fn trim_field(doc: &mut Document, field: &str) {
    if let Some(Value::String(s)) = doc.get_mut(field) {
        let trimmed = s.trim();
        if trimmed.len() != s.len() {
            *s = trimmed.to_string();
        }
    }
}

/// Numeric strings become JSON numbers; anything else is left for validation
pub fn coerce_number(doc: &mut Document, field: &str) {
    let Some(Value::String(s)) = doc.get(field) else {
        return;
    };
    let parsed = s.trim().parse::<f64>().ok().and_then(|n| {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Some(Number::from(n as i64))
        } else {
            Number::from_f64(n)
        }
    });
    if let Some(n) = parsed {
        doc.insert(field.into(), Value::Number(n));
    }
}

/// `"true"` / `"false"` become booleans
pub fn coerce_bool(doc: &mut Document, field: &str) {
    let parsed = match doc.get(field).and_then(Value::as_str) {
        Some("true") => true,
        Some("false") => false,
        _ => return,
    };
    doc.insert(field.into(), Value::Bool(parsed));
}

pub fn set_default(doc: &mut Document, field: &str, value: Value) {
    if !is_set(doc, field) {
        doc.insert(field.into(), value);
    }
}

/// Number rounded to one decimal, as stored for rating averages
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Present fields that are not numbers, as validation messages
pub fn check_numbers(doc: &Document, fields: &[&str], errors: &mut Vec<String>) {
    for field in fields {
        if is_set(doc, field) && number(doc, field).is_none() {
            errors.push(format!("{field} must be a number"));
        }
    }
}

/// Combined values of `keys`, or `None` if any is missing
pub fn key_value(doc: &Document, keys: &[&str]) -> Option<String> {
    let values = keys
        .iter()
        .map(|key| match doc.get(*key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_stamp_new_overrides_client_system_fields() {
        let now = Utc::now();
        let (id, stamped) = stamp_new(doc(json!({"id": "mine", "__v": 7, "name": "x"})), now);
        assert_eq!(id_of(&stamped), Some(id));
        assert_eq!(stamped[VERSION], json!(0));
        assert_eq!(stamped[CREATED_AT], timestamp(now));
        assert_eq!(stamped["name"], json!("x"));
    }

    #[test]
    fn test_apply_patch_bumps_version() {
        let existing = doc(json!({"id": "a", "__v": 2, "price": 10, "name": "x"}));
        let merged = apply_patch(&existing, doc(json!({"price": 20, "id": "b", "__v": 0})));
        assert_eq!(merged["price"], json!(20));
        assert_eq!(merged["id"], json!("a"));
        assert_eq!(merged[VERSION], json!(3));
        assert_eq!(merged["name"], json!("x"));
    }

    #[test]
    fn test_timestamp_format() {
        let at = DateTime::parse_from_rfc3339("2021-03-21T09:00:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp(at), json!("2021-03-21T09:00:00.123Z"));
    }

    #[test]
    fn test_coercions() {
        let mut d = doc(json!({"a": "5", "b": "4.5", "c": "abc", "d": "true", "e": 3}));
        coerce_number(&mut d, "a");
        coerce_number(&mut d, "b");
        coerce_number(&mut d, "c");
        coerce_number(&mut d, "e");
        coerce_bool(&mut d, "d");
        assert_eq!(d["a"], json!(5));
        assert_eq!(d["b"], json!(4.5));
        assert_eq!(d["c"], json!("abc"));
        assert_eq!(d["d"], json!(true));
        assert_eq!(d["e"], json!(3));

        let mut errors = Vec::new();
        check_numbers(&d, &["a", "c", "missing"], &mut errors);
        assert_eq!(errors, vec!["c must be a number".to_string()]);
    }

    #[test]
    fn test_key_value() {
        let d = doc(json!({"tour": "t", "user": "u", "n": 1}));
        assert_eq!(key_value(&d, &["tour", "user"]).as_deref(), Some("t, u"));
        assert_eq!(key_value(&d, &["n"]).as_deref(), Some("1"));
        assert_eq!(key_value(&d, &["tour", "missing"]), None);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(4.666_666), 4.7);
        assert_eq!(round_one_decimal(4.0), 4.0);
    }
}
