//! Lenient conversions from loosely typed JSON values.
//!
//! Clients are not trusted to send well-typed fields. None of these
//! conversions fail; they fall back to an absent or empty value.

use diarysync_storage::SortKey;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text of a value. Null yields `None`, scalars their display form, and
/// arrays or objects their JSON text.
pub(crate) fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Like [`text`], but an empty string counts as absent.
pub(crate) fn identifier(value: Option<Value>) -> Option<String> {
    text(value).filter(|s| !s.is_empty())
}

/// Field deserializer applying [`identifier`] to any JSON value.
pub(crate) fn deserialize_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(identifier(Option::<Value>::deserialize(deserializer)?))
}

/// Tag list of a value. Anything but an array yields no tags.
pub(crate) fn tags(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Sort key of a value. Only numbers and strings qualify.
pub(crate) fn timestamp(value: Option<Value>) -> Option<SortKey> {
    match value? {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(SortKey::Int(i)),
            None => n.as_f64().map(SortKey::Float),
        },
        Value::String(s) => Some(SortKey::Text(s)),
        _ => None,
    }
}
