//! Tag list codec for the storage boundary.
//!
//! The store keeps a record's tags as JSON array text. Decoding never fails:
//! an absent column or text that is not a JSON array yields no tags.

use crate::lenient;

/// Encodes a tag list into its stored form.
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a stored tag column, preserving order.
pub fn decode_tags(stored: Option<&str>) -> Vec<String> {
    stored
        .and_then(|s| serde_json::from_str(s).ok())
        .map(|value| lenient::tags(Some(value)))
        .unwrap_or_default()
}
