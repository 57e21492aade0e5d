//! Client-facing record shape and its mapping to stored rows.

use crate::lenient;
use crate::tags::{decode_tags, encode_tags};
use diarysync_storage::{SortKey, StoredRow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A journal record as exchanged with clients.
///
/// Only a JSON object (or `null`, read as an empty object) decodes into a
/// record. Decoding never rejects a field: absent or wrongly typed values
/// fall back to defaults (see the field docs). The legacy key `uuid` is
/// accepted in place of `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRecord")]
pub struct Record {
    /// Client-generated identifier. `None` when missing or empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Partition the record belongs to, if the client said.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Opaque payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Category label, empty when unset.
    pub category: String,
    /// Ordered tag list, empty when unset or not a list.
    pub tags: Vec<String>,
    /// Display date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// ISO-8601 form of `date`.
    #[serde(rename = "dateISO", skip_serializing_if = "Option::is_none")]
    pub date_iso: Option<String>,
    /// Listing sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<SortKey>,
}

/// Untyped wire form. A map, so arrays are never read as positional fields.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawRecord(Map<String, Value>);

impl From<RawRecord> for Record {
    fn from(RawRecord(mut fields): RawRecord) -> Self {
        let id = lenient::identifier(fields.remove("id"));
        Self {
            id: id.or_else(|| lenient::identifier(fields.remove("uuid"))),
            app_id: lenient::identifier(fields.remove("appId")),
            content: lenient::text(fields.remove("content")),
            category: lenient::text(fields.remove("category")).unwrap_or_default(),
            tags: lenient::tags(fields.remove("tags")),
            date: lenient::text(fields.remove("date")),
            date_iso: lenient::text(fields.remove("dateISO")),
            timestamp: lenient::timestamp(fields.remove("timestamp")),
        }
    }
}

impl Record {
    /// Creates a record with the given id and no other fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the partition.
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the display date.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets the ISO date.
    #[must_use]
    pub fn with_date_iso(mut self, date_iso: impl Into<String>) -> Self {
        self.date_iso = Some(date_iso.into());
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<SortKey>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the identifier if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Builds the stored row for this record in the given partition.
    ///
    /// The record's own `app_id` is ignored. Returns `None` when the record
    /// has no identifier.
    pub fn to_row(&self, app_id: &str) -> Option<StoredRow> {
        let id = self.key()?;
        Some(StoredRow {
            id: id.to_string(),
            app_id: app_id.to_string(),
            content: self.content.clone(),
            category: self.category.clone(),
            tags: encode_tags(&self.tags),
            date: self.date.clone(),
            date_iso: self.date_iso.clone(),
            timestamp: self.timestamp.clone(),
        })
    }

    /// Rebuilds the client-facing record from a stored row.
    pub fn from_row(row: StoredRow) -> Self {
        let tags = decode_tags(Some(&row.tags));
        Self {
            id: Some(row.id),
            app_id: Some(row.app_id),
            content: row.content,
            category: row.category,
            tags,
            date: row.date,
            date_iso: row.date_iso,
            timestamp: row.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn full_record_decodes() {
        let record = decode(json!({
            "id": "1",
            "appId": "daily",
            "content": "hello",
            "category": "work",
            "tags": ["x", "y"],
            "date": "2024/1/1",
            "dateISO": "2024-01-01",
            "timestamp": 1704067200000_i64
        }));

        assert_eq!(record.key(), Some("1"));
        assert_eq!(record.app_id.as_deref(), Some("daily"));
        assert_eq!(record.content.as_deref(), Some("hello"));
        assert_eq!(record.category, "work");
        assert_eq!(record.tags, vec!["x", "y"]);
        assert_eq!(record.date_iso.as_deref(), Some("2024-01-01"));
        assert_eq!(record.timestamp, Some(SortKey::Int(1_704_067_200_000)));
    }

    #[test]
    fn sparse_record_gets_defaults() {
        let record = decode(json!({ "id": "1" }));
        assert_eq!(record.category, "");
        assert!(record.tags.is_empty());
        assert!(record.content.is_none());
        assert!(record.app_id.is_none());
    }

    #[test]
    fn malformed_fields_degrade() {
        let record = decode(json!({
            "id": 42,
            "content": null,
            "category": null,
            "tags": "not-a-list",
            "timestamp": {"when": "now"}
        }));
        assert_eq!(record.key(), Some("42"));
        assert_eq!(record.category, "");
        assert!(record.tags.is_empty());
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn uuid_alias_is_accepted() {
        assert_eq!(decode(json!({ "uuid": "legacy" })).key(), Some("legacy"));
        assert_eq!(
            decode(json!({ "id": "new", "uuid": "legacy" })).key(),
            Some("new")
        );
        assert_eq!(decode(json!({ "id": "", "uuid": "legacy" })).key(), Some("legacy"));
    }

    #[test]
    fn arrays_are_not_records() {
        assert!(serde_json::from_value::<Record>(json!(["a", "b", "work"])).is_err());
        assert!(serde_json::from_value::<Record>(json!([{"id": "1"}])).is_err());
        assert!(serde_json::from_value::<Record>(json!("1")).is_err());
    }

    #[test]
    fn missing_id_has_no_key_and_no_row() {
        let record = decode(json!({ "content": "orphan" }));
        assert!(record.key().is_none());
        assert!(record.to_row("daily").is_none());
    }

    #[test]
    fn to_row_overrides_partition() {
        let row = Record::new("1")
            .with_app_id("other")
            .with_tags(["x", "y"])
            .to_row("daily")
            .unwrap();
        assert_eq!(row.app_id, "daily");
        assert_eq!(row.tags, r#"["x","y"]"#);
    }

    #[test]
    fn from_row_decodes_tags_leniently() {
        let row = StoredRow::new("daily", "1").with_tags("{broken");
        let record = Record::from_row(row);
        assert!(record.tags.is_empty());
        assert_eq!(record.app_id.as_deref(), Some("daily"));
    }

    #[test]
    fn serializes_with_wire_names() {
        let value = serde_json::to_value(
            Record::new("1")
                .with_date_iso("2024-01-01")
                .with_app_id("daily"),
        )
        .unwrap();
        assert_eq!(value["dateISO"], "2024-01-01");
        assert_eq!(value["appId"], "daily");
        assert_eq!(value["tags"], json!([]));
        assert!(value.get("content").is_none());
    }
}
