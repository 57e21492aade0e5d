//! Stored row representation and listing order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key of a stored row.
///
/// Clients send either a number (epoch millis in practice) or a string, and
/// the store keeps whichever it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortKey {
    /// Integral timestamp.
    Int(i64),
    /// Fractional timestamp.
    Float(f64),
    /// Textual timestamp.
    Text(String),
}

impl SortKey {
    /// Rank of the value class. Text sorts above every number.
    fn class(&self) -> u8 {
        match self {
            SortKey::Int(_) | SortKey::Float(_) => 0,
            SortKey::Text(_) => 1,
        }
    }

    /// Compares two keys in ascending order.
    ///
    /// Integers and floats compare numerically with each other.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Int(_) | SortKey::Float(_), SortKey::Int(_) | SortKey::Float(_)) => {
                self.as_f64().total_cmp(&other.as_f64())
            }
            _ => self.class().cmp(&other.class()),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            SortKey::Int(v) => *v as f64,
            SortKey::Float(v) => *v,
            SortKey::Text(_) => f64::NAN,
        }
    }
}

impl From<i64> for SortKey {
    fn from(value: i64) -> Self {
        SortKey::Int(value)
    }
}

impl From<f64> for SortKey {
    fn from(value: f64) -> Self {
        SortKey::Float(value)
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        SortKey::Text(value.to_string())
    }
}

/// A record as held by the store.
///
/// `(app_id, id)` is the storage key. `tags` holds the serialized tag list
/// and is never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    /// Record identifier, unique within the partition.
    pub id: String,
    /// Partition key.
    pub app_id: String,
    /// Opaque payload.
    pub content: Option<String>,
    /// Category label, empty when unset.
    pub category: String,
    /// Serialized tag list.
    pub tags: String,
    /// Display date.
    pub date: Option<String>,
    /// ISO-8601 date.
    pub date_iso: Option<String>,
    /// Listing sort key.
    pub timestamp: Option<SortKey>,
}

impl StoredRow {
    /// Creates an empty row for the given key.
    pub fn new(app_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            app_id: app_id.into(),
            content: None,
            category: String::new(),
            tags: "[]".to_string(),
            date: None,
            date_iso: None,
            timestamp: None,
        }
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

    /// Sets the serialized tag column.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<SortKey>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Listing order: newest timestamp first, rows without a timestamp last,
    /// ties broken by id.
    pub fn newest_first(a: &StoredRow, b: &StoredRow) -> Ordering {
        let by_time = match (&a.timestamp, &b.timestamp) {
            (Some(x), Some(y)) => y.compare(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_time.then_with(|| a.id.cmp(&b.id))
    }
}
