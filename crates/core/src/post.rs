//! Post documents in the shape the host's REST API returns.
//!
//! ```json
//! {
//!   "id": 42,
//!   "date": "2026-03-05T09:30:00",
//!   "modified": "2026-03-07T16:02:11",
//!   "link": "https://example.com/hello-world/",
//!   "meta": { "release_date": "2026-03-05" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::formats::parse_post_timestamp;
use crate::meta::{InMemoryStore, MetaError, MetaStore};
use crate::types::Record;

/// Errors that can occur while loading a post document.
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    /// Reading the document failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or is missing required fields.
    #[error("invalid post document: {0}")]
    Json(#[from] serde_json::Error),

    /// `date` or `modified` is not a timestamp.
    #[error("post field '{field}' is not a valid timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// The post's custom fields could not be loaded.
    #[error(transparent)]
    Meta(#[from] MetaError),
}

/// A post as returned by the REST API (only the fields the block needs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDocument {
    pub id: u64,
    /// Publish date in site time, or RFC 3339.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Permalink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "deserialize_meta")]
    pub meta: Map<String, Value>,
}

impl PostDocument {
    /// The post's dates as a [`Record`], without custom fields.
    ///
    /// Naive timestamps are read in `offset`.
    pub fn record(&self, offset: FixedOffset) -> Result<Record, PostError> {
        let created_at = parse_post_timestamp(&self.date, offset).ok_or_else(|| {
            PostError::InvalidTimestamp {
                field: "date",
                value: self.date.clone(),
            }
        })?;

        let modified_at = match self.modified.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_post_timestamp(raw, offset).ok_or_else(|| {
                PostError::InvalidTimestamp {
                    field: "modified",
                    value: raw.to_string(),
                }
            })?),
        };

        Ok(Record {
            modified_at,
            ..Record::new(self.id, created_at)
        })
    }

    /// A store holding this post's custom fields.
    ///
    /// Registered defaults are applied when the store is fetched from.
    #[must_use]
    pub fn meta_store(&self) -> InMemoryStore {
        let mut store = InMemoryStore::new().with_record(self.id);
        for (key, value) in &self.meta {
            if let Some(value) = meta_value_to_string(value) {
                store.insert(self.id, key.as_str(), value);
            }
        }
        store
    }

    /// Permalink, if the document has a non-empty one.
    #[must_use]
    pub fn permalink(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }

    /// Convert into a [`Record`] with all custom fields loaded, plus
    /// permalink.
    pub fn into_record(self, offset: FixedOffset) -> Result<(Record, Option<String>), PostError> {
        let snapshot = self.meta_store().fetch(self.id)?;
        let record = self.record(offset)?.with_meta(&snapshot);
        let link = self.permalink().map(str::to_string);
        Ok((record, link))
    }
}

/// Parse a post document from a JSON string.
pub fn parse_post(json: &str) -> Result<PostDocument, PostError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a post document from a JSON file.
pub fn load_post(path: impl AsRef<Path>) -> Result<PostDocument, PostError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| PostError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_post(&contents)
}

/// Single-valued string fields only; anything structured is dropped.
fn meta_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The API encodes an empty meta object as `[]`.
fn deserialize_meta<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected meta object, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{PUBLISH_DATE, RELEASE_DATE};
    use chrono::{Offset, Utc};
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "id": 42,
        "date": "2026-03-05T09:30:00",
        "modified": "2026-03-07T16:02:11",
        "link": "https://example.com/hello-world/",
        "meta": {
            "release_date": "2026-04-01",
            "views": 1200,
            "featured": true,
            "gallery": [1, 2, 3],
            "notes": null
        }
    }"#;

    #[test]
    fn test_into_record() {
        let (record, link) = parse_post(DOC).unwrap().into_record(Utc.fix()).unwrap();

        assert_eq!(record.id, 42);
        assert_eq!(record.created_at.to_rfc3339(), "2026-03-05T09:30:00+00:00");
        assert_eq!(
            record.modified_at.map(|m| m.to_rfc3339()),
            Some("2026-03-07T16:02:11+00:00".to_string())
        );
        assert_eq!(link.as_deref(), Some("https://example.com/hello-world/"));

        assert_eq!(record.field(RELEASE_DATE), Some("2026-04-01"));
        assert_eq!(record.field(PUBLISH_DATE), Some("2024-01-01"));
        assert_eq!(record.field("views"), Some("1200"));
        assert_eq!(record.field("featured"), Some("true"));
        assert_eq!(record.field("gallery"), None);
        assert_eq!(record.field("notes"), None);
    }

    #[test]
    fn test_site_offset_applies_to_naive_dates() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let (record, _) = parse_post(DOC).unwrap().into_record(offset).unwrap();
        assert_eq!(record.created_at.to_rfc3339(), "2026-03-05T09:30:00+02:00");
    }

    #[test]
    fn test_empty_meta_array() {
        let doc = parse_post(r#"{"id": 1, "date": "2026-01-01T00:00:00Z", "meta": []}"#).unwrap();
        assert!(doc.meta.is_empty());

        let (record, link) = doc.into_record(Utc.fix()).unwrap();
        assert_eq!(record.modified_at, None);
        assert_eq!(link, None);
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn test_meta_must_be_object() {
        let err = parse_post(r#"{"id": 1, "date": "2026-01-01T00:00:00Z", "meta": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, PostError::Json(_)));
    }

    #[test]
    fn test_invalid_timestamps() {
        let doc = parse_post(r#"{"id": 1, "date": "yesterday"}"#).unwrap();
        let err = doc.into_record(Utc.fix()).unwrap_err();
        assert!(matches!(
            err,
            PostError::InvalidTimestamp { field: "date", .. }
        ));

        let doc =
            parse_post(r#"{"id": 1, "date": "2026-01-01T00:00:00", "modified": "later"}"#).unwrap();
        let err = doc.into_record(Utc.fix()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "post field 'modified' is not a valid timestamp: \"later\""
        );
    }

    #[test]
    fn test_record_and_meta_store_are_separate() {
        let doc = parse_post(DOC).unwrap();
        let record = doc.record(Utc.fix()).unwrap();
        assert!(record.fields.is_empty());

        let snapshot = doc.meta_store().fetch(42).unwrap();
        assert_eq!(snapshot.get(RELEASE_DATE), Some("2026-04-01"));
        assert_eq!(snapshot.get(PUBLISH_DATE), Some("2024-01-01"));
        assert_eq!(snapshot.get("gallery"), None);
        assert!(matches!(doc.meta_store().fetch(7), Err(MetaError::NotFound(7))));
    }

    #[test]
    fn test_load_post_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.json");
        fs::write(&path, DOC).unwrap();

        let doc = load_post(&path).unwrap();
        assert_eq!(doc.id, 42);

        let missing = load_post(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, PostError::Io { .. }));
    }
}
