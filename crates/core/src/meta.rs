//! Custom field registry and metadata stores.
//!
//! Two fields are registered with the host: `publish_date` and
//! `release_date`. Both are single string values exposed over REST, and
//! both have a default returned when a post has no value of its own.
//!
//! Fetching metadata is the caller's job. A [`MetaStore`] returns an
//! immutable [`MetaSnapshot`]; [`LazySnapshot`] performs that fetch at most
//! once and keeps the result.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use serde::Serialize;

use crate::types::Record;

pub const PUBLISH_DATE: &str = "publish_date";
pub const RELEASE_DATE: &str = "release_date";

/// A custom field registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetaField {
    pub key: &'static str,
    /// Value returned when a post has none.
    pub default: &'static str,
    /// Host type name; always `"string"` here.
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub single: bool,
    pub show_in_rest: bool,
}

/// Fields this block registers.
pub const REGISTERED_FIELDS: &[MetaField] = &[
    MetaField {
        key: PUBLISH_DATE,
        default: "2024-01-01",
        value_type: "string",
        single: true,
        show_in_rest: true,
    },
    MetaField {
        key: RELEASE_DATE,
        default: "2026-01-01",
        value_type: "string",
        single: true,
        show_in_rest: true,
    },
];

/// Look up a registered field by key.
#[must_use]
pub fn registered_field(key: &str) -> Option<&'static MetaField> {
    REGISTERED_FIELDS.iter().find(|f| f.key == key)
}

/// Fill in defaults for registered fields that are missing.
///
/// Existing values, even empty ones, are left alone.
pub fn apply_defaults(fields: &mut BTreeMap<String, String>) {
    for field in REGISTERED_FIELDS {
        fields
            .entry(field.key.to_string())
            .or_insert_with(|| field.default.to_string());
    }
}

/// Errors that can occur while fetching metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// The store has no record with this id.
    #[error("record {0} not found")]
    NotFound(u64),

    /// The store could not be reached or returned garbage.
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of a record's custom fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaSnapshot {
    fields: BTreeMap<String, String>,
}

impl MetaSnapshot {
    #[must_use]
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record {
    /// Replace this record's custom fields with a snapshot's contents.
    #[must_use]
    pub fn with_meta(mut self, snapshot: &MetaSnapshot) -> Self {
        self.fields.clone_from(&snapshot.fields);
        self
    }
}

/// Source of custom field values.
pub trait MetaStore {
    /// Fetch all custom fields for a record.
    fn fetch(&self, record_id: u64) -> Result<MetaSnapshot, MetaError>;
}

/// Store backed by a map, mostly for tests and the CLI.
///
/// Registered defaults are applied on fetch, as the host does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: HashMap<u64, BTreeMap<String, String>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `record_id` known to the store, with no fields.
    #[must_use]
    pub fn with_record(mut self, record_id: u64) -> Self {
        self.records.entry(record_id).or_default();
        self
    }

    #[must_use]
    pub fn with_field(
        mut self,
        record_id: u64,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(record_id, key, value);
        self
    }

    pub fn insert(&mut self, record_id: u64, key: impl Into<String>, value: impl Into<String>) {
        self.records
            .entry(record_id)
            .or_default()
            .insert(key.into(), value.into());
    }
}

impl MetaStore for InMemoryStore {
    fn fetch(&self, record_id: u64) -> Result<MetaSnapshot, MetaError> {
        let mut fields = self
            .records
            .get(&record_id)
            .cloned()
            .ok_or(MetaError::NotFound(record_id))?;
        apply_defaults(&mut fields);
        Ok(MetaSnapshot::new(fields))
    }
}

/// One-shot metadata load.
///
/// The first call to [`LazySnapshot::get`] fetches from the store; every
/// later call returns the same result, success or failure.
pub struct LazySnapshot<'a, S: MetaStore + ?Sized> {
    store: &'a S,
    record_id: u64,
    cell: OnceLock<Result<MetaSnapshot, MetaError>>,
}

impl<'a, S: MetaStore + ?Sized> LazySnapshot<'a, S> {
    #[must_use]
    pub fn new(store: &'a S, record_id: u64) -> Self {
        Self {
            store,
            record_id,
            cell: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn record_id(&self) -> u64 {
        self.record_id
    }

    /// True once the fetch has happened.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Fetch on first use, then hand out the cached result.
    pub fn get(&self) -> Result<&MetaSnapshot, &MetaError> {
        self.cell
            .get_or_init(|| {
                tracing::debug!(record = self.record_id, "fetching custom fields");
                self.store.fetch(self.record_id)
            })
            .as_ref()
    }
}
