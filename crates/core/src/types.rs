//! Core types for postdate.
//!
//! These types describe the record being dated, which of its dates to show,
//! and what the resolver produced.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format string that selects relative phrasing ("3 days ago").
pub const HUMAN_DIFF: &str = "human-diff";

/// The entity being dated (usually a post).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub created_at: DateTime<FixedOffset>,
    pub modified_at: Option<DateTime<FixedOffset>>,
    /// Custom field values keyed by meta key.
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Create a record with no modification date and no custom fields.
    #[must_use]
    pub fn new(id: u64, created_at: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            created_at,
            modified_at: None,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn modified(mut self, modified_at: DateTime<FixedOffset>) -> Self {
        self.modified_at = Some(modified_at);
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a custom field value.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Which of a record's dates to display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    PostDate,
    ModifiedDate,
    CustomField(String),
}

impl FieldSelector {
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::CustomField(name.into())
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostDate => f.write_str("post date"),
            Self::ModifiedDate => f.write_str("modified date"),
            Self::CustomField(name) => write!(f, "custom field '{name}'"),
        }
    }
}

/// How to render the resolved date.
///
/// Serialized as a plain string: `"human-diff"` for [`FormatSpec::HumanRelative`],
/// anything else is a PHP-style date pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatSpec {
    /// A `date()`-style pattern such as `"F j, Y"`.
    Pattern(String),
    /// Relative phrasing: "3 days ago", "2 hours from now".
    HumanRelative,
}

impl FormatSpec {
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pattern(p) => p,
            Self::HumanRelative => HUMAN_DIFF,
        }
    }
}

impl From<&str> for FormatSpec {
    fn from(s: &str) -> Self {
        if s == HUMAN_DIFF {
            Self::HumanRelative
        } else {
            Self::Pattern(s.to_string())
        }
    }
}

impl From<String> for FormatSpec {
    fn from(s: String) -> Self {
        if s == HUMAN_DIFF {
            Self::HumanRelative
        } else {
            Self::Pattern(s)
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FormatSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FormatSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// A successfully resolved date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    /// Human-facing text, possibly wrapped in an anchor.
    pub display_text: String,
    /// ISO 8601 rendering of the resolved timestamp.
    pub machine_timestamp: String,
    /// Class modifier contributed by the resolver (e.g. `modified-date`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_modifier: Option<String>,
}

/// Outcome of resolving a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum Resolution {
    /// Render this date.
    Date(ResolvedDate),
    /// The custom field could not be read as a date (strict mode only).
    Invalid,
    /// Render nothing.
    Empty,
}

impl Resolution {
    /// Text shown for [`Resolution::Invalid`].
    pub const INVALID_MARKER: &'static str = "Invalid date";

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn date(&self) -> Option<&ResolvedDate> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }
}
