//! postdate core
//!
//! Resolves and formats the date shown by a post date block: the publish
//! date, the last-modified date, or a date stored in a custom field.
//!
//! # Quick Start
//!
//! ```
//! use chrono::DateTime;
//! use postdate_core::{BlockAttributes, BlockRenderer, DateResolver, DisplayType, Record};
//!
//! let created = DateTime::parse_from_rfc3339("2026-03-05T09:30:00+00:00").unwrap();
//! let modified = DateTime::parse_from_rfc3339("2026-03-07T16:02:00+00:00").unwrap();
//! let now = DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap();
//! let record = Record::new(42, created).modified(modified);
//!
//! let renderer = BlockRenderer::new(DateResolver::new());
//! let attrs = BlockAttributes {
//!     display_type: DisplayType::Modified,
//!     ..BlockAttributes::default()
//! };
//!
//! let html = renderer.render(&attrs, Some(&record), None, &now);
//! assert!(html.contains("March 7, 2026"));
//! assert!(html.contains("wp-block-post-date__modified-date"));
//! ```
//!
//! # Relative Dates
//!
//! ```
//! use chrono::{DateTime, Duration};
//! use postdate_core::{DateResolver, FieldSelector, FormatSpec, Record};
//!
//! let now = DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap();
//! let record = Record::new(1, now - Duration::days(3));
//!
//! let resolution = DateResolver::new().resolve(
//!     Some(&record),
//!     &FieldSelector::PostDate,
//!     Some(&FormatSpec::HumanRelative),
//!     None,
//!     &now,
//! );
//! assert_eq!(resolution.date().unwrap().display_text, "3 days ago");
//! ```

pub mod format;
pub mod formats;
pub mod meta;
pub mod post;
pub mod render;
pub mod resolve;
pub mod types;

pub use format::DateFormatter;
pub use formats::PatternFormatter;
pub use meta::{
    InMemoryStore, LazySnapshot, MetaError, MetaField, MetaSnapshot, MetaStore, REGISTERED_FIELDS,
};
pub use post::{load_post, parse_post, PostDocument, PostError};
pub use render::{
    BlockAttributes, BlockRenderer, BlockStyle, DisplayType, ElementColor, ElementStyle, Source,
    StyleElements, TextAlign,
};
pub use resolve::{DateResolver, ResolverConfig, DEFAULT_SITE_DATE_FORMAT};
pub use types::*;
