//! Date resolution: picks the timestamp a block should show and renders it.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::format::DateFormatter;
use crate::formats::{parse_date_value, parse_lenient_date_value, PatternFormatter};
use crate::meta::{PUBLISH_DATE, RELEASE_DATE};
use crate::types::{FieldSelector, FormatSpec, Record, Resolution, ResolvedDate};

/// Site-wide date format used when a block has no format of its own.
pub const DEFAULT_SITE_DATE_FORMAT: &str = "F j, Y";

/// Class modifier added when the modified date is shown.
pub const MODIFIED_DATE_MODIFIER: &str = "modified-date";

/// Reserved custom fields and the fixed pattern each is rendered with.
const RESERVED_PATTERNS: &[(&str, &str)] = &[(RELEASE_DATE, "F j, Y"), (PUBLISH_DATE, "F Y")];

/// Fixed display pattern for a reserved custom field, if `name` is one.
#[must_use]
pub fn reserved_pattern(name: &str) -> Option<&'static str> {
    RESERVED_PATTERNS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, pattern)| *pattern)
}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Pattern used when no format is set.
    pub site_date_format: String,
    /// Offset applied to custom field values that carry none.
    pub utc_offset: FixedOffset,
    /// Interactive preview mode: unreadable custom fields resolve to
    /// [`Resolution::Invalid`] instead of [`Resolution::Empty`].
    pub strict: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            site_date_format: DEFAULT_SITE_DATE_FORMAT.to_string(),
            utc_offset: Utc.fix(),
            strict: false,
        }
    }
}

/// Resolves which date to show for a record and how it reads.
///
/// Pure: the only inputs are the arguments, including `now`, so identical
/// calls give identical results.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use postdate_core::{DateResolver, FieldSelector, Record};
///
/// let created = DateTime::parse_from_rfc3339("2026-01-10T09:00:00+00:00").unwrap();
/// let now = DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap();
/// let record = Record::new(7, created).with_field("release_date", "2026-03-05");
///
/// let resolver = DateResolver::new();
/// let resolution = resolver.resolve(
///     Some(&record),
///     &FieldSelector::custom("release_date"),
///     None,
///     None,
///     &now,
/// );
/// assert_eq!(resolution.date().unwrap().display_text, "March 5, 2026");
/// ```
#[derive(Debug, Clone)]
pub struct DateResolver<F = PatternFormatter> {
    formatter: F,
    config: ResolverConfig,
}

impl DateResolver {
    /// Create a resolver with the built-in formatter and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver with the built-in formatter.
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            formatter: PatternFormatter,
            config,
        }
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DateFormatter> DateResolver<F> {
    /// Create a resolver that renders through a custom formatter.
    #[must_use]
    pub fn with_formatter(formatter: F, config: ResolverConfig) -> Self {
        Self { formatter, config }
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Resolve the date to display.
    ///
    /// Returns [`Resolution::Empty`] when there is no record, when the
    /// modified date is selected but not later than the publish date, or
    /// when a custom field is missing or unreadable (outside strict mode).
    #[must_use]
    pub fn resolve(
        &self,
        record: Option<&Record>,
        selector: &FieldSelector,
        format: Option<&FormatSpec>,
        link_target: Option<&str>,
        now: &DateTime<FixedOffset>,
    ) -> Resolution {
        let Some(record) = record else {
            tracing::trace!("no record in context, rendering nothing");
            return Resolution::Empty;
        };

        let mut fixed_pattern = None;
        let mut css_modifier = None;
        let timestamp = match selector {
            FieldSelector::PostDate => record.created_at,
            FieldSelector::ModifiedDate => match record.modified_at {
                Some(modified) if later_by_minute(&modified, &record.created_at) => {
                    css_modifier = Some(MODIFIED_DATE_MODIFIER.to_string());
                    modified
                }
                _ => {
                    tracing::trace!(record = record.id, "post never modified, rendering nothing");
                    return Resolution::Empty;
                }
            },
            FieldSelector::CustomField(name) => {
                fixed_pattern = reserved_pattern(name);
                match self.custom_field_timestamp(record, name) {
                    Some(ts) => ts,
                    None if self.config.strict => return Resolution::Invalid,
                    None => return Resolution::Empty,
                }
            }
        };

        let display = match (fixed_pattern, format) {
            (Some(pattern), _) => self.formatter.format(&timestamp, pattern),
            (None, Some(FormatSpec::HumanRelative)) => self.relative(&timestamp, now),
            (None, Some(FormatSpec::Pattern(pattern))) if !pattern.is_empty() => {
                self.formatter.format(&timestamp, pattern)
            }
            (None, _) => self
                .formatter
                .format(&timestamp, &self.config.site_date_format),
        };

        let display_text = match link_target.filter(|href| !href.is_empty()) {
            Some(href) => format!("<a href=\"{href}\">{display}</a>"),
            None => display,
        };

        Resolution::Date(ResolvedDate {
            display_text,
            machine_timestamp: self.formatter.machine(&timestamp),
            css_modifier,
        })
    }

    fn custom_field_timestamp(&self, record: &Record, name: &str) -> Option<DateTime<FixedOffset>> {
        let Some(raw) = record.field(name) else {
            tracing::debug!(record = record.id, field = name, "custom field not set");
            return None;
        };

        let parsed = if reserved_pattern(name).is_some() {
            parse_lenient_date_value(raw, self.config.utc_offset)
        } else {
            parse_date_value(raw, self.config.utc_offset)
        };
        if parsed.is_none() {
            tracing::debug!(
                record = record.id,
                field = name,
                value = raw,
                "custom field is not a date"
            );
        }
        parsed
    }

    fn relative(&self, timestamp: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> String {
        let distance = self.formatter.human_relative(timestamp, now);
        if timestamp > now {
            format!("{distance} from now")
        } else {
            format!("{distance} ago")
        }
    }
}

/// True if `a` is later than `b` once both are truncated to the minute.
fn later_by_minute(a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>) -> bool {
    a.timestamp().div_euclid(60) > b.timestamp().div_euclid(60)
}
