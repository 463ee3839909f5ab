//! Date formatter trait definition.

use chrono::{DateTime, FixedOffset};

/// Pattern for ISO 8601 machine timestamps.
pub const ISO_8601: &str = "c";

/// Trait for the locale/format engine the resolver renders through.
///
/// The built-in implementation is [`crate::formats::PatternFormatter`].
/// Hosts with their own localisation can plug in a different engine.
pub trait DateFormatter: Send + Sync {
    /// Render `timestamp` with a `date()`-style pattern.
    fn format(&self, timestamp: &DateTime<FixedOffset>, pattern: &str) -> String;

    /// Describe the distance between `timestamp` and `now` without direction
    /// (e.g. "3 days"). The resolver adds "ago" / "from now".
    fn human_relative(&self, timestamp: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>)
        -> String;

    /// ISO 8601 rendering used for the `datetime` attribute.
    fn machine(&self, timestamp: &DateTime<FixedOffset>) -> String {
        self.format(timestamp, ISO_8601)
    }
}
