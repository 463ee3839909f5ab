//! Built-in date formatting and parsing.

mod datetime;
mod pattern;
mod relative;

pub use datetime::{parse_date_value, parse_lenient_date_value, parse_post_timestamp};
pub use pattern::format_pattern;
pub use relative::human_time_diff;

use chrono::{DateTime, FixedOffset};

use crate::format::DateFormatter;

/// Default [`DateFormatter`]: `date()`-style patterns and `human_time_diff`
/// bucketing, English only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFormatter;

impl DateFormatter for PatternFormatter {
    fn format(&self, timestamp: &DateTime<FixedOffset>, pattern: &str) -> String {
        format_pattern(timestamp, pattern)
    }

    fn human_relative(
        &self,
        timestamp: &DateTime<FixedOffset>,
        now: &DateTime<FixedOffset>,
    ) -> String {
        human_time_diff(timestamp, now)
    }
}
