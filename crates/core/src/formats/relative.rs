//! Relative time phrasing ("3 days", "1 hour").
//!
//! Bucketing matches the CMS `human_time_diff` helper: each unit is used
//! until the next one is reached, values are rounded and never drop below 1.

use chrono::{DateTime, FixedOffset};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Describe the absolute distance between two instants, e.g. `"3 days"`.
///
/// Direction ("ago" / "from now") is left to the caller.
#[must_use]
pub fn human_time_diff(from: &DateTime<FixedOffset>, to: &DateTime<FixedOffset>) -> String {
    let diff = from.signed_duration_since(*to).num_seconds().abs();

    let (value, singular, plural) = if diff < MINUTE {
        (diff, "second", "seconds")
    } else if diff < HOUR {
        (round_div(diff, MINUTE), "min", "mins")
    } else if diff < DAY {
        (round_div(diff, HOUR), "hour", "hours")
    } else if diff < WEEK {
        (round_div(diff, DAY), "day", "days")
    } else if diff < MONTH {
        (round_div(diff, WEEK), "week", "weeks")
    } else if diff < YEAR {
        (round_div(diff, MONTH), "month", "months")
    } else {
        (round_div(diff, YEAR), "year", "years")
    };

    let value = value.max(1);
    let unit = if value == 1 { singular } else { plural };
    format!("{value} {unit}")
}

/// Integer division rounding half away from zero (inputs are non-negative).
fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}
