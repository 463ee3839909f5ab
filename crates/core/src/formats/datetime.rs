//! Date value parsing for post timestamps and custom fields.
//!
//! Custom fields are free-form strings. The general parser accepts what the
//! editor's `Date.parse` check accepts: ISO dates including the date-only
//! `YYYY` and `YYYY-MM` forms, RFC 2822, US `MM/DD/YYYY`, written-out month
//! names and `Date.prototype.toString` output. The lenient parser used for
//! reserved fields additionally accepts compact and day-first dates that
//! date-picker fields tend to store.
//!
//! Date-only values are anchored at midnight in the site offset, not UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Layouts for naive date-times (no offset), tried in order.
const NAIVE_DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

const MONTHS: [(&str, u32); 12] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Parse a custom field value as a date.
///
/// Values without an offset are anchored at `offset`; date-only values at
/// midnight. Blank input yields `None`.
#[must_use]
pub fn parse_date_value(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt);
    }
    if let Some(naive) = parse_naive_datetime(trimmed) {
        return anchor(naive, offset);
    }

    if let Some(dt) = parse_js_date_string(trimmed, offset) {
        return Some(dt);
    }

    let date = parse_iso_date(trimmed)
        .or_else(|| parse_iso_year_month(trimmed))
        .or_else(|| parse_year(trimmed))
        .or_else(|| parse_slash_ymd(trimmed))
        .or_else(|| parse_us_date(trimmed))
        .or_else(|| parse_month_day_year(trimmed))
        .or_else(|| parse_day_month_year(trimmed))?;
    anchor(date.and_hms_opt(0, 0, 0)?, offset)
}

/// Parse a reserved field value.
///
/// Accepts everything [`parse_date_value`] does, plus compact `YYYYMMDD`,
/// `YYYY/MM`, `DD.MM.YYYY` and day-first `DD/MM/YYYY` when the first part
/// can't be a month.
#[must_use]
pub fn parse_lenient_date_value(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Some(dt) = parse_date_value(raw, offset) {
        return Some(dt);
    }

    let trimmed = raw.trim();
    let date = parse_compact_date(trimmed)
        .or_else(|| parse_year_month(trimmed))
        .or_else(|| parse_eu_dot_date(trimmed))
        .or_else(|| parse_numeric_date(trimmed))?;
    anchor(date.and_hms_opt(0, 0, 0)?, offset)
}

/// Parse a post's `date` / `modified` value: RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM:SS` in site time.
#[must_use]
pub fn parse_post_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }
    parse_naive_datetime(trimmed).and_then(|naive| anchor(naive, offset))
}

fn anchor(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&naive).single()
}

fn parse_naive_datetime(input: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(input, layout).ok())
}

/// `YYYY-MM-DD`
fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    // Must be exactly 10 chars with dashes in place
    if input.len() != 10 {
        return None;
    }
    let bytes = input.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let year: i32 = input[0..4].parse().ok()?;
    let month: u32 = input[5..7].parse().ok()?;
    let day: u32 = input[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYY-MM`, anchored at the first of the month.
fn parse_iso_year_month(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if input.len() != 7 || bytes[4] != b'-' {
        return None;
    }
    parse_year_month(input)
}

/// `YYYY`, anchored at January 1st.
fn parse_year(input: &str) -> Option<NaiveDate> {
    if input.len() != 4 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(input.parse().ok()?, 1, 1)
}

/// `MM/DD/YYYY`, month first only.
fn parse_us_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 3 || parts[2].len() != 4 {
        return None;
    }

    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `Thu Mar 05 2026`, optionally followed by `10:30:00 GMT+0100 (zone name)`.
fn parse_js_date_string(input: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    // Zone names in parentheses are informational only
    let head = input.split('(').next().unwrap_or(input);
    let parts: Vec<&str> = head.split_whitespace().collect();
    if !(4..=6).contains(&parts.len()) {
        return None;
    }

    let weekday = parts[0].to_lowercase();
    if !WEEKDAYS.iter().any(|w| weekday.starts_with(w)) {
        return None;
    }
    let month = month_from_prefix(&parts[1].to_lowercase())?;
    let day: u32 = parts[2].parse().ok()?;
    let year: i32 = parts[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let naive = match parts.get(4) {
        Some(time) => date.and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?),
        None => date.and_hms_opt(0, 0, 0)?,
    };
    let zone = match parts.get(5) {
        Some(gmt) => parse_gmt_offset(gmt)?,
        None => offset,
    };
    anchor(naive, zone)
}

/// `GMT+0100`, `GMT-0530`
fn parse_gmt_offset(input: &str) -> Option<FixedOffset> {
    let rest = input.strip_prefix("GMT").or_else(|| input.strip_prefix("UTC"))?;
    if rest.is_empty() {
        return FixedOffset::east_opt(0);
    }
    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// `YYYY/MM/DD`
fn parse_slash_ymd(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 3 || parts[0].len() != 4 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `March 5, 2026`, `Mar 5 2026`
fn parse_month_day_year(input: &str) -> Option<NaiveDate> {
    let lower = input.to_lowercase();
    let month = month_from_prefix(&lower)?;

    // Skip the rest of the month name, then "5, 2026" or "5 2026"
    let rest = lower.trim_start_matches(char::is_alphabetic).trim_start_matches('.');
    let parts: Vec<&str> = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 2 {
        return None;
    }

    let day: u32 = parts[0]
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .ok()?;
    let year: i32 = parts[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `5 March 2026`, `5 Mar 2026`
fn parse_day_month_year(input: &str) -> Option<NaiveDate> {
    let lower = input.to_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month = month_from_prefix(parts[1])?;
    let year: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `20260305`
fn parse_compact_date(input: &str) -> Option<NaiveDate> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = input[0..4].parse().ok()?;
    let month: u32 = input[4..6].parse().ok()?;
    let day: u32 = input[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `2026-03` or `2026/03`, anchored at the first of the month.
fn parse_year_month(input: &str) -> Option<NaiveDate> {
    let (year, month) = input.split_once(|c: char| c == '-' || c == '/')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// `DD.MM.YYYY`
fn parse_eu_dot_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != 3 || parts[2].len() != 4 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `MM/DD/YYYY`, falling back to `DD/MM/YYYY` when the first part can't be
/// a month.
fn parse_numeric_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 3 || parts[2].len() != 4 {
        return None;
    }

    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

fn month_from_prefix(word: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(prefix, _)| word.starts_with(*prefix))
        .map(|(_, month)| *month)
}
