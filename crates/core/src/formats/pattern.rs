//! `date()`-style pattern rendering.
//!
//! Implements the format characters used by CMS date settings, e.g.
//! `F j, Y` → `March 5, 2026`. Output is English; there is no locale
//! catalog.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};

/// Render `dt` with a `date()`-style pattern.
///
/// Unknown characters are copied verbatim and `\` escapes the next
/// character.
#[must_use]
pub fn format_pattern(dt: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 3);
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            // Escaped character, or a trailing backslash kept as-is
            out.push(chars.next().unwrap_or('\\'));
            continue;
        }
        match token(dt, c) {
            Some(rendered) => out.push_str(&rendered),
            None => out.push(c),
        }
    }

    out
}

/// Render a single format character, or `None` if it is a literal.
fn token(dt: &DateTime<FixedOffset>, c: char) -> Option<String> {
    let rendered = match c {
        // Day
        'd' => format!("{:02}", dt.day()),
        'D' => dt.format("%a").to_string(),
        'j' => dt.day().to_string(),
        'l' => dt.format("%A").to_string(),
        'N' => dt.weekday().number_from_monday().to_string(),
        'S' => ordinal_suffix(dt.day()).to_string(),
        'w' => dt.weekday().num_days_from_sunday().to_string(),
        'z' => dt.ordinal0().to_string(),

        // Week
        'W' => format!("{:02}", dt.iso_week().week()),

        // Month
        'F' => dt.format("%B").to_string(),
        'm' => format!("{:02}", dt.month()),
        'M' => dt.format("%b").to_string(),
        'n' => dt.month().to_string(),
        't' => days_in_month(dt.year(), dt.month()).to_string(),

        // Year
        'L' => u8::from(is_leap_year(dt.year())).to_string(),
        'o' => dt.iso_week().year().to_string(),
        'Y' => format!("{:04}", dt.year()),
        'y' => format!("{:02}", dt.year().rem_euclid(100)),

        // Time
        'a' => if dt.hour() < 12 { "am" } else { "pm" }.to_string(),
        'A' => if dt.hour() < 12 { "AM" } else { "PM" }.to_string(),
        'g' => dt.hour12().1.to_string(),
        'G' => dt.hour().to_string(),
        'h' => format!("{:02}", dt.hour12().1),
        'H' => format!("{:02}", dt.hour()),
        'i' => format!("{:02}", dt.minute()),
        's' => format!("{:02}", dt.second()),
        'u' => format!("{:06}", (dt.nanosecond() % 1_000_000_000) / 1_000),
        'v' => format!("{:03}", (dt.nanosecond() % 1_000_000_000) / 1_000_000),

        // Timezone (fixed offsets only, so zone names render as offsets)
        'e' | 'T' | 'P' => dt.format("%:z").to_string(),
        'O' => dt.format("%z").to_string(),
        'p' => {
            if dt.offset().local_minus_utc() == 0 {
                "Z".to_string()
            } else {
                dt.format("%:z").to_string()
            }
        }
        'Z' => dt.offset().local_minus_utc().to_string(),

        // Full date/time
        'c' => dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        'r' => dt.format("%a, %d %b %Y %H:%M:%S %z").to_string(),
        'U' => dt.timestamp().to_string(),

        _ => return None,
    };
    Some(rendered)
}

/// English ordinal suffix for a day of the month.
fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
    }

    #[test]
    fn test_common_site_formats() {
        let dt = utc(2026, 3, 5, 14, 7, 9);
        assert_eq!(format_pattern(&dt, "F j, Y"), "March 5, 2026");
        assert_eq!(format_pattern(&dt, "F Y"), "March 2026");
        assert_eq!(format_pattern(&dt, "Y-m-d"), "2026-03-05");
        assert_eq!(format_pattern(&dt, "m/d/Y"), "03/05/2026");
        assert_eq!(format_pattern(&dt, "d/m/Y"), "05/03/2026");
        assert_eq!(format_pattern(&dt, "d F Y"), "05 March 2026");
        assert_eq!(format_pattern(&dt, "g:i a"), "2:07 pm");
        assert_eq!(format_pattern(&dt, "H:i:s"), "14:07:09");
    }

    #[test]
    fn test_iso_8601() {
        let dt = utc(2026, 3, 5, 0, 0, 0);
        assert_eq!(format_pattern(&dt, "c"), "2026-03-05T00:00:00+00:00");

        let cest = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 6, 1, 9, 30, 0)
            .unwrap();
        assert_eq!(format_pattern(&cest, "c"), "2026-06-01T09:30:00+02:00");
        assert_eq!(format_pattern(&cest, "O"), "+0200");
        assert_eq!(format_pattern(&cest, "Z"), "7200");
    }

    #[test]
    fn test_rfc_2822_and_unix() {
        let dt = utc(2026, 3, 5, 14, 7, 9);
        assert_eq!(format_pattern(&dt, "r"), "Thu, 05 Mar 2026 14:07:09 +0000");
        assert_eq!(format_pattern(&dt, "U"), dt.timestamp().to_string());
        assert_eq!(format_pattern(&dt, "p"), "Z");
    }

    #[test]
    fn test_day_tokens() {
        let dt = utc(2026, 3, 1, 0, 0, 0); // Sunday
        assert_eq!(format_pattern(&dt, "D l N w"), "Sun Sunday 7 0");
        assert_eq!(format_pattern(&dt, "z"), "59");
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(31), "st");

        let dt = utc(2026, 3, 22, 0, 0, 0);
        assert_eq!(format_pattern(&dt, "jS F"), "22nd March");
    }

    #[test]
    fn test_month_length_and_leap_year() {
        assert_eq!(format_pattern(&utc(2024, 2, 10, 0, 0, 0), "t L"), "29 1");
        assert_eq!(format_pattern(&utc(2026, 2, 10, 0, 0, 0), "t L"), "28 0");
        assert_eq!(format_pattern(&utc(2026, 12, 10, 0, 0, 0), "t"), "31");
        assert_eq!(format_pattern(&utc(2026, 4, 10, 0, 0, 0), "t"), "30");
    }

    #[test]
    fn test_iso_week_year() {
        // 2027-01-01 is a Friday, still in ISO week 53 of 2026
        let dt = utc(2027, 1, 1, 0, 0, 0);
        assert_eq!(format_pattern(&dt, "o-\\WW"), "2026-W53");
        assert_eq!(format_pattern(&dt, "y"), "27");
    }

    #[test]
    fn test_twelve_hour_clock() {
        assert_eq!(format_pattern(&utc(2026, 1, 1, 0, 5, 0), "g:i A"), "12:05 AM");
        assert_eq!(format_pattern(&utc(2026, 1, 1, 12, 5, 0), "h:i a"), "12:05 pm");
        assert_eq!(format_pattern(&utc(2026, 1, 1, 9, 5, 0), "G"), "9");
    }

    #[test]
    fn test_escapes_and_literals() {
        let dt = utc(2026, 3, 5, 0, 0, 0);
        assert_eq!(format_pattern(&dt, "\\D\\a\\y: j"), "Day: 5");
        assert_eq!(format_pattern(&dt, "Y / #1"), "2026 / #1");
        assert_eq!(format_pattern(&dt, "Y\\"), "2026\\");
        assert_eq!(format_pattern(&dt, ""), "");
    }

    #[test]
    fn test_sub_second_tokens() {
        let dt = utc(2026, 3, 5, 0, 0, 0) + chrono::Duration::microseconds(123_456);
        assert_eq!(format_pattern(&dt, "u"), "123456");
        assert_eq!(format_pattern(&dt, "v"), "123");
    }
}
