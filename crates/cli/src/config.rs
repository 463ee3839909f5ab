//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use chrono::{FixedOffset, Offset, Utc};
use postdate_core::render::DEFAULT_BLOCK_CLASS;
use postdate_core::DEFAULT_SITE_DATE_FORMAT;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# postdate configuration
# See: postdate --help for all options

# Site date format used when a block has no format (PHP date() tokens)
site_date_format = "F j, Y"

# Site timezone as a fixed offset; applied to dates without one
utc_offset = "+00:00"

# Base class of the rendered wrapper element
block_class = "wp-block-post-date"

# Disable colored output
no_color = false
"#;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site_date_format: Option<String>,
    pub utc_offset: Option<String>,
    pub block_class: Option<String>,
    pub no_color: Option<bool>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux: `~/.config/postdate/config.toml`
    /// - macOS: `~/Library/Application Support/postdate/config.toml`
    /// - Windows: `%APPDATA%\postdate\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("postdate").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    fn env_string(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get site_date_format with precedence: env > config > default.
    pub fn site_date_format(&self) -> String {
        Self::env_string("POSTDATE_DATE_FORMAT")
            .or_else(|| self.site_date_format.clone())
            .unwrap_or_else(|| DEFAULT_SITE_DATE_FORMAT.to_string())
    }

    /// Get utc_offset with precedence: env > config > default (UTC).
    ///
    /// An unparseable value is an error rather than a silent fallback, since
    /// it shifts every rendered date.
    pub fn utc_offset(&self) -> Result<FixedOffset, String> {
        match Self::env_string("POSTDATE_UTC_OFFSET").or_else(|| self.utc_offset.clone()) {
            Some(raw) => parse_utc_offset(&raw),
            None => Ok(Utc.fix()),
        }
    }

    /// Get block_class with precedence: env > config > default.
    pub fn block_class(&self) -> String {
        Self::env_string("POSTDATE_BLOCK_CLASS")
            .or_else(|| self.block_class.clone())
            .unwrap_or_else(|| DEFAULT_BLOCK_CLASS.to_string())
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("POSTDATE_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }
}

/// Parse a fixed UTC offset.
///
/// Accepts `Z`, `UTC`, `+02:00`, `-0530`, `+2` and plain hours like `5.5`
/// (the host stores fractional hours for half-hour zones).
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, String> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || format!("invalid UTC offset '{raw}' (expected e.g. +02:00)");

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        Some(_) => (1, s),
        None => return Err(invalid()),
    };

    // Signs belong in front only; this also keeps `f64` from reading `inf` or `1e3`
    let allowed = |b: u8| b.is_ascii_digit() || b == b':' || b == b'.';
    if rest.is_empty() || !rest.bytes().all(allowed) {
        return Err(invalid());
    }

    let seconds = if let Some((hours, minutes)) = rest.split_once(':') {
        hours_minutes(hours, minutes).ok_or_else(invalid)?
    } else if rest.len() == 4 && rest.bytes().all(|b| b.is_ascii_digit()) {
        hours_minutes(&rest[..2], &rest[2..]).ok_or_else(invalid)?
    } else {
        let hours: f64 = rest.parse().map_err(|_| invalid())?;
        if hours >= 24.0 {
            return Err(invalid());
        }
        (hours * 3600.0).round() as i32
    };

    FixedOffset::east_opt(sign * seconds).ok_or_else(invalid)
}

/// Offset seconds for unsigned `HH` and `MM` parts, if both are in range.
fn hours_minutes(hours: &str, minutes: &str) -> Option<i32> {
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    i32::try_from(hours * 3600 + minutes * 60).ok()
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}
