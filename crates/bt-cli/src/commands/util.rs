//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, bail};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// The current instant and the timezone used to interpret and display times.
#[derive(Debug, Clone)]
pub struct Clock<Tz: TimeZone> {
    pub tz: Tz,
    /// IANA name of `tz`, for JSON output.
    pub timezone_name: String,
    pub now: DateTime<Utc>,
}

impl Clock<Local> {
    /// The system clock in the local timezone.
    pub fn system() -> Self {
        Self {
            tz: Local,
            timezone_name: iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string()),
            now: Utc::now(),
        }
    }
}

impl<Tz: TimeZone> Clock<Tz> {
    /// A clock frozen at `now`.
    pub fn fixed(tz: Tz, timezone_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            tz,
            timezone_name: timezone_name.to_string(),
            now,
        }
    }

    /// The current calendar date in `tz`.
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.tz).date_naive()
    }

    /// Parses a command-line time relative to this clock.
    pub fn parse_when(&self, s: &str) -> anyhow::Result<DateTime<Utc>> {
        parse_when(s, self.now, &self.tz)
    }
}

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day)s?\s+ago$").expect("relative time regex is valid")
});

/// Upper bound for relative times (about one year in minutes).
const MAX_RELATIVE_MINUTES: i64 = 366 * 24 * 60;

/// Parse a point in time given on the command line.
///
/// Supports:
/// - `now`
/// - RFC 3339: "2025-03-01T08:30:00Z"
/// - Local wall-clock time today: "08:30"
/// - Relative: "20 minutes ago", "2 hours ago", "1 day ago"
pub fn parse_when<Tz: TimeZone>(
    s: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        let today = now.with_timezone(tz).date_naive();
        let local = today.and_time(time);
        return tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("{s} does not exist in the local timezone today"));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        bail!(
            "Invalid time: {s}. Use 'now', HH:MM, RFC 3339 (e.g., 2025-03-01T08:30:00Z) or relative (e.g., '20 minutes ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let minutes_per_unit = match &caps[2] {
        "minute" => 1,
        "hour" => 60,
        "day" => 60 * 24,
        unit => bail!("Unknown time unit: {unit}"),
    };

    if n > MAX_RELATIVE_MINUTES / minutes_per_unit {
        bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s}, expected YYYY-MM-DD"))
}
