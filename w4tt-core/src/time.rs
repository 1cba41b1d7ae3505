//! Time utilities: local business zone <-> UTC, lenient timestamp parsing,
//! and the wire formats used in assignment records.

use std::sync::LazyLock;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::ParseError;

// Accepts "2025-06-02T10:30:00.0000000", "2025-06-01T13:02:14.5489132Z",
// "2025-06-02 10:30", "2025-06-02T10:30:00+00:00", "...+0200".
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<date>\d{4}-\d{2}-\d{2})[Tt ]",
        r"(?P<hm>\d{2}:\d{2})(?::(?P<sec>\d{2}))?",
        r"(?:\.\d+)?",
        r"\s*(?P<zone>[Zz]|[+-]\d{2}(?::?\d{2})?)?$"
    ))
    .expect("timestamp pattern is valid")
});

/// Parse a loosely formatted timestamp into a UTC instant.
///
/// Fractional seconds are discarded. Without an explicit offset the wall-clock
/// value is read in `default_zone`; DST-ambiguous times resolve to the earliest
/// instant, nonexistent ones are an error.
pub fn parse_timestamp(raw: &str, default_zone: Tz) -> Result<DateTime<Utc>, ParseError> {
    let input = raw.trim();
    let caps = TIMESTAMP_RE.captures(input).ok_or_else(|| ParseError::Malformed {
        input: input.to_string(),
    })?;

    let sec = caps.name("sec").map_or("00", |m| m.as_str());
    let wall = format!("{} {}:{}", &caps["date"], &caps["hm"], sec);
    let ndt = NaiveDateTime::parse_from_str(&wall, "%Y-%m-%d %H:%M:%S").map_err(|_| {
        ParseError::InvalidDateTime {
            input: input.to_string(),
        }
    })?;

    match caps.name("zone").map(|m| m.as_str()) {
        None => default_zone
            .from_local_datetime(&ndt)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| ParseError::NonexistentLocalTime {
                input: input.to_string(),
                zone: default_zone.name().to_string(),
            }),
        Some("Z") | Some("z") => Ok(Utc.from_utc_datetime(&ndt)),
        Some(offset) => {
            let offset = parse_offset(offset).ok_or_else(|| ParseError::InvalidOffset {
                input: input.to_string(),
            })?;
            offset
                .from_local_datetime(&ndt)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| ParseError::InvalidOffset {
                    input: input.to_string(),
                })
        }
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4).map_or(Some(0), |m| m.parse().ok())?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Converts between UTC instants and the business zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConverter {
    zone: Tz,
}

impl TimeConverter {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.zone)
    }

    pub fn to_utc<T: TimeZone>(&self, local: &DateTime<T>) -> DateTime<Utc> {
        local.with_timezone(&Utc)
    }

    /// `hour:00` on `date` in the business zone, or None if that wall time
    /// does not exist there.
    pub fn local_at(&self, date: NaiveDate, hour: u32) -> Option<DateTime<Tz>> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
        self.zone
            .from_local_datetime(&date.and_time(time))
            .earliest()
    }

    /// Parse a timestamp and express it in the business zone.
    pub fn parse(&self, raw: &str, default_zone: Tz) -> Result<DateTime<Tz>, ParseError> {
        parse_timestamp(raw, default_zone).map(|utc| self.to_local(utc))
    }
}

/// `2025-06-02T07:00:00.0000000`: UTC wall time with a fixed 7-digit fraction.
pub fn format_reservation(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S.0000000").to_string()
}

/// `2025-06-02 09:00:00 +0200`.
pub fn format_local(local: &DateTime<Tz>) -> String {
    local.format("%Y-%m-%d %H:%M:%S %z").to_string()
}

/// `generated_2025-06-02T09:00:00+02:00`.
pub fn slot_id(local_start: &DateTime<Tz>) -> String {
    format!(
        "generated_{}",
        local_start.to_rfc3339_opts(SecondsFormat::Secs, false)
    )
}

/// Parse the `%Y-%m-%d %H:%M:%S %z` form produced by [`format_local`].
pub fn parse_local_wire(s: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z").map_err(|_| ParseError::Malformed {
        input: s.to_string(),
    })
}
