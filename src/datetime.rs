//! Datetime parsing and normalization for link attributes and headers.
//!
//! Timemap generators are sloppy with timestamps: zones other than GMT show
//! up, and some truncate the capture time to midnight while the archived
//! URI-M still carries the full `YYYYMMDDHHMMSS` stamp in its path.
//! [`normalize`] moves everything to UTC and repairs the second case.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

static URI_DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/([12][0-9]{3}[01][0-9][0-3][0-9][0-2][0-9][0-5][0-9][0-5][0-9])/")
        .expect("valid uri datetime regex")
});

const URI_DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Formats that carry an explicit offset
const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Formats without a zone; these are read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    // RFC 850
    "%A, %d-%b-%y %H:%M:%S GMT",
    // asctime
    "%a %b %e %H:%M:%S %Y",
    URI_DATETIME_FORMAT,
];

/// RFC 1123 with the weekday and zone already stripped
const BARE_RFC1123_FORMATS: &[&str] = &["%d %b %Y %H:%M:%S", "%d %b %Y %H:%M"];

/// Zone names that mean UTC
const UTC_SUFFIXES: &[&str] = &["GMT", "UTC", "UT", "Z"];

/// Parse an RFC 1123 / RFC 3339 style datetime, tolerating the usual
/// variations seen in timemaps and `Memento-Datetime` headers.
pub fn parse_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });
    match naive {
        Some(naive) => Some(naive.and_utc().fixed_offset()),
        None => parse_loose(raw),
    }
}

/// Last resort: ignore the weekday (which may not match the date) and
/// accept a missing zone or a spelled-out UTC zone.
fn parse_loose(raw: &str) -> Option<DateTime<FixedOffset>> {
    let rest = strip_weekday(raw);
    if let Ok(dt) = DateTime::parse_from_rfc2822(rest) {
        return Some(dt);
    }
    let rest = strip_utc_zone(rest);
    let naive = BARE_RFC1123_FORMATS
        .iter()
        .chain(NAIVE_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(rest, fmt).ok())?;
    Some(naive.and_utc().fixed_offset())
}

fn strip_weekday(raw: &str) -> &str {
    match raw.split_once(',') {
        Some((day, rest)) if !day.is_empty() && day.bytes().all(|b| b.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => raw,
    }
}

fn strip_utc_zone(raw: &str) -> &str {
    UTC_SUFFIXES
        .iter()
        .find_map(|zone| raw.strip_suffix(zone))
        .map_or(raw, str::trim_end)
}

/// Convert to UTC and, when a URI is given, repair an exact midnight
/// timestamp from the `YYYYMMDDHHMMSS` stamp embedded in that URI.
///
/// The repair only replaces the time of day and only when the embedded
/// date is the same calendar date.
pub fn normalize(dt: Option<DateTime<FixedOffset>>, uri: Option<&str>) -> Option<DateTime<Utc>> {
    let dt = dt?.with_timezone(&Utc);
    let uri = match uri {
        Some(uri) => uri,
        None => return Some(dt),
    };
    if dt.hour() != 0 || dt.minute() != 0 || dt.second() != 0 || dt.nanosecond() != 0 {
        return Some(dt);
    }
    match repair_from_uri(dt, uri) {
        Some(repaired) => {
            debug!(uri, %dt, %repaired, "took time of day from URI");
            Some(repaired)
        }
        None => Some(dt),
    }
}

fn repair_from_uri(dt: DateTime<Utc>, uri: &str) -> Option<DateTime<Utc>> {
    let stamp = URI_DATETIME_RE.captures(uri)?.get(1)?.as_str();
    let embedded = NaiveDateTime::parse_from_str(stamp, URI_DATETIME_FORMAT).ok()?;
    if embedded.date() != dt.date_naive() {
        return None;
    }
    Some(dt.date_naive().and_time(embedded.time()).and_utc())
}
