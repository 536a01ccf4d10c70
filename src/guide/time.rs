//! Clock-string parsing and date helpers
//!
//! Listings carry start times as 12-hour strings ("7:00 PM"). Everything on the
//! timeline works in minutes since midnight of the listing's zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::OnceLock;

/// Minutes in a day; valid minute-of-day values are below this
pub const MINUTES_PER_DAY: u32 = 24 * 60;

fn clock_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Hour is 1-12 with an optional leading zero, minute 00-59.
    // The leading \b keeps "13:00 PM" from matching as "3:00 PM".
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(1[0-2]|0?[1-9]):([0-5][0-9])\s*(AM|PM)\b")
            .expect("clock pattern is valid")
    })
}

/// Convert a 12-hour clock string to minutes since midnight.
///
/// Anything that does not contain a valid `h:mm AM|PM` yields 0 (midnight).
pub fn parse_start_time(time_str: &str) -> u32 {
    let Some(caps) = clock_regex().captures(time_str) else {
        return 0;
    };

    let hours: u32 = caps[1].parse().unwrap_or(0);
    let minutes: u32 = caps[2].parse().unwrap_or(0);
    let pm = caps[3].eq_ignore_ascii_case("PM");

    let hours = match (hours, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    hours * 60 + minutes
}

pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Current wall-clock time in the given zone
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

pub fn today_in(tz: Tz) -> NaiveDate {
    now_in(tz).date_naive()
}

/// Step a date by whole days. Out-of-range results leave the date unchanged.
pub fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// ISO 8601 calendar date as the API expects it
pub fn api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "Monday, October 19, 2026"
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// "7:05 PM"
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Parse an IANA zone name, e.g. "America/New_York"
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// US zones with a daylight-neutral short tag and long name
const US_ZONES: &[(Tz, &str, &str)] = &[
    (chrono_tz::America::New_York, "ET", "Eastern Time"),
    (chrono_tz::America::Chicago, "CT", "Central Time"),
    (chrono_tz::America::Denver, "MT", "Mountain Time"),
    (chrono_tz::America::Phoenix, "MT", "Mountain Time"),
    (chrono_tz::America::Los_Angeles, "PT", "Pacific Time"),
];

/// Header tag for a zone: "ET" for Eastern, otherwise the current
/// abbreviation (e.g. "CET")
pub fn zone_tag(tz: Tz) -> String {
    match US_ZONES.iter().find(|(zone, _, _)| *zone == tz) {
        Some((_, tag, _)) => tag.to_string(),
        None => now_in(tz).format("%Z").to_string(),
    }
}

/// Footer wording for a zone: "Eastern Time", otherwise the IANA name
pub fn zone_display_name(tz: Tz) -> String {
    match US_ZONES.iter().find(|(zone, _, _)| *zone == tz) {
        Some((_, _, name)) => name.to_string(),
        None => tz.name().to_string(),
    }
}
