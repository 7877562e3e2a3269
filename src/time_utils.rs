// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for time-of-day parsing and formatting.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer};

/// Parse `HH:MM` or `HH:MM:SS[.fff]`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    raw.parse::<NaiveTime>()
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Format as a 12-hour clock time, e.g. `8:05 AM`, `12:00 PM`.
pub fn format_time_12h(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Market opening hours summary, prefixed with open/closed state when known.
pub fn format_market_hours(
    opening: Option<NaiveTime>,
    closing: Option<NaiveTime>,
    is_open: Option<bool>,
) -> String {
    let (Some(opening), Some(closing)) = (opening, closing) else {
        return "Hours not available".to_string();
    };
    let range = format!("{} - {}", format_time_12h(opening), format_time_12h(closing));
    match is_open {
        Some(true) => format!("Open: {}", range),
        Some(false) => format!("Closed: {}", range),
        None => range,
    }
}

/// The backend serializes `LocalTime` as `"08:00:00"`, `[8, 0]` or
/// `{"hour": 8, "minute": 0}` depending on its Jackson setup.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTime {
    Text(String),
    Parts(Vec<u32>),
    Fields {
        hour: u32,
        #[serde(default)]
        minute: u32,
        #[serde(default)]
        second: u32,
    },
}

/// Serde adapter for optional time-of-day fields in any backend encoding.
pub fn deserialize_time_of_day<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(wire) = Option::<WireTime>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match &wire {
        WireTime::Text(s) if s.trim().is_empty() => return Ok(None),
        WireTime::Text(s) => parse_time_of_day(s),
        WireTime::Parts(parts) => match parts.as_slice() {
            [h, m] => NaiveTime::from_hms_opt(*h, *m, 0),
            [h, m, s, ..] => NaiveTime::from_hms_opt(*h, *m, *s),
            _ => None,
        },
        WireTime::Fields {
            hour,
            minute,
            second,
        } => NaiveTime::from_hms_opt(*hour, *minute, *second),
    };
    parsed
        .map(Some)
        .ok_or_else(|| D::Error::custom("invalid time of day"))
}
