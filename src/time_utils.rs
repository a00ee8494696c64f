// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as stored on new records.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Render a stored timestamp like "March 04, 2026 at 09:15 AM".
///
/// Accepts RFC3339 as well as offset-less ISO 8601 (records written by older
/// clients). Anything unparseable is shown as stored.
pub fn format_plan_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%B %d, %Y at %I:%M %p";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// The calendar-date prefix of a stored timestamp.
pub fn date_prefix(raw: &str) -> &str {
    raw.get(..10).unwrap_or(raw)
}
