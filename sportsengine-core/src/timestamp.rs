//! Timestamp formatting for the platform API.
//!
//! Every timestamp sent to the platform carries an explicit UTC offset and
//! second precision, e.g. `2023-10-31T23:59:59-07:00`.

use chrono::{DateTime, SecondsFormat, TimeZone};

/// Format a timestamp the way the platform expects it.
///
/// UTC is written as `+00:00`, never `Z`.
pub fn to_api_string<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}
