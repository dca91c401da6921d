//! Calendar feed download and parsing.
//!
//! Only VEVENTs with a timed DTSTART and DTEND become entries; all-day
//! events are skipped. Times are converted to timezone-aware values:
//! TZID times in their own zone, UTC and floating times in the team's zone.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::Tz;
use icalendar::parser::{Component, read_calendar, unfold};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use sportsengine_core::CalendarEntry;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Download the feed. `webcal://` URLs are fetched over https.
pub fn fetch(url: &str) -> Result<String> {
    let url = feed_url(url);

    tracing::info!("Fetching calendar {}", url);
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("Failed to fetch calendar from {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Calendar feed returned status {} ({})", status, url);
    }

    response.text().context("Failed to read calendar body")
}

/// `webcal://` is only a subscription hint; the feed itself is served over https.
fn feed_url(url: &str) -> String {
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Parse ICS content into entries, in feed order.
pub fn parse_entries(content: &str, local_tz: Tz) -> Result<Vec<CalendarEntry>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded)
        .map_err(|e| anyhow::anyhow!("Failed to parse calendar: {}", e))?;

    Ok(calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| parse_entry(vevent, local_tz))
        .collect())
}

fn parse_entry(vevent: &Component<'_>, local_tz: Tz) -> Option<CalendarEntry> {
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| "(No title)".to_string());

    let start = event_time(vevent, "DTSTART", local_tz);
    let end = event_time(vevent, "DTEND", local_tz);
    let (Some(start), Some(end)) = (start, end) else {
        tracing::warn!("Skipping '{}': no timed DTSTART/DTEND", summary);
        return None;
    };

    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));

    Some(CalendarEntry {
        start,
        end,
        summary,
        description,
    })
}

fn event_time(vevent: &Component<'_>, prop: &str, local_tz: Tz) -> Option<DateTime<FixedOffset>> {
    let value = DatePerhapsTime::try_from(vevent.find_prop(prop)?).ok()?;

    match value {
        DatePerhapsTime::Date(_) => None,
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
            Some(dt.with_timezone(&local_tz).fixed_offset())
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => local_tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset()),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz = tzid.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!("Unknown TZID '{}', using {}", tzid, local_tz.name());
                local_tz
            });
            tz.from_local_datetime(&date_time)
                .earliest()
                .map(|dt| dt.fixed_offset())
        }
    }
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
