use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use sportsengine_core::remote::RemoteCalendar;

use crate::config::Config;

use super::{DEFAULT_EVENT_DAYS, connect};

pub fn run(config: &Config, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let tz = config.team.timezone;
    let today = Utc::now().with_timezone(&tz).date_naive();

    let (from_date, to_date) = date_range(today, from, to)?;
    let start = day_bound(from_date, tz, false)?;
    let end = day_bound(to_date, tz, true)?;

    let session = connect(config)?;
    let remote = RemoteCalendar::new(&session, &config.endpoints.api_base);
    let events = remote.list_events(&config.team.id, &start, &end)?;

    if events.is_empty() {
        println!("No events between {} and {}", from_date, to_date);
        return Ok(());
    }

    for event in events {
        println!(
            "{}  {:<6}  {}",
            event.start_date_time.as_deref().unwrap_or("?"),
            event.event_type.as_deref().unwrap_or("?"),
            event.title.as_deref().unwrap_or("(untitled)")
        );
    }

    Ok(())
}

/// Resolve `--from`/`--to`. Without `--to` the range covers
/// `DEFAULT_EVENT_DAYS` days after the start.
fn date_range(
    today: NaiveDate,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(NaiveDate, NaiveDate)> {
    let from_date = match from {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let to_date = match to {
        Some(s) => parse_date(s)?,
        None => from_date + Duration::days(DEFAULT_EVENT_DAYS),
    };
    if to_date < from_date {
        anyhow::bail!("--to ({}) is before --from ({})", to_date, from_date);
    }
    Ok((from_date, to_date))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// First (or last) second of `date` in `tz`.
fn day_bound(date: NaiveDate, tz: Tz, end_of_day: bool) -> Result<DateTime<FixedOffset>> {
    let naive = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
    .context("Invalid time of day")?;

    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("{} does not exist in {}", naive, tz.name()))?;
    Ok(local.fixed_offset())
}
