use anyhow::{Context, Result};
use sportsengine_core::SyncDriver;

use crate::config::Config;
use crate::feed;

use super::connect;

pub fn run(config: &Config) -> Result<()> {
    let sync_config = config.sync_config();

    let content = feed::fetch(&config.calendar_url)?;
    let entries = feed::parse_entries(&content, sync_config.local_timezone)?;

    if entries.is_empty() {
        println!("No timed events in the calendar feed, nothing to sync.");
        return Ok(());
    }

    let session = connect(config)?;
    let team = sync_config.team.name.clone();
    let mut driver = SyncDriver::new(session, config.endpoints.api_base.clone(), sync_config);

    let total = entries.len();
    let report = driver
        .run(entries)
        .context("Sync stopped; events created before the failure were kept")?;

    println!("Created {} of {} events for {}", report.created.len(), total, team);

    Ok(())
}
