use anyhow::Result;
use sportsengine_core::remote::RemoteCalendar;

use crate::config::Config;

use super::connect;

pub fn run(config: &Config) -> Result<()> {
    let session = connect(config)?;
    let remote = RemoteCalendar::new(&session, &config.endpoints.api_base);

    let opponents = remote.list_opponents(&config.team.id)?;
    if opponents.is_empty() {
        println!("No opponents for team {}", config.team.name);
        return Ok(());
    }

    for opponent in opponents {
        println!("{:>10}  {}", opponent.id, opponent.name);
    }

    Ok(())
}
