pub mod events;
pub mod opponents;
pub mod sync;

use anyhow::{Context, Result};
use sportsengine_core::{AuthenticatedSession, Session, login};

use crate::config::Config;

/// Days ahead listed by `events` when no --to is given
pub const DEFAULT_EVENT_DAYS: i64 = 90;

/// Open a session and log in with the configured account.
pub fn connect(config: &Config) -> Result<AuthenticatedSession> {
    let credential = config.credential()?;
    let session = Session::new().context("Failed to create HTTP session")?;

    login(session, &config.endpoints.login_url, &credential)
        .with_context(|| format!("Failed to log in as {}", credential.username))
}
