use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use sportsengine_core::{Credential, Endpoints, GamePayload, SyncConfig, Team};
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
pub struct Config {
    /// ICS feed to read events from (http(s):// or webcal://)
    pub calendar_url: String,

    pub account: AccountConfig,

    pub team: TeamConfig,

    /// Login page and API base; only overridden for testing
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Deserialize)]
pub struct AccountConfig {
    pub username: String,
    /// Prompted for when missing
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct TeamConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// "event" (default) or "game"
    #[serde(default)]
    pub game_payload: GamePayload,
}

fn default_timezone() -> Tz {
    chrono_tz::America::Los_Angeles
}

impl Config {
    pub fn sync_config(&self) -> SyncConfig {
        let team = Team {
            id: self.team.id.clone(),
            name: self.team.name.clone(),
        };
        SyncConfig::new(team, self.team.timezone).with_game_payload(self.team.game_payload)
    }

    /// Credentials from the config file, asking for the password on the
    /// terminal if the file has none.
    pub fn credential(&self) -> Result<Credential> {
        let username = &self.account.username;
        let password = match &self.account.password {
            Some(password) => password.clone(),
            None => rpassword::prompt_password(format!("Password for {}: ", username))
                .context("Failed to read password")?,
        };
        Ok(Credential::new(username, password))
    }
}

/// Get the config directory path (~/.config/sportsengine-sync)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("sportsengine-sync");
    Ok(config_dir)
}

/// Get the config file path (~/.config/sportsengine-sync/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };

    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}\n\n\
            Create it with your calendar feed, login and team:\n\n\
            calendar_url = \"https://example.com/team.ics\"\n\n\
            [account]\n\
            username = \"coach@example.com\"\n\n\
            [team]\n\
            id = \"123456\"\n\
            name = \"Lions 12U\"",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    parse_config(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))
}

fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}
