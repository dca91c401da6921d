//! Explicit configuration handed to the login flow and the sync driver.

use chrono_tz::Tz;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_LOGIN_URL: &str = "https://user.sportngin.com/users/sign_in";
pub const DEFAULT_API_BASE: &str = "https://api.sportngin.com/v3";

/// Which payload shape entries classified as games are sent with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePayload {
    /// Games are created as plain events titled "(Game) <summary>".
    #[default]
    Event,
    /// Games are created with `game_details` after resolving the opponent.
    Game,
}

/// The team events are created for.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: String,
    /// Display name, used to find our side of a game matchup.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub team: Team,
    /// Sent as `local_timezone` on every payload.
    pub local_timezone: Tz,
    pub game_payload: GamePayload,
}

impl SyncConfig {
    pub fn new(team: Team, local_timezone: Tz) -> Self {
        SyncConfig {
            team,
            local_timezone,
            game_payload: GamePayload::default(),
        }
    }

    pub fn with_game_payload(mut self, game_payload: GamePayload) -> Self {
        self.game_payload = game_payload;
        self
    }
}

/// Where to log in and where the platform API lives.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_login_url")]
    pub login_url: Url,
    #[serde(default = "default_api_base")]
    pub api_base: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            login_url: default_login_url(),
            api_base: default_api_base(),
        }
    }
}

fn default_login_url() -> Url {
    Url::parse(DEFAULT_LOGIN_URL).expect("default login URL is valid")
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default API base is valid")
}
