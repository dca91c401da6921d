//! Calendar entry → platform payload.
//!
//! Two payload shapes exist. The event shape is what the sync sends for
//! every entry by default, titled "(Practice) …" or "(Game) …". The game
//! shape carries `game_details` and needs an opponent resolved on the
//! platform first, which is the sync driver's job.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::SyncConfig;
use crate::entry::CalendarEntry;
use crate::error::SportsEngineResult;
use crate::remote::Opponent;
use crate::timestamp::to_api_string;

/// `<Kind> (<Division>) <Away> @ <Home>`, e.g. `Game (A) Lions 12U @ Tigers 12U`
static MATCHUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+ \(\w+\) (?P<away>.+?) @ (?P<home>.+?)\s*$").expect("valid matchup regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    Event,
    Game,
}

/// Body of a create-event request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub event_type: PayloadShape,
    pub local_timezone: String,
    pub with_notification: bool,
    pub principals: Vec<Principal>,
    pub venue_id: Option<String>,
    pub subvenue_id: Option<String>,
    #[serde(rename = "type")]
    pub payload_type: PayloadShape,
    pub tbd_time: bool,
    pub start_date_time: String,
    pub end_date_time: String,
    #[serde(flatten)]
    pub details: PayloadDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub id: String,
    pub extended_attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadDetails {
    Event {
        status: String,
        title: String,
    },
    Game {
        game_details: GameDetails,
        duration_hours: String,
        duration_minutes: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetails {
    pub team_1: GameTeam,
    pub team_2: GameTeam,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameTeam {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_home_team: Option<bool>,
    pub name: String,
}

/// The two sides of a game as written in the entry description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub away: String,
    pub home: String,
}

impl Matchup {
    /// Parse the first line of a description; `None` if it is not a matchup.
    pub fn parse(description: &str) -> Option<Self> {
        let first_line = description.lines().next()?;
        let caps = MATCHUP_RE.captures(first_line)?;
        Some(Matchup {
            away: caps["away"].to_string(),
            home: caps["home"].to_string(),
        })
    }

    /// Given our team's name, return the opponent's name and whether we
    /// are the home side.
    pub fn opponent_of(&self, team_name: &str) -> Option<(&str, bool)> {
        if self.home == team_name {
            Some((self.away.as_str(), true))
        } else if self.away == team_name {
            Some((self.home.as_str(), false))
        } else {
            None
        }
    }
}

impl EventPayload {
    fn new(entry: &CalendarEntry, config: &SyncConfig, shape: PayloadShape, details: PayloadDetails) -> Self {
        EventPayload {
            event_type: shape,
            local_timezone: config.local_timezone.name().to_string(),
            with_notification: false,
            principals: vec![Principal {
                id: config.team.id.clone(),
                extended_attributes: BTreeMap::new(),
            }],
            venue_id: None,
            subvenue_id: None,
            payload_type: shape,
            tbd_time: false,
            start_date_time: to_api_string(&entry.start),
            end_date_time: to_api_string(&entry.end),
            details,
        }
    }

    #[cfg(test)]
    pub(crate) fn title(&self) -> Option<&str> {
        match &self.details {
            PayloadDetails::Event { title, .. } => Some(title.as_str()),
            PayloadDetails::Game { .. } => None,
        }
    }
}

/// Build the event-shaped payload for an entry, titled by its kind.
pub fn translate(entry: &CalendarEntry, config: &SyncConfig) -> SportsEngineResult<EventPayload> {
    entry.validate()?;

    let title = format!("{}{}", entry.kind().title_prefix(), entry.summary);
    let details = PayloadDetails::Event {
        status: "scheduled".to_string(),
        title,
    };
    Ok(EventPayload::new(entry, config, PayloadShape::Event, details))
}

/// Build the game-shaped payload for an entry against an already resolved
/// opponent. The duration is taken from the entry.
pub fn translate_game(
    entry: &CalendarEntry,
    config: &SyncConfig,
    opponent: &Opponent,
    is_home_team: bool,
) -> SportsEngineResult<EventPayload> {
    entry.validate()?;

    // Whole minutes, rounded up so a short entry never reads as zero
    let minutes = ((entry.end - entry.start).num_seconds() + 59) / 60;
    let details = PayloadDetails::Game {
        game_details: GameDetails {
            team_1: GameTeam {
                id: config.team.id.clone(),
                is_home_team: Some(is_home_team),
                name: config.team.name.clone(),
            },
            team_2: GameTeam {
                id: opponent.id.clone(),
                is_home_team: None,
                name: opponent.name.clone(),
            },
        },
        duration_hours: (minutes / 60).to_string(),
        duration_minutes: (minutes % 60).to_string(),
    };
    Ok(EventPayload::new(entry, config, PayloadShape::Game, details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Team;
    use crate::error::SportsEngineError;
    use chrono::DateTime;
    use serde_json::json;

    fn config() -> SyncConfig {
        SyncConfig::new(
            Team {
                id: "42".to_string(),
                name: "Lions 12U".to_string(),
            },
            chrono_tz::America::Los_Angeles,
        )
    }

    fn entry(description: Option<&str>) -> CalendarEntry {
        CalendarEntry {
            start: DateTime::parse_from_rfc3339("2023-10-31T18:00:00-07:00").unwrap(),
            end: DateTime::parse_from_rfc3339("2023-10-31T19:30:00-07:00").unwrap(),
            summary: "Lions vs Tigers".to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_practice_payload() {
        let payload = translate(&entry(Some("Practice (A) Lions 12U @ Tigers 12U")), &config()).unwrap();

        assert_eq!(payload.title(), Some("(Practice) Lions vs Tigers"));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "event_type": "event",
                "status": "scheduled",
                "local_timezone": "America/Los_Angeles",
                "with_notification": false,
                "principals": [{"id": "42", "extended_attributes": {}}],
                "venue_id": null,
                "subvenue_id": null,
                "title": "(Practice) Lions vs Tigers",
                "type": "event",
                "tbd_time": false,
                "start_date_time": "2023-10-31T18:00:00-07:00",
                "end_date_time": "2023-10-31T19:30:00-07:00"
            })
        );
    }

    #[test]
    fn test_game_entry_uses_event_shape_with_game_title() {
        let payload = translate(&entry(Some("Game (A) Lions 12U @ Tigers 12U")), &config()).unwrap();

        assert_eq!(payload.event_type, PayloadShape::Event);
        assert_eq!(payload.title(), Some("(Game) Lions vs Tigers"));
    }

    #[test]
    fn test_entry_without_description_is_titled_game() {
        let payload = translate(&entry(None), &config()).unwrap();
        assert_eq!(payload.title(), Some("(Game) Lions vs Tigers"));
    }

    #[test]
    fn test_timezone_is_configured_not_per_event() {
        let mut e = entry(Some("Practice"));
        e.start = DateTime::parse_from_rfc3339("2023-10-31T21:00:00-04:00").unwrap();
        e.end = DateTime::parse_from_rfc3339("2023-10-31T22:00:00-04:00").unwrap();

        let payload = translate(&e, &config()).unwrap();

        assert_eq!(payload.local_timezone, "America/Los_Angeles");
        assert_eq!(payload.start_date_time, "2023-10-31T21:00:00-04:00");
    }

    #[test]
    fn test_translate_rejects_inverted_times() {
        let mut e = entry(Some("Practice"));
        std::mem::swap(&mut e.start, &mut e.end);

        assert!(matches!(
            translate(&e, &config()),
            Err(SportsEngineError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_game_payload() {
        let opponent = Opponent {
            id: "99".to_string(),
            name: "Tigers 12U".to_string(),
        };

        let payload = translate_game(&entry(Some("Game")), &config(), &opponent, false).unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "event_type": "game",
                "local_timezone": "America/Los_Angeles",
                "with_notification": false,
                "principals": [{"id": "42", "extended_attributes": {}}],
                "venue_id": null,
                "subvenue_id": null,
                "type": "game",
                "tbd_time": false,
                "start_date_time": "2023-10-31T18:00:00-07:00",
                "end_date_time": "2023-10-31T19:30:00-07:00",
                "game_details": {
                    "team_1": {"id": "42", "is_home_team": false, "name": "Lions 12U"},
                    "team_2": {"id": "99", "name": "Tigers 12U"}
                },
                "duration_hours": "1",
                "duration_minutes": "30"
            })
        );
        assert_eq!(payload.title(), None);
    }

    #[test]
    fn test_game_duration_rounds_up_to_whole_minutes() {
        let opponent = Opponent {
            id: "99".to_string(),
            name: "Tigers 12U".to_string(),
        };
        let mut e = entry(Some("Game"));

        e.end = DateTime::parse_from_rfc3339("2023-10-31T18:00:30-07:00").unwrap();
        let value = serde_json::to_value(translate_game(&e, &config(), &opponent, true).unwrap()).unwrap();
        assert_eq!(value["duration_hours"], "0");
        assert_eq!(value["duration_minutes"], "1");

        e.end = DateTime::parse_from_rfc3339("2023-10-31T19:59:01-07:00").unwrap();
        let value = serde_json::to_value(translate_game(&e, &config(), &opponent, true).unwrap()).unwrap();
        assert_eq!(value["duration_hours"], "2");
        assert_eq!(value["duration_minutes"], "0");
    }

    #[test]
    fn test_matchup_parse() {
        let matchup = Matchup::parse("Game (A) Lions 12U @ Tigers 12U\nArrive 30 min early").unwrap();

        assert_eq!(matchup.away, "Lions 12U");
        assert_eq!(matchup.home, "Tigers 12U");
        assert_eq!(matchup.opponent_of("Lions 12U"), Some(("Tigers 12U", false)));
        assert_eq!(matchup.opponent_of("Tigers 12U"), Some(("Lions 12U", true)));
        assert_eq!(matchup.opponent_of("Bears 12U"), None);
    }

    #[test]
    fn test_matchup_parse_rejects_free_text() {
        assert_eq!(Matchup::parse("Team photos in the lobby"), None);
        assert_eq!(Matchup::parse(""), None);
    }
}
