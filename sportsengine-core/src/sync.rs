//! Push calendar entries to the team calendar.
//!
//! Entries are processed in the order given, each one translated and then
//! created remotely. Nothing is compared against what already exists, so
//! running twice creates everything twice. The first failure stops the run;
//! events created before it stay created.
//!
//! With the game payload, a game whose description has no `A @ B` matchup
//! is still created, as a titled event.

use std::collections::HashMap;

use url::Url;

use crate::config::{GamePayload, SyncConfig};
use crate::entry::{CalendarEntry, EventKind};
use crate::error::{SportsEngineError, SportsEngineResult};
use crate::remote::{Opponent, RemoteCalendar, RemoteEvent};
use crate::session::AuthenticatedSession;
use crate::translate::{EventPayload, Matchup, translate, translate_game};

/// What a sync run created, in creation order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<RemoteEvent>,
}

pub struct SyncDriver {
    session: AuthenticatedSession,
    api_base: Url,
    config: SyncConfig,
    /// Opponents resolved during this driver's lifetime, by name
    opponents: HashMap<String, Opponent>,
}

impl SyncDriver {
    pub fn new(session: AuthenticatedSession, api_base: Url, config: SyncConfig) -> Self {
        SyncDriver {
            session,
            api_base,
            config,
            opponents: HashMap::new(),
        }
    }

    pub fn remote(&self) -> RemoteCalendar<'_> {
        RemoteCalendar::new(&self.session, &self.api_base)
    }

    /// Create one remote event per entry.
    pub fn run<I>(&mut self, entries: I) -> SportsEngineResult<SyncReport>
    where
        I: IntoIterator<Item = CalendarEntry>,
    {
        let mut report = SyncReport::default();

        for entry in entries {
            let payload = self.payload_for(&entry)?;
            let created = self.remote().create_event(&self.config.team.id, &payload)?;
            tracing::info!(
                "Created {:?} '{}' at {} (id {})",
                entry.kind(),
                entry.summary,
                payload.start_date_time,
                created.id
            );
            report.created.push(created);
        }

        Ok(report)
    }

    fn payload_for(&mut self, entry: &CalendarEntry) -> SportsEngineResult<EventPayload> {
        if self.config.game_payload == GamePayload::Event || entry.kind() == EventKind::Practice {
            return translate(entry, &self.config);
        }

        // Validate before touching the opponent list
        entry.validate()?;

        let description = entry.description.as_deref().unwrap_or_default();
        let Some(matchup) = Matchup::parse(description) else {
            tracing::warn!(
                "No matchup in description of '{}', creating it as an event",
                entry.summary
            );
            return translate(entry, &self.config);
        };
        let (opponent_name, is_home) = matchup
            .opponent_of(&self.config.team.name)
            .ok_or_else(|| SportsEngineError::UnknownMatchup {
                description: description.to_string(),
            })?;

        let opponent = self.resolve_opponent(opponent_name)?;
        translate_game(entry, &self.config, &opponent, is_home)
    }

    /// Look the opponent up by exact name, creating it if the platform does
    /// not know it yet.
    fn resolve_opponent(&mut self, name: &str) -> SportsEngineResult<Opponent> {
        if let Some(opponent) = self.opponents.get(name) {
            return Ok(opponent.clone());
        }

        let remote = RemoteCalendar::new(&self.session, &self.api_base);
        let team_id = &self.config.team.id;
        let opponent = match remote.find_opponent_by_name(team_id, name)? {
            Some(existing) => existing,
            None => {
                tracing::info!("Opponent '{}' not found, creating it", name);
                remote.create_opponent(team_id, name)?
            }
        };

        self.opponents.insert(name.to_string(), opponent.clone());
        Ok(opponent)
    }
}
