//! Calendar entries as read from the external feed.

use chrono::{DateTime, FixedOffset};

use crate::error::{SportsEngineError, SportsEngineResult};
use crate::timestamp::to_api_string;

/// Descriptions starting with this (case-sensitive) are practices.
pub const PRACTICE_PREFIX: &str = "Practice";

/// One event from the calendar feed. Read-only input to the sync.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub summary: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Practice,
    Game,
}

impl EventKind {
    /// Practice if the description starts with "Practice", Game otherwise.
    /// A missing or empty description is a Game.
    pub fn classify(description: Option<&str>) -> Self {
        match description {
            Some(desc) if desc.starts_with(PRACTICE_PREFIX) => EventKind::Practice,
            _ => EventKind::Game,
        }
    }

    /// Prefix put in front of the summary to form the event title.
    pub fn title_prefix(&self) -> &'static str {
        match self {
            EventKind::Practice => "(Practice) ",
            EventKind::Game => "(Game) ",
        }
    }
}

impl CalendarEntry {
    pub fn kind(&self) -> EventKind {
        EventKind::classify(self.description.as_deref())
    }

    /// Reject entries that do not end after they start.
    pub fn validate(&self) -> SportsEngineResult<()> {
        if self.start < self.end {
            return Ok(());
        }
        Err(SportsEngineError::InvalidTimeRange {
            summary: self.summary.clone(),
            start: to_api_string(&self.start),
            end: to_api_string(&self.end),
        })
    }
}
