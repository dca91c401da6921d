//! Platform API client: opponents and calendar events, scoped to a team.

mod api;
mod types;

pub use api::{EVENTS_PER_PAGE, OPPONENTS_PER_PAGE, RemoteCalendar};
pub use types::{Opponent, RemoteEvent};
