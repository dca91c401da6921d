//! Core of sportsengine-sync.
//!
//! - `form` / `auth` / `session`: emulate the browser sign-in flow and keep
//!   the resulting cookies
//! - `remote`: opponents and events on the team calendar API
//! - `entry` / `translate`: classify calendar entries and build payloads
//! - `sync`: push a sequence of entries to the team calendar

pub mod auth;
pub mod config;
pub mod entry;
pub mod error;
pub mod form;
pub mod remote;
pub mod session;
pub mod sync;
pub mod timestamp;
pub mod translate;

pub use auth::{Credential, login};
pub use config::{Endpoints, GamePayload, SyncConfig, Team};
pub use entry::{CalendarEntry, EventKind};
pub use error::{SportsEngineError, SportsEngineResult};
pub use session::{AuthenticatedSession, Session};
pub use sync::{SyncDriver, SyncReport};
