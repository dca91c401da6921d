//! Error types for sportsengine-core.

use thiserror::Error;

/// Errors that can occur while logging in, translating or syncing events.
#[derive(Error, Debug)]
pub enum SportsEngineError {
    /// No `<form>` on the page satisfied the matcher. Usually means the
    /// login page layout changed or the session was redirected somewhere
    /// unexpected.
    #[error("No matching form found on {url}")]
    FormNotFound { url: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event '{summary}' ends ({end}) before it starts ({start})")]
    InvalidTimeRange {
        summary: String,
        start: String,
        end: String,
    },

    #[error("Could not find our team in game description '{description}'")]
    UnknownMatchup { description: String },
}

/// Result type alias for sportsengine-core operations.
pub type SportsEngineResult<T> = Result<T, SportsEngineError>;
