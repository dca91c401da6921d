//! Records returned by the platform API.

use serde::{Deserialize, Deserializer};

/// An opponent as known to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Opponent {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

/// A calendar event (or game) as stored on the platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteEvent {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub start_date_time: Option<String>,
    #[serde(default)]
    pub end_date_time: Option<String>,
}

/// Responses usually wrap the payload in `{"result": ...}`; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { result: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { result } => result,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Ids come back as numbers on some endpoints and strings on others.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}
