use chrono::{DateTime, FixedOffset};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{Envelope, Opponent, RemoteEvent};
use crate::error::SportsEngineResult;
use crate::session::{AuthenticatedSession, check_status};
use crate::timestamp::to_api_string;
use crate::translate::EventPayload;

pub const OPPONENTS_PER_PAGE: u32 = 100;
pub const EVENTS_PER_PAGE: u32 = 200;

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Request builders for the team calendar API.
///
/// Holds nothing but borrowed state; every call goes out on the
/// authenticated session's cookies.
pub struct RemoteCalendar<'a> {
    session: &'a AuthenticatedSession,
    api_base: &'a Url,
}

impl<'a> RemoteCalendar<'a> {
    pub fn new(session: &'a AuthenticatedSession, api_base: &'a Url) -> Self {
        RemoteCalendar { session, api_base }
    }

    /// First page of the team's opponents.
    pub fn list_opponents(&self, team_id: &str) -> SportsEngineResult<Vec<Opponent>> {
        let mut url = self.endpoint(&["teams", team_id, "opponents"])?;
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("per_page", &OPPONENTS_PER_PAGE.to_string());

        tracing::info!("list_opponents: {}", url);
        self.get_json(url)
    }

    /// The opponent whose name is exactly `name`, if any. No case folding,
    /// no partial matches.
    pub fn find_opponent_by_name(
        &self,
        team_id: &str,
        name: &str,
    ) -> SportsEngineResult<Option<Opponent>> {
        Ok(self
            .list_opponents(team_id)?
            .into_iter()
            .find(|opponent| opponent.name == name))
    }

    /// Create an opponent. Does not check for an existing one with the same
    /// name; use [`Self::find_opponent_by_name`] first.
    pub fn create_opponent(&self, team_id: &str, name: &str) -> SportsEngineResult<Opponent> {
        let url = self.endpoint(&["teams", team_id, "opponents"])?;

        tracing::info!("create_opponent: {} ({})", url, name);
        let response = self
            .session
            .http()
            .post(url)
            .form(&[("name", name)])
            .send()?;

        Ok(check_status(response)?.json::<Envelope<Opponent>>()?.into_inner())
    }

    /// Team events between `start` and `end`, ordered by start date.
    pub fn list_events(
        &self,
        team_id: &str,
        start: &DateTime<FixedOffset>,
        end: &DateTime<FixedOffset>,
    ) -> SportsEngineResult<Vec<RemoteEvent>> {
        let mut url = self.endpoint(&["calendar", "team", team_id])?;
        url.query_pairs_mut()
            .append_pair("end_date", &to_api_string(end))
            .append_pair("order_by", "start_date")
            .append_pair("page", "1")
            .append_pair("per_page", &EVENTS_PER_PAGE.to_string())
            .append_pair("show_event_attendees", "1")
            .append_pair("start_date", &to_api_string(start));

        tracing::info!("list_events: {}", url);
        self.get_json(url)
    }

    /// Create an event or game on the team calendar.
    pub fn create_event(
        &self,
        team_id: &str,
        payload: &EventPayload,
    ) -> SportsEngineResult<RemoteEvent> {
        let url = self.endpoint(&["calendar", "team", team_id, "event"])?;
        let body = serde_json::to_string(payload)?;

        tracing::info!("add_event: {}", url);
        tracing::debug!("add_event data: {}", body);
        let response = self
            .session
            .http()
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()?;

        Ok(check_status(response)?.json::<Envelope<RemoteEvent>>()?.into_inner())
    }

    fn endpoint(&self, segments: &[&str]) -> SportsEngineResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> SportsEngineResult<T> {
        let response = self.session.http().get(url).send()?;
        Ok(check_status(response)?.json::<Envelope<T>>()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SyncConfig, Team};
    use crate::entry::CalendarEntry;
    use crate::error::SportsEngineError;
    use crate::translate::translate;
    use mockito::Matcher;

    const OPPONENTS: &str = r#"{
        "metadata": {"pagination": {"current_page": 1, "total": 3}},
        "result": [
            {"id": 11, "name": "tigers 12u"},
            {"id": 12, "name": "Tigers 12U Blue"},
            {"id": 13, "name": "Tigers 12U"}
        ]
    }"#;

    fn api_base(server: &mockito::Server) -> Url {
        Url::parse(&format!("{}/v3", server.url())).unwrap()
    }

    #[test]
    fn test_list_opponents_requests_first_page() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v3/teams/42/opponents")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(OPPONENTS)
            .create();

        let session = AuthenticatedSession::for_tests();
        let base = api_base(&server);
        let opponents = RemoteCalendar::new(&session, &base).list_opponents("42").unwrap();

        mock.assert();
        assert_eq!(opponents.len(), 3);
        assert_eq!(opponents[0].id, "11");
    }

    #[test]
    fn test_find_opponent_by_exact_name_only() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/v3/teams/42/opponents")
            .match_query(Matcher::Any)
            .with_body(OPPONENTS)
            .expect(3)
            .create();

        let session = AuthenticatedSession::for_tests();
        let base = api_base(&server);
        let remote = RemoteCalendar::new(&session, &base);

        let found = remote.find_opponent_by_name("42", "Tigers 12U").unwrap();
        assert_eq!(
            found,
            Some(Opponent {
                id: "13".to_string(),
                name: "Tigers 12U".to_string()
            })
        );

        // Case-insensitive and partial matches do not count
        assert_eq!(remote.find_opponent_by_name("42", "TIGERS 12U").unwrap(), None);
        assert_eq!(remote.find_opponent_by_name("42", "Tigers").unwrap(), None);
    }

    #[test]
    fn test_create_opponent_posts_name() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v3/teams/42/opponents")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded("name".into(), "Bears & Co".into()))
            .with_status(201)
            .with_body(r#"{"result": {"id": 77, "name": "Bears & Co"}}"#)
            .create();

        let session = AuthenticatedSession::for_tests();
        let base = api_base(&server);
        let opponent = RemoteCalendar::new(&session, &base)
            .create_opponent("42", "Bears & Co")
            .unwrap();

        mock.assert();
        assert_eq!(opponent.id, "77");
        assert_eq!(opponent.name, "Bears & Co");
    }

    #[test]
    fn test_list_events_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v3/calendar/team/42")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2023-10-01T00:00:00-07:00".into()),
                Matcher::UrlEncoded("end_date".into(), "2023-10-31T23:59:59-07:00".into()),
                Matcher::UrlEncoded("order_by".into(), "start_date".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "200".into()),
                Matcher::UrlEncoded("show_event_attendees".into(), "1".into()),
            ]))
            .with_body(
                r#"{"result": [
                    {"id": 1, "title": "(Practice) A", "event_type": "event",
                     "start_date_time": "2023-10-03T18:00:00-07:00",
                     "end_date_time": "2023-10-03T19:00:00-07:00"}
                ]}"#,
            )
            .create();

        let session = AuthenticatedSession::for_tests();
        let base = api_base(&server);
        let start = DateTime::parse_from_rfc3339("2023-10-01T00:00:00-07:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2023-10-31T23:59:59-07:00").unwrap();
        let events = RemoteCalendar::new(&session, &base)
            .list_events("42", &start, &end)
            .unwrap();

        mock.assert();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("(Practice) A"));
    }

    #[test]
    fn test_create_event_sends_json() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v3/calendar/team/42/event")
            .match_header("content-type", "application/json;charset=UTF-8")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "title": "(Practice) Lions vs Tigers",
                "event_type": "event",
                "start_date_time": "2023-10-31T18:00:00-07:00",
                "principals": [{"id": "42", "extended_attributes": {}}]
            })))
            .with_body(r#"{"result": {"id": 500, "title": "(Practice) Lions vs Tigers"}}"#)
            .create();

        let config = SyncConfig::new(
            Team {
                id: "42".to_string(),
                name: "Lions 12U".to_string(),
            },
            chrono_tz::America::Los_Angeles,
        );
        let entry = CalendarEntry {
            start: DateTime::parse_from_rfc3339("2023-10-31T18:00:00-07:00").unwrap(),
            end: DateTime::parse_from_rfc3339("2023-10-31T19:00:00-07:00").unwrap(),
            summary: "Lions vs Tigers".to_string(),
            description: Some("Practice".to_string()),
        };
        let payload = translate(&entry, &config).unwrap();

        let session = AuthenticatedSession::for_tests();
        let base = api_base(&server);
        let created = RemoteCalendar::new(&session, &base)
            .create_event("42", &payload)
            .unwrap();

        mock.assert();
        assert_eq!(created.id, "500");
    }

    #[test]
    fn test_non_2xx_is_http_error_with_body() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/v3/teams/42/opponents")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": "not authorized"}"#)
            .create();

        let session = AuthenticatedSession::for_tests();
        let base = api_base(&server);
        let err = RemoteCalendar::new(&session, &base)
            .list_opponents("42")
            .unwrap_err();

        match err {
            SportsEngineError::Http { status, body, url } => {
                assert_eq!(status, 401);
                assert!(body.contains("not authorized"));
                assert!(url.contains("/v3/teams/42/opponents"));
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let session = AuthenticatedSession::for_tests();
        let with_slash = Url::parse("https://api.example.com/v3/").unwrap();
        let without = Url::parse("https://api.example.com/v3").unwrap();

        let a = RemoteCalendar::new(&session, &with_slash)
            .endpoint(&["teams", "42", "opponents"])
            .unwrap();
        let b = RemoteCalendar::new(&session, &without)
            .endpoint(&["teams", "42", "opponents"])
            .unwrap();

        assert_eq!(a.as_str(), "https://api.example.com/v3/teams/42/opponents");
        assert_eq!(a, b);
    }
}
