//! HTTP session state.
//!
//! A [`Session`] is a cookie-carrying HTTP client that has not logged in
//! yet. Logging in (see [`crate::auth::login`]) consumes it and hands back
//! an [`AuthenticatedSession`], the only thing the platform API accepts.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::redirect::Policy;
use scraper::ElementRef;
use url::Url;

use crate::error::{SportsEngineError, SportsEngineResult};
use crate::form;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 10;
const USER_AGENT: &str = concat!("sportsengine-sync/", env!("CARGO_PKG_VERSION"));

/// An HTML page together with the URL it was finally served from
/// (after redirects).
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Anonymous session with its own cookie jar.
#[derive(Debug)]
pub struct Session {
    http: Client,
}

impl Session {
    pub fn new() -> SportsEngineResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Session { http })
    }

    /// GET a page, failing on non-2xx.
    pub fn fetch_page(&self, url: &Url) -> SportsEngineResult<Page> {
        tracing::info!("Fetching URL {}", url);
        let response = check_status(self.http.get(url.clone()).send()?)?;
        into_page(response)
    }

    /// Find a form on `page`, apply `overrides` on top of its defaults and
    /// POST it to the form's action. Cookies set so far go along.
    pub fn submit_form<F>(
        &self,
        page: &Page,
        matcher: F,
        overrides: &[(&str, &str)],
    ) -> SportsEngineResult<Page>
    where
        F: Fn(&ElementRef<'_>) -> bool,
    {
        let mut form = form::extract(&page.body, &page.url, matcher)?;
        for (name, value) in overrides {
            form.fields.insert(*name, *value);
        }

        // Values stay out of the log: they include the password
        tracing::debug!(
            fields = ?form.fields.names().collect::<Vec<_>>(),
            "Form data"
        );
        tracing::info!("Posting form to URL {}", form.action);

        let response = self
            .http
            .post(form.action.clone())
            .form(form.fields.as_pairs())
            .send()?;

        into_page(check_status(response)?)
    }
}

/// A session whose cookies carry a completed login.
#[derive(Debug)]
pub struct AuthenticatedSession {
    http: Client,
}

impl AuthenticatedSession {
    pub(crate) fn new(session: Session) -> Self {
        AuthenticatedSession { http: session.http }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Skip the login flow; for talking to mock servers.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        AuthenticatedSession::new(Session::new().unwrap())
    }
}

/// Turn non-2xx responses into [`SportsEngineError::Http`], keeping the
/// body for diagnostics.
pub(crate) fn check_status(response: Response) -> SportsEngineResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().unwrap_or_default();
    Err(SportsEngineError::Http {
        status: status.as_u16(),
        url,
        body,
    })
}

fn into_page(response: Response) -> SportsEngineResult<Page> {
    let url = response.url().clone();
    let body = response.text()?;
    Ok(Page { url, body })
}
