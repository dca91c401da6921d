//! Username/password login through the platform's two-page sign-in form.
//!
//! There is no API-key auth, so we do what a browser does:
//! 1. GET the sign-in page, fill in the username, POST the form
//! 2. On the page we land on, fill in the password, POST that form
//!
//! Every other field (CSRF tokens, state) is taken from the forms as served.
//! Success means no step failed; whether the cookies really grant access only
//! shows on the first API call.

use std::fmt;

use url::Url;

use crate::error::SportsEngineResult;
use crate::form::any_form;
use crate::session::{AuthenticatedSession, Session};

pub const LOGIN_FIELD: &str = "user[login]";
pub const PASSWORD_FIELD: &str = "user[password]";

/// Platform login credentials. Never persisted by this crate.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Log in and return the session carrying the resulting cookies.
pub fn login(
    session: Session,
    login_url: &Url,
    credential: &Credential,
) -> SportsEngineResult<AuthenticatedSession> {
    tracing::info!("Logging in as {}", credential.username);

    let sign_in = session.fetch_page(login_url)?;
    let password_page =
        session.submit_form(&sign_in, any_form, &[(LOGIN_FIELD, credential.username.as_str())])?;
    session.submit_form(
        &password_page,
        any_form,
        &[(PASSWORD_FIELD, credential.password.as_str())],
    )?;

    Ok(AuthenticatedSession::new(session))
}
