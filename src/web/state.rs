//! Shared application state and request extractors

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Redirect;
use std::convert::Infallible;

use crate::models::User;
use crate::services::{CaptchaService, Mailer, NewsService, UserService};
use crate::web::templates::Templates;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Session cookie lifetime in seconds, matching the server-side expiry
const SESSION_MAX_AGE: i64 = 7 * 24 * 60 * 60;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub news_service: Arc<NewsService>,
    pub captcha: Arc<CaptchaService>,
    pub mailer: Arc<dyn Mailer>,
    pub templates: Arc<Templates>,
}

/// Queue a session cookie on the response.
pub fn set_session_cookie(headers: &mut HeaderMap, token: &str) {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_MAX_AGE
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Expire the session cookie.
pub fn clear_session_cookie(headers: &mut HeaderMap) {
    headers.append(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    );
}

/// Extract the session token from the request cookies.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookies.split(';') {
        if let Some(token) = cookie.trim().strip_prefix("session=") {
            return Some(token.to_string());
        }
    }
    None
}

/// Extractor for pages that require a logged-in user.
///
/// Anonymous visitors are redirected to the login page.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Err(Redirect::to("/login"));
        };

        match state.user_service.validate_session(&token).await {
            Ok(Some(user)) => Ok(AuthenticatedUser(user)),
            Ok(None) => Err(Redirect::to("/login")),
            Err(err) => {
                tracing::error!(error = %err, "Session validation failed");
                Err(Redirect::to("/login"))
            }
        }
    }
}

/// Extractor for pages that render differently for logged-in users but do
/// not require one.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };
        match state.user_service.validate_session(&token).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(err) => {
                tracing::error!(error = %err, "Session validation failed");
                Ok(MaybeUser(None))
            }
        }
    }
}
