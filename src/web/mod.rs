//! HTTP layer
//!
//! Server-rendered HTML pages built on axum and Tera. Handlers live in
//! per-page modules; shared state, cookies and flash handling live here
//! and in `state`/`flash`.

pub mod auth;
pub mod contact;
pub mod error;
pub mod flash;
pub mod news;
pub mod state;
pub mod templates;

pub use error::PageError;
pub use state::AppState;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use tera::Context as TeraContext;
use tower_http::trace::TraceLayer;

use crate::models::User;
use flash::Flash;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(news::home))
        .route("/category/{id}", get(news::by_category))
        .route("/news/{id}", get(news::detail))
        .route(
            "/news/add",
            get(news::add_news_page).post(news::add_news_submit),
        )
        .route(
            "/register",
            get(auth::register_page).post(auth::register_submit),
        )
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route(
            "/contact",
            get(contact::contact_page).post(contact::contact_submit),
        )
        .fallback(error::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Template context with the bits every page renders: the logged-in user
/// and a pending flash message.
pub(crate) fn base_context(user: Option<&User>, pending: Option<&Flash>) -> TeraContext {
    let mut context = TeraContext::new();
    if let Some(user) = user {
        context.insert("current_user", &user.username);
    }
    if let Some(pending) = pending {
        context.insert("flash", pending);
    }
    context
}

/// Consume a pending flash: read it from the request and queue the cookie
/// expiry on the response.
pub(crate) fn take_flash(
    request_headers: &HeaderMap,
    response_headers: &mut HeaderMap,
) -> Option<Flash> {
    let pending = flash::read(request_headers);
    if pending.is_some() {
        flash::clear(response_headers);
    }
    pending
}
