//! Page-level error responses
//!
//! Handlers return `PageError`; missing resources become a rendered 404
//! page and everything else becomes a logged 500.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use once_cell::sync::Lazy;
use tera::Context as TeraContext;

use crate::services::{NewsServiceError, UserServiceError};
use crate::web::templates::Templates;

/// Error type for HTML page handlers
#[derive(Debug)]
pub enum PageError {
    /// Resource does not exist or is not visible to this visitor
    NotFound,
    /// Unexpected failure; details are logged, not shown
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        PageError::Internal(err)
    }
}

impl From<NewsServiceError> for PageError {
    fn from(err: NewsServiceError) -> Self {
        match err {
            NewsServiceError::NotFound(_) => PageError::NotFound,
            NewsServiceError::InternalError(e) => PageError::Internal(e),
            NewsServiceError::ValidationError(msg) => {
                PageError::Internal(anyhow::anyhow!("Unhandled validation error: {}", msg))
            }
        }
    }
}

impl From<UserServiceError> for PageError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InternalError(e) => PageError::Internal(e),
            other => PageError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => not_found_response(),
            PageError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Something went wrong</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    not_found_response()
}

fn not_found_response() -> Response {
    // Error rendering must not depend on request state, so the 404 page has
    // its own engine instance.
    static TEMPLATES: Lazy<Option<Templates>> = Lazy::new(|| Templates::new().ok());

    let body = TEMPLATES
        .as_ref()
        .and_then(|templates| {
            let mut context = TeraContext::new();
            context.insert("title", "Page not found");
            templates.render("not_found.html", &context).ok()
        })
        .unwrap_or_else(|| "<h1>Page not found</h1>".to_string());

    (StatusCode::NOT_FOUND, Html(body)).into_response()
}
