//! One-shot flash messages
//!
//! A flash survives exactly one redirect: the handler that finishes an
//! action sets a short-lived cookie, and the next page read renders it and
//! expires the cookie. The payload is `level:message` with the message
//! percent-encoded so it stays a valid cookie value.

use axum::http::{header, HeaderMap, HeaderValue};
use serde::Serialize;

const COOKIE_NAME: &str = "flash";

/// Upper bound on how long an undelivered flash lingers
const MAX_AGE_SECONDS: u32 = 60;

/// A message to display once on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    /// Display level, "success" or "error"
    pub level: String,
    /// Human-readable message
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Queue a flash for the next request via a response cookie.
pub fn set(headers: &mut HeaderMap, flash: &Flash) {
    let cookie = format!(
        "{}={}:{}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        COOKIE_NAME,
        flash.level,
        urlencoding::encode(&flash.message),
        MAX_AGE_SECONDS
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Read a pending flash from the request cookies.
pub fn read(headers: &HeaderMap) -> Option<Flash> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookies.split(';') {
        if let Some(raw) = cookie.trim().strip_prefix("flash=") {
            let (level, encoded) = raw.split_once(':')?;
            let message = urlencoding::decode(encoded).ok()?.into_owned();
            return Some(Flash {
                level: level.to_string(),
                message,
            });
        }
    }
    None
}

/// Expire the flash cookie after it has been rendered.
pub fn clear(headers: &mut HeaderMap) {
    headers.append(
        header::SET_COOKIE,
        HeaderValue::from_static("flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    );
}
