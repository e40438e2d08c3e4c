//! Session model
//!
//! DB-backed sessions keyed by an opaque uuid token, delivered to the
//! browser as an HttpOnly cookie.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session bound to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token (uuid v4)
    pub id: String,
    /// Owning user id
    pub user_id: i64,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user, valid for the given number of days.
    pub fn new(user_id: i64, valid_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(valid_days),
            created_at: now,
        }
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
