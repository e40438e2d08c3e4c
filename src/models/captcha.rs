//! Captcha challenge model
//!
//! A challenge is issued with the contact form, stored server-side with its
//! expected answer, and consumed on first verification attempt. Replaying a
//! consumed token always fails.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored challenge-response puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaChallenge {
    /// Opaque challenge token handed to the client
    pub id: String,
    /// Expected answer
    pub answer: String,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl CaptchaChallenge {
    /// Create a new challenge with the given answer, valid for `valid_minutes`.
    pub fn new(answer: String, valid_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            answer,
            expires_at: now + Duration::minutes(valid_minutes),
            created_at: now,
        }
    }

    /// Check whether the challenge has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
