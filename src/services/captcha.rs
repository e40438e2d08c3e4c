//! Captcha service
//!
//! Issues small arithmetic puzzles and verifies submitted answers. Every
//! challenge is stored server-side with a 10-minute expiry and is consumed
//! on its first verification attempt, correct or not.

use crate::db::repositories::CaptchaRepository;
use crate::models::CaptchaChallenge;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Challenge lifetime in minutes
const CHALLENGE_VALID_MINUTES: i64 = 10;

/// A freshly issued puzzle to embed in the contact form
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    /// Opaque token to submit back with the answer
    pub token: String,
    /// Rendered question, e.g. "3 + 4"
    pub question: String,
}

/// Captcha service backed by the challenge store
pub struct CaptchaService {
    repo: Arc<dyn CaptchaRepository>,
}

impl CaptchaService {
    /// Create a new captcha service
    pub fn new(repo: Arc<dyn CaptchaRepository>) -> Self {
        Self { repo }
    }

    /// Issue a new arithmetic challenge and store its answer.
    pub async fn issue(&self) -> Result<IssuedChallenge> {
        let (a, b) = operands();
        let challenge = CaptchaChallenge::new((a + b).to_string(), CHALLENGE_VALID_MINUTES);
        self.repo
            .create(&challenge)
            .await
            .context("Failed to store challenge")?;

        Ok(IssuedChallenge {
            token: challenge.id,
            question: format!("{} + {}", a, b),
        })
    }

    /// Verify an answer against a previously issued challenge.
    ///
    /// The stored challenge is removed before the answer is compared, so a
    /// token can never be replayed: a second submission with the same token
    /// fails even if the first one was wrong. Expired challenges fail and
    /// any other expired rows are purged opportunistically.
    pub async fn verify(&self, token: &str, answer: &str) -> Result<bool> {
        self.repo
            .delete_expired()
            .await
            .context("Failed to purge expired challenges")?;

        let Some(challenge) = self
            .repo
            .take(token)
            .await
            .context("Failed to take challenge")?
        else {
            return Ok(false);
        };

        if challenge.is_expired() {
            return Ok(false);
        }

        Ok(challenge.answer == answer.trim())
    }
}

/// Operands for the puzzle, derived from the clock. Single digits keep the
/// puzzle trivial for humans.
fn operands() -> (u32, u32) {
    use std::time::{SystemTime, UNIX_EPOCH};
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let a = (seed % 9 + 1) as u32;
    let b = ((seed / 9) % 9 + 1) as u32;
    (a, b)
}
