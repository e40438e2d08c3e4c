//! Captcha repository
//!
//! Stores issued challenge-response puzzles so that consumption is a single
//! database delete, atomic across concurrent submissions.

use crate::models::CaptchaChallenge;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Captcha repository trait
#[async_trait]
pub trait CaptchaRepository: Send + Sync {
    /// Persist a freshly issued challenge
    async fn create(&self, challenge: &CaptchaChallenge) -> Result<()>;

    /// Remove a challenge by token and return it if it existed.
    ///
    /// The removal happens whether or not the caller ends up accepting the
    /// answer, which is what makes challenges single-use.
    async fn take(&self, id: &str) -> Result<Option<CaptchaChallenge>>;

    /// Delete all expired challenges
    async fn delete_expired(&self) -> Result<u64>;
}

/// SQLx-based captcha repository implementation
pub struct SqlxCaptchaRepository {
    pool: SqlitePool,
}

impl SqlxCaptchaRepository {
    /// Create a new SQLx captcha repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CaptchaRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CaptchaRepository for SqlxCaptchaRepository {
    async fn create(&self, challenge: &CaptchaChallenge) -> Result<()> {
        sqlx::query(
            "INSERT INTO captcha_challenges (id, answer, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&challenge.id)
        .bind(&challenge.answer)
        .bind(challenge.expires_at)
        .bind(challenge.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert captcha challenge")?;
        Ok(())
    }

    async fn take(&self, id: &str) -> Result<Option<CaptchaChallenge>> {
        let row = sqlx::query(
            "DELETE FROM captcha_challenges WHERE id = ? RETURNING id, answer, expires_at, created_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to take captcha challenge")?;

        Ok(row.map(|row| CaptchaChallenge {
            id: row.get("id"),
            answer: row.get("answer"),
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
        }))
    }

    async fn delete_expired(&self) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM captcha_challenges WHERE expires_at <= CURRENT_TIMESTAMP")
                .execute(&self.pool)
                .await
                .context("Failed to delete expired challenges")?;
        Ok(result.rows_affected())
    }
}
