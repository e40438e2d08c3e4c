//! News repository
//!
//! Database operations for news articles.
//!
//! This module provides:
//! - `NewsRepository` trait defining the interface for article data access
//! - `SqlxNewsRepository` implementing the trait for SQLite
//!
//! Public listings only ever see published rows; drafts stay hidden until a
//! moderator flips `is_published`.

use crate::models::{CreateNewsInput, News};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Create a new article (always unpublished)
    async fn create(&self, input: &CreateNewsInput) -> Result<News>;

    /// Get an article by ID, published or not
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// List published articles newest-first with pagination
    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<News>>;

    /// Count published articles
    async fn count_published(&self) -> Result<i64>;

    /// List published articles in a category newest-first with pagination
    async fn list_published_by_category(
        &self,
        category_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<News>>;

    /// Count published articles in a category
    async fn count_published_by_category(&self, category_id: i64) -> Result<i64>;

    /// Flip the published flag (used by moderation tooling and tests)
    async fn set_published(&self, id: i64, published: bool) -> Result<()>;

    /// Count all articles, drafts included
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: SqlitePool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

fn row_to_news(row: &sqlx::sqlite::SqliteRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        category_id: row.get("category_id"),
        author_id: row.get("author_id"),
        is_published: row.get::<i64, _>("is_published") != 0,
        created_at: row.get("created_at"),
    }
}

const NEWS_COLUMNS: &str = "id, title, content, category_id, author_id, is_published, created_at";

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn create(&self, input: &CreateNewsInput) -> Result<News> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO news (title, content, category_id, author_id, is_published, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.category_id)
        .bind(input.author_id)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert news article")?;

        Ok(News {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            content: input.content.clone(),
            category_id: input.category_id,
            author_id: input.author_id,
            is_published: false,
            created_at,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        let row = sqlx::query(&format!("SELECT {} FROM news WHERE id = ?", NEWS_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query news article")?;

        Ok(row.map(|row| row_to_news(&row)))
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<News>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM news
            WHERE is_published = 1
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            NEWS_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list published news")?;

        Ok(rows.iter().map(row_to_news).collect())
    }

    async fn count_published(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news WHERE is_published = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count published news")?;
        Ok(count)
    }

    async fn list_published_by_category(
        &self,
        category_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<News>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM news
            WHERE is_published = 1 AND category_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            NEWS_COLUMNS
        ))
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list published news by category")?;

        Ok(rows.iter().map(row_to_news).collect())
    }

    async fn count_published_by_category(&self, category_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM news WHERE is_published = 1 AND category_id = ?",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count published news by category")?;
        Ok(count)
    }

    async fn set_published(&self, id: i64, published: bool) -> Result<()> {
        sqlx::query("UPDATE news SET is_published = ? WHERE id = ?")
            .bind(if published { 1 } else { 0 })
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update published flag")?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count news")?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;

    async fn setup() -> (SqlxNewsRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new(
                "reporter".to_string(),
                "reporter@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("Failed to create user");

        (SqlxNewsRepository::new(pool), user.id)
    }

    fn input(title: &str, category_id: i64, author_id: i64) -> CreateNewsInput {
        CreateNewsInput {
            title: title.to_string(),
            content: "body".to_string(),
            category_id,
            author_id,
        }
    }

    #[tokio::test]
    async fn test_create_starts_unpublished() {
        let (repo, author_id) = setup().await;

        let article = repo
            .create(&input("Election recap", 1, author_id))
            .await
            .expect("create ok");
        assert!(!article.is_published);
        assert!(article.id > 0);

        let loaded = repo
            .get_by_id(article.id)
            .await
            .expect("query ok")
            .expect("article should exist");
        assert_eq!(loaded.title, "Election recap");
        assert!(!loaded.is_published);
    }

    #[tokio::test]
    async fn test_list_published_hides_drafts() {
        let (repo, author_id) = setup().await;

        let draft = repo.create(&input("Draft", 1, author_id)).await.expect("create ok");
        let public = repo.create(&input("Public", 1, author_id)).await.expect("create ok");
        repo.set_published(public.id, true).await.expect("publish ok");

        let listed = repo.list_published(0, 10).await.expect("list ok");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, public.id);
        assert_ne!(listed[0].id, draft.id);
        assert_eq!(repo.count_published().await.expect("count ok"), 1);
    }

    #[tokio::test]
    async fn test_list_published_newest_first() {
        let (repo, author_id) = setup().await;

        let older = repo.create(&input("Older", 1, author_id)).await.expect("create ok");
        let newer = repo.create(&input("Newer", 1, author_id)).await.expect("create ok");
        repo.set_published(older.id, true).await.expect("publish ok");
        repo.set_published(newer.id, true).await.expect("publish ok");

        let listed = repo.list_published(0, 10).await.expect("list ok");
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn test_list_by_category_filters_exactly() {
        let (repo, author_id) = setup().await;

        let one = repo.create(&input("Cat one", 1, author_id)).await.expect("create ok");
        let two_a = repo.create(&input("Cat two a", 2, author_id)).await.expect("create ok");
        let two_b = repo.create(&input("Cat two b", 2, author_id)).await.expect("create ok");
        for id in [one.id, two_a.id, two_b.id] {
            repo.set_published(id, true).await.expect("publish ok");
        }

        let cat_one = repo
            .list_published_by_category(1, 0, 10)
            .await
            .expect("list ok");
        assert_eq!(cat_one.len(), 1);

        let cat_two = repo
            .list_published_by_category(2, 0, 10)
            .await
            .expect("list ok");
        assert_eq!(cat_two.len(), 2);
        assert_eq!(repo.count_published_by_category(2).await.expect("count ok"), 2);
    }

    #[tokio::test]
    async fn test_pagination_limit_and_offset() {
        let (repo, author_id) = setup().await;

        for n in 0..6 {
            let article = repo
                .create(&input(&format!("Story {}", n), 1, author_id))
                .await
                .expect("create ok");
            repo.set_published(article.id, true).await.expect("publish ok");
        }

        let page_one = repo.list_published(0, 4).await.expect("list ok");
        assert_eq!(page_one.len(), 4);
        let page_two = repo.list_published(4, 4).await.expect("list ok");
        assert_eq!(page_two.len(), 2);
    }
}
