//! News service
//!
//! Implements business logic for articles:
//! - Creation (always as an unpublished draft pending moderation)
//! - Public listings, paginated newest-first, home and by-category
//! - Detail lookup
//!
//! Publication itself happens outside this core; the service only ever
//! writes `is_published = false`.

use crate::db::repositories::{CategoryRepository, NewsRepository};
use crate::models::{Category, CreateNewsInput, ListParams, News, PagedResult};
use anyhow::Context;
use std::sync::Arc;

/// Fixed page size for public listings
pub const NEWS_PAGE_SIZE: u32 = 4;

/// Error types for news service operations
#[derive(Debug, thiserror::Error)]
pub enum NewsServiceError {
    /// Article or category not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// News service for article management
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl NewsService {
    /// Create a new news service
    pub fn new(repo: Arc<dyn NewsRepository>, category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo, category_repo }
    }

    /// Create a new article as an unpublished draft.
    ///
    /// The category must exist; the title rule is already enforced by the
    /// form, but the service re-checks it so the invariant holds for every
    /// caller.
    pub async fn create(&self, input: CreateNewsInput) -> Result<News, NewsServiceError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(NewsServiceError::ValidationError(
                "Title is required".to_string(),
            ));
        }
        if title.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(NewsServiceError::ValidationError(
                "Title must not start with a digit".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(NewsServiceError::ValidationError(
                "Content is required".to_string(),
            ));
        }

        if self
            .category_repo
            .get_by_id(input.category_id)
            .await
            .context("Failed to check category")?
            .is_none()
        {
            return Err(NewsServiceError::NotFound(format!(
                "Category {} does not exist",
                input.category_id
            )));
        }

        let article = self
            .repo
            .create(&input)
            .await
            .context("Failed to create article")?;
        tracing::info!(article_id = article.id, "Article submitted for moderation");
        Ok(article)
    }

    /// Published articles, newest-first, at the fixed page size.
    pub async fn list_published(&self, page: u32) -> Result<PagedResult<News>, NewsServiceError> {
        let params = ListParams::new(page, NEWS_PAGE_SIZE);
        let items = self
            .repo
            .list_published(params.offset(), params.limit())
            .await
            .context("Failed to list published news")?;
        let total = self
            .repo
            .count_published()
            .await
            .context("Failed to count published news")?;
        Ok(PagedResult::new(items, total, &params))
    }

    /// Published articles in one category, plus the category itself for the
    /// page heading.
    pub async fn list_by_category(
        &self,
        category_id: i64,
        page: u32,
    ) -> Result<(Category, PagedResult<News>), NewsServiceError> {
        let category = self
            .category_repo
            .get_by_id(category_id)
            .await
            .context("Failed to load category")?
            .ok_or_else(|| {
                NewsServiceError::NotFound(format!("Category {} does not exist", category_id))
            })?;

        let params = ListParams::new(page, NEWS_PAGE_SIZE);
        let items = self
            .repo
            .list_published_by_category(category_id, params.offset(), params.limit())
            .await
            .context("Failed to list news by category")?;
        let total = self
            .repo
            .count_published_by_category(category_id)
            .await
            .context("Failed to count news by category")?;

        Ok((category, PagedResult::new(items, total, &params)))
    }

    /// Single article by id, published or not; visibility of drafts is
    /// decided by the caller.
    pub async fn get(&self, id: i64) -> Result<News, NewsServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to load article")?
            .ok_or_else(|| NewsServiceError::NotFound(format!("Article {} does not exist", id)))
    }

    /// All categories for form select controls.
    pub async fn categories(&self) -> Result<Vec<Category>, NewsServiceError> {
        Ok(self
            .category_repo
            .list()
            .await
            .context("Failed to list categories")?)
    }
}
