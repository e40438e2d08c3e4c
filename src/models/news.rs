//! News article model
//!
//! This module provides:
//! - `News` entity representing a news article
//! - Input type for creating articles
//! - Pagination types for list queries
//!
//! Articles start unpublished and become visible in public listings only
//! once a moderator flips the published flag. There is no reverse
//! transition and no deletion path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// Article body
    pub content: String,
    /// Category ID
    pub category_id: i64,
    /// Author user ID
    pub author_id: i64,
    /// Whether the article passed moderation
    pub is_published: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new article.
///
/// Articles are always created unpublished (pending moderation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsInput {
    /// Article title
    pub title: String,
    /// Article body
    pub content: String,
    /// Category ID
    pub category_id: i64,
    /// Author user ID
    pub author_id: i64,
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: 1, per_page: 4 }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for database queries.
    ///
    /// Computed in i64 so an absurd page number from the query string stays
    /// a harmless out-of-range offset instead of overflowing.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.per_page)
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        ((self.total as u32) + self.per_page - 1) / self.per_page
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_offset() {
        assert_eq!(ListParams::new(1, 4).offset(), 0);
        assert_eq!(ListParams::new(2, 4).offset(), 4);
        assert_eq!(ListParams::new(3, 4).offset(), 8);
    }

    #[test]
    fn test_list_params_offset_huge_page() {
        let params = ListParams::new(4_000_000_000, 4);
        assert_eq!(params.offset(), 15_999_999_996);
        assert_eq!(ListParams::new(u32::MAX, 100).offset(), (u32::MAX as i64 - 1) * 100);
    }

    #[test]
    fn test_list_params_clamps() {
        let params = ListParams::new(0, 0);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);
    }

    #[test]
    fn test_paged_result_total_pages() {
        let params = ListParams::new(1, 4);
        let result: PagedResult<i32> = PagedResult::new(vec![1, 2, 3, 4], 9, &params);
        assert_eq!(result.total_pages(), 3);
        assert!(result.has_next());
        assert!(!result.has_prev());
    }

    #[test]
    fn test_paged_result_last_page() {
        let params = ListParams::new(3, 4);
        let result: PagedResult<i32> = PagedResult::new(vec![9], 9, &params);
        assert!(!result.has_next());
        assert!(result.has_prev());
    }
}
