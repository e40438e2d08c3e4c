//! News submission form

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::FieldErrors;

/// Titles starting with a digit are rejected at submission time.
static LEADING_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d").expect("valid leading-digit regex"));

/// Raw news submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: i64,
}

impl NewsForm {
    /// Validate the submission shape. Category existence is checked by the
    /// news service against the database.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        } else if LEADING_DIGIT_RE.is_match(title) {
            errors.add("title", "Title must not start with a digit");
        }

        if self.content.trim().is_empty() {
            errors.add("content", "Content is required");
        }

        if self.category_id <= 0 {
            errors.add("category_id", "Choose a category");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
