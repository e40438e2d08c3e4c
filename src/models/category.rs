//! Category model
//!
//! Static reference data; article listings filter by it.

use serde::{Deserialize, Serialize};

/// Category entity for grouping news articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
}
