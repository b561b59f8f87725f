//! Category domain types.
//!
//! These mirror the records served by the catalog API. Fields the API may add
//! later are ignored on deserialization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// The cached, immutable set of categories in the order the source returned
/// them.
pub type CategoryCollection = Arc<[Category]>;

/// A node in the category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    /// `None` for root level categories.
    ///
    /// May point at an id that is not part of the collection.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Path of the category, e.g. `shoes/running`, without leading or
    /// trailing separators.
    pub url: String,
    pub name: String,
}

/// Response body of `GET /catalog/categories`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CategoryListResponse {
    pub items: Vec<Category>,
}
