//! Configuration types for category sources and queries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collation::DEFAULT_COLLATION_LOCALE;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3000/api";

/// Configuration for [`HttpCategorySource`](crate::HttpCategorySource)
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySourceConfig {
    /// Base URL of the catalog API, without the `/catalog/...` suffix.
    // Using a URL here adds an extra trailing slash,
    // so just use a String.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// Additional headers to include in requests.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for CategorySourceConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            extra_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

/// How the store treats a successful fetch that returned no categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyCatalogPolicy {
    /// An empty cache is indistinguishable from one that was never loaded,
    /// so the next call fetches again.
    #[default]
    Refetch,
    /// An empty result counts as loaded and is served from the cache.
    Keep,
}

/// Configuration for [`CategoryQuery`](crate::CategoryQuery) and the store
/// behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQueryConfig {
    /// BCP 47 locale whose collation orders category names.
    #[serde(default = "default_collation_locale")]
    pub collation_locale: String,
    #[serde(default)]
    pub empty_catalog: EmptyCatalogPolicy,
}

impl Default for CategoryQueryConfig {
    fn default() -> Self {
        Self {
            collation_locale: default_collation_locale(),
            empty_catalog: EmptyCatalogPolicy::default(),
        }
    }
}

fn default_collation_locale() -> String {
    DEFAULT_COLLATION_LOCALE.to_string()
}
