//! In-memory category catalog.
//!
//! This crate provides:
//! - A lazily loaded, load-once cache of the category list ([`CategoryStore`])
//! - Id lookup, path resolution and child listing over it ([`CategoryQuery`])
//! - An HTTP category source for the catalog API and a mock source for tests
//!
//! ## Usage
//!
//! ```ignore
//! use category_catalog::{CategoryQuery, CategoryQueryConfig, CategorySourceConfig, HttpCategorySource};
//!
//! let source = HttpCategorySource::new(CategorySourceConfig::default())?;
//! let query = CategoryQuery::new(source, &CategoryQueryConfig::default())?;
//! let category = query.resolve_by_path("shoes/running/trail").await?;
//! ```

mod client;
mod collation;
mod config;
mod error;
mod mock;
pub mod query;
mod source;
mod store;
mod types;

pub use client::HttpCategorySource;
pub use collation::{DEFAULT_COLLATION_LOCALE, NameCollator};
pub use config::{CategoryQueryConfig, CategorySourceConfig, DEFAULT_CATALOG_URL, EmptyCatalogPolicy};
pub use error::{CategorySourceError, CategoryStoreError, CollationError};
pub use mock::{MockCategorySource, MockDataError, MockResponse};
pub use query::CategoryQuery;
pub use source::{CategorySource, CategorySourceClient};
pub use store::CategoryStore;
pub use types::{Category, CategoryCollection, CategoryId};
