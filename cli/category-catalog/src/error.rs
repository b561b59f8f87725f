//! Error handling for category loading and querying.

use std::str::FromStr;
use std::sync::Arc;

use icu::locale::Locale;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by a [`CategorySource`](crate::CategorySource) while
/// fetching the category list.
#[derive(Debug, Error)]
pub enum CategorySourceError {
    #[error("failed to send category request")]
    Request(#[source] reqwest::Error),
    #[error("catalog responded with {0}")]
    Status(StatusCode),
    #[error("failed to decode category list")]
    Decode(#[source] serde_json::Error),
    #[error("mock source: {0}")]
    Mock(String),
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by [`CategoryStore`](crate::CategoryStore) and, through it,
/// by every query.
///
/// The source error is shared so that callers waiting on the same fetch all
/// observe the same failure.
#[derive(Debug, Clone, Error)]
pub enum CategoryStoreError {
    #[error("category source unavailable")]
    SourceUnavailable(#[source] Arc<CategorySourceError>),
}

impl From<CategorySourceError> for CategoryStoreError {
    fn from(err: CategorySourceError) -> Self {
        CategoryStoreError::SourceUnavailable(Arc::new(err))
    }
}

/// The configured collation locale can not be used to order category names.
#[derive(Debug, Error)]
pub enum CollationError {
    #[error("invalid collation locale '{locale}'")]
    InvalidLocale {
        locale: String,
        #[source]
        source: <Locale as FromStr>::Err,
    },
    #[error("no collation data for locale '{locale}'")]
    MissingData {
        locale: String,
        #[source]
        source: icu_provider::DataError,
    },
}
