//! HTTP category source for the catalog API.

use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use tracing::{debug, instrument};

use crate::config::CategorySourceConfig;
use crate::error::CategorySourceError;
use crate::source::CategorySource;
use crate::types::{Category, CategoryListResponse};

const CATEGORIES_PATH: &str = "catalog/categories";

/// Fetches categories from `{catalog_url}/catalog/categories`.
///
/// Retries, authentication and timeouts beyond the client defaults are
/// left to whatever sits in front of the catalog API.
pub struct HttpCategorySource {
    client: reqwest::Client,
    config: CategorySourceConfig,
}

impl Debug for HttpCategorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCategorySource")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl HttpCategorySource {
    /// Create a new category source from configuration.
    pub fn new(config: CategorySourceConfig) -> Result<Self, CategorySourceError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.config.catalog_url
    }

    fn categories_url(&self) -> String {
        format!(
            "{}/{CATEGORIES_PATH}",
            self.config.catalog_url.trim_end_matches('/')
        )
    }
}

impl CategorySource for HttpCategorySource {
    #[instrument(skip_all, fields(catalog_url = %self.config.catalog_url))]
    async fn fetch_all_categories(&self) -> Result<Vec<Category>, CategorySourceError> {
        let url = self.categories_url();
        debug!(%url, "requesting all categories");

        // `limit=0` asks the API for the complete, unpaginated list.
        let response = self
            .client
            .get(&url)
            .query(&[("limit", "0")])
            .send()
            .await
            .map_err(CategorySourceError::Request)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "category request failed");
            return Err(CategorySourceError::Status(status));
        }

        let body = response.bytes().await.map_err(CategorySourceError::Request)?;
        let list: CategoryListResponse =
            serde_json::from_slice(&body).map_err(CategorySourceError::Decode)?;

        debug!(n_categories = list.items.len(), "received categories");
        Ok(list.items)
    }
}

/// Build the HTTP client with the configured default headers.
fn build_http_client(config: &CategorySourceConfig) -> Result<reqwest::Client, CategorySourceError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CategorySourceError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CategorySourceError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        "building category HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60));

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CategorySourceError::Other(e.to_string()))
}
