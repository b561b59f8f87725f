//! The capability the store loads categories through.

use enum_dispatch::enum_dispatch;

use crate::client::HttpCategorySource;
use crate::error::CategorySourceError;
use crate::mock::MockCategorySource;
use crate::types::Category;

/// Fetches the complete category list.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST call to the catalog API via [`HttpCategorySource`]
/// - **Mock**: canned responses without HTTP via [`MockCategorySource`]
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait CategorySource {
    /// Fetch every category in one request, without pagination.
    async fn fetch_all_categories(&self) -> Result<Vec<Category>, CategorySourceError>;
}

/// Either a client for the actual catalog service,
/// or a mock source for testing.
#[derive(Debug)]
#[enum_dispatch(CategorySource)]
pub enum CategorySourceClient {
    Http(HttpCategorySource),
    Mock(MockCategorySource),
}
