//! Canned category source for tests and offline use.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::CategorySourceError;
use crate::source::CategorySource;
use crate::types::Category;

// Arc allows you to push things into the source from outside if necessary
// Mutex allows you to share across threads (necessary because of tokio)
type MockField<T> = Arc<Mutex<T>>;

/// One queued answer of a [`MockCategorySource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MockResponse {
    Categories(Vec<Category>),
    Failure { error: String },
}

#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("failed to read mock response file")]
    ReadMockFile(#[source] std::io::Error),
    #[error("failed to parse mock data as JSON")]
    ParseJson(#[source] serde_json::Error),
}

/// Answers fetches from a queue of [`MockResponse`]s and counts them.
///
/// Clones share the queue and the counter.
#[derive(Debug, Clone, Default)]
pub struct MockCategorySource {
    pub mock_responses: MockField<VecDeque<MockResponse>>,
    calls: Arc<AtomicUsize>,
}

impl MockCategorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source that answers with the responses stored in a JSON
    /// array at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MockDataError> {
        let contents = std::fs::read_to_string(path).map_err(MockDataError::ReadMockFile)?;
        let responses: VecDeque<MockResponse> =
            serde_json::from_str(&contents).map_err(MockDataError::ParseJson)?;
        debug!(n_responses = responses.len(), "loaded mock category responses");
        Ok(Self {
            mock_responses: Arc::new(Mutex::new(responses)),
            ..Default::default()
        })
    }

    /// Push a new response into the list of mock responses
    pub fn push_categories(&self, categories: Vec<Category>) {
        self.push_response(MockResponse::Categories(categories));
    }

    /// Push a failing response into the list of mock responses
    pub fn push_failure(&self, error: impl Into<String>) {
        self.push_response(MockResponse::Failure {
            error: error.into(),
        });
    }

    fn push_response(&self, response: MockResponse) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }

    /// Number of fetches answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CategorySource for MockCategorySource {
    async fn fetch_all_categories(&self) -> Result<Vec<Category>, CategorySourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Suspend once so concurrent callers actually overlap with the fetch.
        tokio::task::yield_now().await;

        let mock_resp = self
            .mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front();
        match mock_resp {
            Some(MockResponse::Categories(categories)) => Ok(categories),
            Some(MockResponse::Failure { error }) => Err(CategorySourceError::Mock(error)),
            None => Err(CategorySourceError::Mock(
                "no mock responses left".to_string(),
            )),
        }
    }
}
