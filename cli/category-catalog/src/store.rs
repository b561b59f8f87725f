//! Lazily loaded category cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, instrument, trace, warn};

use crate::config::EmptyCatalogPolicy;
use crate::error::{CategorySourceError, CategoryStoreError};
use crate::source::CategorySource;
use crate::types::CategoryCollection;

#[derive(Debug, Default)]
enum LoadState {
    #[default]
    Unloaded,
    Loaded(CategoryCollection),
}

#[derive(Debug, Default)]
struct Cache {
    state: LoadState,
    /// Outcome of the most recent fetch, handed to callers that queued behind it.
    last_outcome: Option<Result<CategoryCollection, Arc<CategorySourceError>>>,
}

/// Owns the cached categories and loads them from `S` at most once per
/// successful fetch.
///
/// The cache lock is held for the duration of a fetch, so concurrent callers
/// queue up behind it and then share its outcome.
#[derive(Debug)]
pub struct CategoryStore<S> {
    source: S,
    empty_catalog: EmptyCatalogPolicy,
    cache: Mutex<Cache>,
    /// Number of fetches that have settled, successful or not.
    settled_fetches: AtomicU64,
    /// Mirrors whether `cache.state` would be served without fetching.
    loaded: AtomicBool,
}

impl<S: CategorySource> CategoryStore<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, EmptyCatalogPolicy::default())
    }

    pub fn with_policy(source: S, empty_catalog: EmptyCatalogPolicy) -> Self {
        Self {
            source,
            empty_catalog,
            cache: Mutex::new(Cache::default()),
            settled_fetches: AtomicU64::new(0),
            loaded: AtomicBool::new(false),
        }
    }

    /// Whether a later [`Self::ensure_loaded`] would be served from the cache.
    ///
    /// Does not wait for a fetch in progress; it reports the state before it.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Return the cached categories, fetching them first if necessary.
    ///
    /// A failed fetch leaves the store unloaded so the next call tries again.
    /// Callers that waited on a fetch get its outcome, even an empty one.
    #[instrument(skip_all)]
    pub async fn ensure_loaded(&self) -> Result<CategoryCollection, CategoryStoreError> {
        let seen_fetches = self.settled_fetches.load(Ordering::Acquire);
        let mut cache = self.cache.lock().await;

        if let Some(categories) = self.cached(&cache.state) {
            trace!(n_categories = categories.len(), "serving categories from cache");
            return Ok(categories);
        }

        // A fetch settled while we were waiting for the lock.
        if self.settled_fetches.load(Ordering::Acquire) != seen_fetches {
            if let Some(outcome) = &cache.last_outcome {
                debug!("sharing outcome of concurrent category fetch");
                return outcome
                    .clone()
                    .map_err(CategoryStoreError::SourceUnavailable);
            }
        }

        debug!("fetching categories");
        let fetched = self.source.fetch_all_categories().await;

        let outcome = match fetched {
            Ok(categories) => {
                if categories.is_empty() {
                    warn!(policy = ?self.empty_catalog, "category source returned no categories");
                }
                debug!(n_categories = categories.len(), "categories loaded");
                let categories: CategoryCollection = categories.into();
                cache.state = LoadState::Loaded(Arc::clone(&categories));
                Ok(categories)
            },
            Err(err) => {
                debug!(error = %err, "failed to fetch categories");
                cache.state = LoadState::Unloaded;
                Err(Arc::new(err))
            },
        };
        cache.last_outcome = Some(outcome.clone());
        self.loaded
            .store(self.cached(&cache.state).is_some(), Ordering::Release);
        self.settled_fetches.fetch_add(1, Ordering::AcqRel);

        outcome.map_err(CategoryStoreError::SourceUnavailable)
    }

    fn cached(&self, state: &LoadState) -> Option<CategoryCollection> {
        match state {
            LoadState::Loaded(categories)
                if !categories.is_empty() || self.empty_catalog == EmptyCatalogPolicy::Keep =>
            {
                Some(Arc::clone(categories))
            },
            _ => None,
        }
    }
}
