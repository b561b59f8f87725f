//! Read-only queries over the cached categories.
//!
//! Every [`CategoryQuery`] method loads the store first and then runs one of
//! the pure functions in this module over the cached collection.

use tracing::{debug, instrument};

use crate::collation::NameCollator;
use crate::config::CategoryQueryConfig;
use crate::error::{CategoryStoreError, CollationError};
use crate::source::CategorySource;
use crate::store::CategoryStore;
use crate::types::{Category, CategoryCollection, CategoryId};

const PATH_SEPARATOR: char = '/';

/// The query surface of the category catalog.
#[derive(Debug)]
pub struct CategoryQuery<S> {
    store: CategoryStore<S>,
    collator: NameCollator,
}

impl<S: CategorySource> CategoryQuery<S> {
    pub fn new(source: S, config: &CategoryQueryConfig) -> Result<Self, CollationError> {
        let collator = NameCollator::new(&config.collation_locale)?;
        Ok(Self::from_parts(
            CategoryStore::with_policy(source, config.empty_catalog),
            collator,
        ))
    }

    pub fn from_parts(store: CategoryStore<S>, collator: NameCollator) -> Self {
        Self { store, collator }
    }

    pub fn collator(&self) -> &NameCollator {
        &self.collator
    }

    /// Load the categories ahead of the first query.
    pub async fn ensure_loaded(&self) -> Result<CategoryCollection, CategoryStoreError> {
        self.store.ensure_loaded().await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CategoryStoreError> {
        let categories = self.store.ensure_loaded().await?;
        Ok(find_by_id(&categories, id).cloned())
    }

    #[instrument(skip(self))]
    pub async fn resolve_by_path(&self, path: &str) -> Result<Option<Category>, CategoryStoreError> {
        let categories = self.store.ensure_loaded().await?;
        let resolved = resolve_by_path(&categories, path);
        debug!(resolved = ?resolved.map(|c| c.category_id), "resolved path");
        Ok(resolved.cloned())
    }

    #[instrument(skip(self))]
    pub async fn children_of(
        &self,
        parent_id: Option<CategoryId>,
    ) -> Result<Vec<Category>, CategoryStoreError> {
        let categories = self.store.ensure_loaded().await?;
        Ok(children_of(&categories, parent_id, &self.collator)
            .into_iter()
            .cloned()
            .collect())
    }
}

/// The first category with the given id.
pub fn find_by_id(categories: &[Category], id: CategoryId) -> Option<&Category> {
    categories.iter().find(|category| category.category_id == id)
}

/// Whether `url` is `path` itself or one of its leading path segments.
///
/// `shoes` covers `shoes/running`, but `shoe` does not.
pub fn url_covers_path(url: &str, path: &str) -> bool {
    match path.strip_prefix(url) {
        Some(rest) => rest.is_empty() || rest.starts_with(PATH_SEPARATOR),
        None => false,
    }
}

/// The most specific category whose url covers `path`.
///
/// Among covering categories the longest url wins; of equally long urls the
/// first one in collection order is kept.
pub fn resolve_by_path<'a>(categories: &'a [Category], path: &str) -> Option<&'a Category> {
    categories
        .iter()
        .filter(|category| url_covers_path(&category.url, path))
        .fold(None, |best: Option<&'a Category>, candidate| match best {
            Some(best) if url_len(&best.url) >= url_len(&candidate.url) => Some(best),
            _ => Some(candidate),
        })
}

fn url_len(url: &str) -> usize {
    url.chars().count()
}

/// Categories with the given parent, ordered by name.
///
/// `None` selects the root categories. Equal names keep collection order.
pub fn children_of<'a>(
    categories: &'a [Category],
    parent_id: Option<CategoryId>,
    collator: &NameCollator,
) -> Vec<&'a Category> {
    let mut children = categories
        .iter()
        .filter(|category| category.parent_id == parent_id)
        .collect::<Vec<_>>();
    children.sort_by(|a, b| collator.compare(&a.name, &b.name));
    children
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::collation::DEFAULT_COLLATION_LOCALE;
    use crate::mock::MockCategorySource;

    fn category(category_id: i64, parent_id: Option<i64>, url: &str, name: &str) -> Category {
        Category {
            category_id,
            parent_id,
            url: url.to_string(),
            name: name.to_string(),
        }
    }

    fn catalog() -> Vec<Category> {
        vec![
            category(1, None, "shoes", "Обувь"),
            category(2, Some(1), "shoes/running", "Беговая"),
            category(3, None, "fruit", "Фрукты"),
            category(4, Some(3), "fruit/apples", "Яблоки"),
            category(5, Some(3), "fruit/bananas", "Бананы"),
            category(6, Some(42), "orphans", "Сироты"),
        ]
    }

    fn collator() -> NameCollator {
        NameCollator::new(DEFAULT_COLLATION_LOCALE).unwrap()
    }

    fn ids(categories: &[&Category]) -> Vec<CategoryId> {
        categories.iter().map(|c| c.category_id).collect()
    }

    #[test]
    fn find_by_id_hit_and_miss() {
        let categories = vec![
            category(1, None, "a", "A"),
            category(2, None, "b", "B"),
        ];
        assert_eq!(find_by_id(&categories, 2), Some(&categories[1]));
        assert_eq!(find_by_id(&categories, 99), None);
    }

    #[test]
    fn resolves_exact_path() {
        let categories = catalog();
        let resolved = resolve_by_path(&categories, "shoes/running").unwrap();
        assert_eq!(resolved.url, "shoes/running");
    }

    #[test]
    fn resolves_deepest_segment_prefix() {
        let categories = catalog();
        let resolved = resolve_by_path(&categories, "shoes/running/trail").unwrap();
        assert_eq!(resolved.url, "shoes/running");

        let resolved = resolve_by_path(&categories, "shoes/hiking").unwrap();
        assert_eq!(resolved.url, "shoes");
    }

    #[test]
    fn textual_prefix_is_not_a_match() {
        let categories = catalog();
        assert_eq!(resolve_by_path(&categories, "shoe"), None);
        assert_eq!(resolve_by_path(&categories, "shoesies"), None);
        assert_eq!(resolve_by_path(&categories, "unknown"), None);
    }

    #[test]
    fn resolution_is_independent_of_source_order() {
        let mut categories = catalog();
        categories.reverse();
        let resolved = resolve_by_path(&categories, "shoes/running/trail").unwrap();
        assert_eq!(resolved.category_id, 2);
    }

    #[test]
    fn equal_length_matches_keep_first() {
        // Duplicate urls are not rejected upstream.
        let categories = vec![
            category(1, None, "shoes", "Обувь"),
            category(2, None, "shoes", "Туфли"),
        ];
        let resolved = resolve_by_path(&categories, "shoes/running").unwrap();
        assert_eq!(resolved.category_id, 1);
    }

    #[test]
    fn url_length_counts_characters() {
        // Cyrillic urls take two bytes per character.
        let categories = vec![
            category(1, None, "обувь", "Обувь"),
            category(2, None, "обувь/x", "Икс"),
        ];
        let resolved = resolve_by_path(&categories, "обувь/x/y").unwrap();
        assert_eq!(resolved.category_id, 2);
    }

    #[test]
    fn children_are_filtered_and_collated() {
        let categories = catalog();
        let children = children_of(&categories, Some(3), &collator());
        assert_eq!(
            children.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Бананы", "Яблоки"]
        );
    }

    #[test]
    fn roots_are_categories_without_parent() {
        let categories = catalog();
        let roots = children_of(&categories, None, &collator());
        // Обувь < Фрукты; the orphan's parent is missing but it is not a root.
        assert_eq!(ids(&roots), vec![1, 3]);
    }

    #[test]
    fn children_of_unknown_parent_is_empty() {
        let categories = catalog();
        assert!(children_of(&categories, Some(99), &collator()).is_empty());
        assert_eq!(ids(&children_of(&categories, Some(42), &collator())), vec![6]);
    }

    #[test]
    fn children_of_does_not_reorder_source() {
        let categories = catalog();
        let before = categories.clone();
        let _ = children_of(&categories, Some(3), &collator());
        assert_eq!(categories, before);
    }

    #[tokio::test]
    async fn queries_load_once() {
        let source = MockCategorySource::new();
        source.push_categories(catalog());
        let query = CategoryQuery::new(source.clone(), &CategoryQueryConfig::default()).unwrap();

        assert_eq!(query.find_by_id(4).await.unwrap().unwrap().url, "fruit/apples");
        assert_eq!(query.find_by_id(99).await.unwrap(), None);
        assert_eq!(
            query
                .resolve_by_path("fruit/bananas/green")
                .await
                .unwrap()
                .map(|c| c.category_id),
            Some(5)
        );
        assert_eq!(query.resolve_by_path("shoe").await.unwrap(), None);
        assert_eq!(
            query
                .children_of(Some(3))
                .await
                .unwrap()
                .iter()
                .map(|c| c.category_id)
                .collect::<Vec<_>>(),
            vec![5, 4]
        );

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn queries_surface_source_failure() {
        let source = MockCategorySource::new();
        source.push_failure("offline");
        source.push_categories(catalog());
        let query = CategoryQuery::new(source.clone(), &CategoryQueryConfig::default()).unwrap();

        let res = query.find_by_id(1).await;
        assert!(matches!(res, Err(CategoryStoreError::SourceUnavailable(_))));

        // The failed load is retried by the next query.
        assert!(query.find_by_id(1).await.unwrap().is_some());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn empty_catalog_answers_with_no_results() {
        let source = MockCategorySource::new();
        source.push_categories(vec![]);
        source.push_categories(vec![]);
        source.push_categories(vec![]);
        let query = CategoryQuery::new(source.clone(), &CategoryQueryConfig::default()).unwrap();

        assert_eq!(query.find_by_id(1).await.unwrap(), None);
        assert_eq!(query.resolve_by_path("shoes").await.unwrap(), None);
        assert!(query.children_of(None).await.unwrap().is_empty());
        assert_eq!(source.calls(), 3);
    }

    fn segment() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["a", "ab", "b", "я", "яб"]).prop_map(String::from)
    }

    fn url() -> impl Strategy<Value = String> {
        prop::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("/"))
    }

    proptest! {
        #[test]
        fn resolved_category_is_the_longest_covering_url(
            urls in prop::collection::vec(url(), 0..8),
            path in url(),
        ) {
            let categories = urls
                .iter()
                .enumerate()
                .map(|(i, url)| category(i as i64, None, url, url))
                .collect::<Vec<_>>();

            match resolve_by_path(&categories, &path) {
                Some(resolved) => {
                    prop_assert!(url_covers_path(&resolved.url, &path));
                    let resolved_len = url_len(&resolved.url);
                    for other in categories.iter().filter(|c| url_covers_path(&c.url, &path)) {
                        prop_assert!(url_len(&other.url) <= resolved_len);
                    }
                },
                None => {
                    prop_assert!(categories.iter().all(|c| !url_covers_path(&c.url, &path)));
                },
            }
        }
    }
}
