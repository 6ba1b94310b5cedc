use crate::core::{WineRecord, WineSource};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const DEFAULT_CATEGORIES: [&str; 3] = ["reds", "whites", "sparkling"];
pub const DEFAULT_PER_CATEGORY_LIMIT: usize = 5;

/// Merges the first few records of each category into one browsable list.
///
/// The merged list is fetched once and kept for the life of the aggregator.
/// A failure in any category empties the whole list, and that empty outcome is
/// cached as well.
pub struct CatalogAggregator {
    source: Arc<dyn WineSource>,
    categories: Vec<String>,
    per_category_limit: usize,
    cache: OnceCell<Vec<WineRecord>>,
}

impl CatalogAggregator {
    pub fn new(source: Arc<dyn WineSource>) -> Self {
        Self::with_categories(
            source,
            DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            DEFAULT_PER_CATEGORY_LIMIT,
        )
    }

    pub fn with_categories(
        source: Arc<dyn WineSource>,
        categories: Vec<String>,
        per_category_limit: usize,
    ) -> Self {
        Self {
            source,
            categories,
            per_category_limit,
            cache: OnceCell::new(),
        }
    }

    pub async fn fetch_wines(&self) -> &[WineRecord] {
        self.cache.get_or_init(|| self.load()).await
    }

    pub fn is_cached(&self) -> bool {
        self.cache.initialized()
    }

    async fn load(&self) -> Vec<WineRecord> {
        let mut wines = Vec::with_capacity(self.categories.len() * self.per_category_limit);

        for category in &self.categories {
            match self.source.fetch_category(category, self.per_category_limit).await {
                Ok(records) => {
                    tracing::debug!(
                        "Fetched {} records for category '{}'",
                        records.len(),
                        category
                    );
                    wines.extend(records.into_iter().take(self.per_category_limit));
                }
                Err(e) => {
                    tracing::warn!(
                        "Catalog category '{}' failed, discarding the whole catalog: {}",
                        category,
                        e
                    );
                    return Vec::new();
                }
            }
        }

        tracing::info!("Catalog loaded with {} wines", wines.len());
        wines
    }
}

/// Keeps records whose name contains `term` (case-insensitive), paired with
/// their index in the merged list.
pub fn filter_wines<'a>(wines: &'a [WineRecord], term: &str) -> Vec<(usize, &'a WineRecord)> {
    wines
        .iter()
        .enumerate()
        .filter(|(_, wine)| wine.matches_search(term))
        .collect()
}
