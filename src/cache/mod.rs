use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::models::categories::CategorySummary;

const CATEGORY_LIST_KEY: &str = "categories:list";

/// In-process cache for the storefront category list.
///
/// Product listings are never cached; only the category summary, which
/// changes rarely and is requested on every page load.
#[derive(Clone)]
pub struct CategoryCache {
    entries: Cache<&'static str, Arc<Vec<CategorySummary>>>,
}

impl CategoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn get(&self) -> Option<Arc<Vec<CategorySummary>>> {
        self.entries.get(CATEGORY_LIST_KEY).await
    }

    pub async fn set(&self, categories: Vec<CategorySummary>) -> Arc<Vec<CategorySummary>> {
        let value = Arc::new(categories);
        self.entries.insert(CATEGORY_LIST_KEY, value.clone()).await;
        value
    }

    /// Drop the cached list after any category or product write.
    pub async fn invalidate(&self) {
        self.entries.invalidate(CATEGORY_LIST_KEY).await;
    }
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<CategoryCache>;
