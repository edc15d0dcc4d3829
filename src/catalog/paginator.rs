use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QuerySelect, Select};
use serde::Serialize;

use super::error::CatalogError;
use super::ordering::{Ordering, PageWindow};

/// One page of results plus the metadata the storefront needs to render
/// pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total_items: u64) -> Self {
        // An empty page past the first means the result set shrank between the
        // two statements; there is nothing further to fetch.
        let has_next = !items.is_empty()
            && window.page.saturating_mul(window.limit) < total_items;

        Self {
            items,
            current_page: window.page,
            page_size: window.limit,
            total_pages: total_items.div_ceil(window.limit),
            total_items,
            has_next,
            has_prev: window.page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

impl<T: Serialize> Page<T> {
    /// The JSON envelope returned by listing endpoints.
    ///
    /// `total_key` names the total counter, e.g. `totalProducts` or `totalUsers`.
    pub fn envelope(&self, total_key: &str) -> serde_json::Value {
        let mut pagination = serde_json::json!({
            "currentPage": self.current_page,
            "totalPages": self.total_pages,
            "hasNext": self.has_next,
            "hasPrev": self.has_prev,
        });
        pagination[total_key] = serde_json::json!(self.total_items);

        serde_json::json!({
            "success": true,
            "data": self.items,
            "pagination": pagination,
        })
    }
}

/// Runs a filtered listing as a bounded data query plus a count query.
///
/// The store client is borrowed for the lifetime of the paginator; any
/// sea-orm connection works, including pooled, mock and in-memory ones.
pub struct Paginator<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> Paginator<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// Fetch one page of `filtered`.
    ///
    /// The count runs over the same filtered select without ordering or
    /// bounds. The two statements are independent, so under concurrent writes
    /// the total may be slightly off from the page contents.
    pub async fn paginate<E, M>(
        &self,
        filtered: Select<E>,
        ordering: &Ordering<E::Column>,
        window: PageWindow,
    ) -> Result<Page<M>, CatalogError>
    where
        E: EntityTrait,
        E::Model: Sync,
        M: FromQueryResult + Send + Sync,
    {
        let items = ordering
            .apply(filtered.clone())
            .limit(window.limit)
            .offset(window.offset)
            .into_model::<M>()
            .all(self.db)
            .await?;

        let total_items = filtered.count(self.db).await?;

        tracing::debug!(
            page = window.page,
            limit = window.limit,
            returned = items.len(),
            total = total_items,
            "catalog page fetched"
        );

        Ok(Page::new(items, window, total_items))
    }
}
