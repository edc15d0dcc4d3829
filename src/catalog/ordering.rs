//! ORDER BY and LIMIT/OFFSET construction.

use sea_orm::{ColumnTrait, Order, QueryOrder};

use super::error::CatalogError;
use super::filters::{MAX_PAGE_SIZE, SortDirection, SortKey};
use crate::models::{products, users};

/// An ordered list of sort terms over one entity's columns.
///
/// Every ordering built here ends with the primary key so that rows tied on
/// the sort column keep the same relative order across requests.
#[derive(Debug, Clone)]
pub struct Ordering<C> {
    terms: Vec<(C, Order)>,
}

impl<C: ColumnTrait> Ordering<C> {
    pub fn new(terms: Vec<(C, Order)>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[(C, Order)] {
        &self.terms
    }

    /// Apply the terms to a query, in order.
    pub fn apply<Q: QueryOrder>(&self, query: Q) -> Q {
        self.terms
            .iter()
            .fold(query, |query, (column, order)| query.order_by(*column, order.clone()))
    }
}

/// Map a whitelisted sort key and direction onto product columns.
pub fn build_ordering(key: SortKey, direction: SortDirection) -> Ordering<products::Column> {
    let column = match key {
        SortKey::Name => products::Column::Name,
        SortKey::Price => products::Column::Price,
        SortKey::Rating => products::Column::AverageRating,
        SortKey::CreatedAt => products::Column::CreatedAt,
    };
    let order = match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    };
    Ordering::new(vec![(column, order), (products::Column::Id, Order::Asc)])
}

/// Featured products first, then best rated.
///
/// Category pages use this when the request names no sort key.
pub fn featured_ordering() -> Ordering<products::Column> {
    Ordering::new(vec![
        (products::Column::Featured, Order::Desc),
        (products::Column::AverageRating, Order::Desc),
        (products::Column::Id, Order::Asc),
    ])
}

/// Newest registrations first, as the admin panel lists them.
pub fn user_ordering() -> Ordering<users::Column> {
    Ordering::new(vec![
        (users::Column::CreatedAt, Order::Desc),
        (users::Column::Id, Order::Asc),
    ])
}

/// A LIMIT/OFFSET pair plus the page it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

/// `offset = (page - 1) * page_size`.
pub fn build_page(page: u64, page_size: u64) -> Result<PageWindow, CatalogError> {
    if page == 0 {
        return Err(CatalogError::invariant("page numbers start at 1"));
    }
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(CatalogError::invariant(format!(
            "page size {page_size} is outside 1..={MAX_PAGE_SIZE}"
        )));
    }
    let offset = (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| CatalogError::invariant(format!("offset overflow for page {page}")))?;

    Ok(PageWindow {
        page,
        limit: page_size,
        offset,
    })
}
