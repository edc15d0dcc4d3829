//! Catalog query building and pagination.
//!
//! Raw query parameters flow through four stages:
//! [`filters`] normalizes them into a [`FilterSet`], [`predicates`] turns that
//! into bound conditions, [`ordering`] picks the ORDER BY and LIMIT/OFFSET, and
//! [`paginator`] runs the data and count statements.

pub mod error;
pub mod filters;
pub mod ordering;
pub mod paginator;
pub mod predicates;

pub use error::CatalogError;
pub use filters::{Activity, FilterSet, ListingProfile, SortDirection, SortKey, UserFilterSet};
pub use ordering::{Ordering, PageWindow, build_ordering, build_page, featured_ordering};
pub use paginator::{Page, Paginator};
pub use predicates::{Predicate, UserPredicate, assemble, conjunction};
