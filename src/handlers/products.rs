use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

use super::{ListingProfiles, bad_request, catalog_error, not_found, store_error};
use crate::catalog::{FilterSet, build_ordering, featured_ordering};
use crate::db::products as product_db;

/// Page size used by the search route when `limit` is not given.
const SEARCH_PAGE_SIZE: u64 = 20;

/// GET /api/products: storefront listing with filters, sorting and pagination.
pub async fn list_products(
    db: web::Data<DatabaseConnection>,
    profiles: web::Data<ListingProfiles>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let filters = FilterSet::normalize(&query, profiles.storefront);

    match product_db::list_products(db.get_ref(), &filters).await {
        Ok(page) => HttpResponse::Ok().json(page.envelope("totalProducts")),
        Err(e) => catalog_error("Error fetching products", e),
    }
}

/// GET /api/products/{id}: one active product with its category name and
/// latest reviews.
pub async fn get_product(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match product_db::get_product_detail(db.get_ref(), path.into_inner()).await {
        Ok(Some(product)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": product,
        })),
        Ok(None) => not_found("Product not found"),
        Err(e) => store_error("Error fetching product", e),
    }
}

/// GET /api/products/category/{name}: storefront listing pinned to a category.
///
/// Without `sortBy`, featured and best-rated products come first.
pub async fn products_by_category(
    db: web::Data<DatabaseConnection>,
    profiles: web::Data<ListingProfiles>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let name = path.into_inner();
    let Some(filters) = FilterSet::normalize(&query, profiles.storefront).with_category(&name)
    else {
        return not_found("Category not found");
    };
    let ordering = if filters.sort_requested() {
        build_ordering(filters.sort_key(), filters.sort_direction())
    } else {
        featured_ordering()
    };

    match product_db::list_products_ordered(db.get_ref(), &filters, &ordering).await {
        Ok(page) => {
            let mut body = page.envelope("totalProducts");
            body["category"] = serde_json::json!(filters.category_name());
            HttpResponse::Ok().json(body)
        }
        Err(e) => catalog_error("Error fetching products by category", e),
    }
}

/// GET /api/products/search/{term}: storefront listing pinned to a search term.
pub async fn search_products(
    db: web::Data<DatabaseConnection>,
    profiles: web::Data<ListingProfiles>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let profile = profiles.storefront.with_default_page_size(SEARCH_PAGE_SIZE);
    let Some(filters) = FilterSet::normalize(&query, profile).with_search(&path) else {
        return bad_request("Search term must not be empty");
    };

    match product_db::list_products(db.get_ref(), &filters).await {
        Ok(page) => {
            let mut body = page.envelope("totalProducts");
            body["searchTerm"] = serde_json::json!(filters.search_term());
            body["resultsCount"] = serde_json::json!(page.items.len());
            HttpResponse::Ok().json(body)
        }
        Err(e) => catalog_error("Error searching products", e),
    }
}
