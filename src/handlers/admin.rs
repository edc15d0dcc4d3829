use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

use super::{ListingProfiles, bad_request, catalog_error, not_found, store_error};
use crate::auth::middleware::AdminUser;
use crate::cache::CacheData;
use crate::catalog::FilterSet;
use crate::db::{categories as category_db, dashboard, products as product_db};
use crate::models::products::{CreateProduct, UpdateProduct};

/// GET /api/admin/dashboard/stats
pub async fn dashboard_stats(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match dashboard::stats(db.get_ref()).await {
        Ok(stats) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": stats,
            "lastUpdate": chrono::Utc::now(),
        })),
        Err(e) => store_error("Error fetching dashboard statistics", e),
    }
}

/// GET /api/admin/products: every product regardless of status unless filtered.
pub async fn list_products(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    profiles: web::Data<ListingProfiles>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let filters = FilterSet::normalize(&query, profiles.admin);

    match product_db::list_products(db.get_ref(), &filters).await {
        Ok(page) => HttpResponse::Ok().json(page.envelope("totalProducts")),
        Err(e) => catalog_error("Error fetching products", e),
    }
}

/// POST /api/admin/products
pub async fn create_product(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateProduct>,
) -> impl Responder {
    let input = body.into_inner();
    if let Some(problem) = input.problem() {
        return bad_request(problem);
    }

    match category_db::get_active_by_id(db.get_ref(), input.category_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return bad_request("The specified category does not exist"),
        Err(e) => return store_error("Error creating product", e),
    }

    match product_db::insert_product(db.get_ref(), input).await {
        Ok(product) => {
            cache.invalidate().await;
            tracing::info!(product_id = %product.id, admin_id = %admin.0.id, "product created");
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "data": product,
            }))
        }
        Err(e) => store_error("Error creating product", e),
    }
}

/// PUT /api/admin/products/{id}: partial update of the fields present in the body.
pub async fn update_product(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProduct>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();
    if let Some(problem) = input.problem() {
        return bad_request(problem);
    }

    if let Some(category_id) = input.category_id {
        match category_db::get_active_by_id(db.get_ref(), category_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return bad_request("The specified category does not exist"),
            Err(e) => return store_error("Error updating product", e),
        }
    }

    match product_db::update_product(db.get_ref(), id, input).await {
        Ok(Some(product)) => {
            cache.invalidate().await;
            tracing::info!(product_id = %id, admin_id = %admin.0.id, "product updated");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": product,
            }))
        }
        Ok(None) => not_found("Product not found"),
        Err(e) => store_error("Error updating product", e),
    }
}

/// DELETE /api/admin/products/{id}: soft delete.
pub async fn delete_product(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match product_db::soft_delete_product(db.get_ref(), id).await {
        Ok(true) => {
            cache.invalidate().await;
            tracing::info!(product_id = %id, admin_id = %admin.0.id, "product deactivated");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Product deleted",
            }))
        }
        Ok(false) => not_found("Product not found"),
        Err(e) => store_error("Error deleting product", e),
    }
}
