use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

use super::{ListingProfiles, bad_request, catalog_error, not_found, store_error};
use crate::auth::middleware::AdminUser;
use crate::cache::CacheData;
use crate::catalog::FilterSet;
use crate::db::categories::{self as category_db, SoftDelete};
use crate::db::products as product_db;
use crate::models::categories::{CreateCategory, UpdateCategory};

const MAX_NAME_LEN: usize = 100;

fn name_problem(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Some("Category name is required");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Some("Category name is too long");
    }
    None
}

/// GET /api/categories: active categories with their product counts.
pub async fn list_categories(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
) -> impl Responder {
    if let Some(cached) = cache.get().await {
        return HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": cached.as_ref(),
        }));
    }

    match category_db::list_with_counts(db.get_ref()).await {
        Ok(categories) => {
            let categories = cache.set(categories).await;
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": categories.as_ref(),
            }))
        }
        Err(e) => store_error("Error fetching categories", e),
    }
}

/// GET /api/categories/{id}
pub async fn get_category(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match category_db::get_active_by_id(db.get_ref(), path.into_inner()).await {
        Ok(Some(category)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": category,
        })),
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error("Error fetching category", e),
    }
}

/// GET /api/categories/name/{name}
pub async fn get_category_by_name(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> impl Responder {
    match category_db::get_active_by_name(db.get_ref(), path.trim()).await {
        Ok(Some(category)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": category,
        })),
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error("Error fetching category", e),
    }
}

/// GET /api/categories/{id}/products: paginated storefront listing of one category.
pub async fn category_products(
    db: web::Data<DatabaseConnection>,
    profiles: web::Data<ListingProfiles>,
    path: web::Path<Uuid>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let category = match category_db::get_active_by_id(db.get_ref(), path.into_inner()).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found("Category not found"),
        Err(e) => return store_error("Error fetching category", e),
    };

    let Some(filters) = FilterSet::normalize(&query, profiles.storefront).with_category(&category.name)
    else {
        return not_found("Category not found");
    };

    match product_db::list_products(db.get_ref(), &filters).await {
        Ok(page) => {
            let mut body = page.envelope("totalProducts");
            body["category"] = serde_json::json!(category);
            HttpResponse::Ok().json(body)
        }
        Err(e) => catalog_error("Error fetching category products", e),
    }
}

/// POST /api/categories: admin only.
pub async fn create_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateCategory>,
) -> impl Responder {
    let input = body.into_inner();
    if let Some(problem) = name_problem(&input.name) {
        return bad_request(problem);
    }

    match category_db::name_taken(db.get_ref(), &input.name, None).await {
        Ok(true) => return bad_request("A category with that name already exists"),
        Ok(false) => {}
        Err(e) => return store_error("Error creating category", e),
    }

    match category_db::insert_category(db.get_ref(), input).await {
        Ok(category) => {
            cache.invalidate().await;
            tracing::info!(category_id = %category.id, "category created");
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "data": category,
            }))
        }
        Err(e) => store_error("Error creating category", e),
    }
}

/// PUT /api/categories/{id}: admin only.
pub async fn update_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategory>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        if let Some(problem) = name_problem(name) {
            return bad_request(problem);
        }
        match category_db::name_taken(db.get_ref(), name, Some(id)).await {
            Ok(true) => return bad_request("A category with that name already exists"),
            Ok(false) => {}
            Err(e) => return store_error("Error updating category", e),
        }
    }

    match category_db::update_category(db.get_ref(), id, input).await {
        Ok(Some(category)) => {
            cache.invalidate().await;
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": category,
            }))
        }
        Ok(None) => not_found("Category not found"),
        Err(e) => store_error("Error updating category", e),
    }
}

/// DELETE /api/categories/{id}: admin only; soft delete.
pub async fn delete_category(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match category_db::soft_delete_category(db.get_ref(), id).await {
        Ok(SoftDelete::Deleted) => {
            cache.invalidate().await;
            tracing::info!(category_id = %id, "category deactivated");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Category deleted",
            }))
        }
        Ok(SoftDelete::NotFound) => not_found("Category not found"),
        Ok(SoftDelete::InUse(count)) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Cannot delete a category with {count} active products"),
        })),
        Err(e) => store_error("Error deleting category", e),
    }
}
