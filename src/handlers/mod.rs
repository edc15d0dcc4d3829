pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
pub mod users;

use actix_web::{HttpResponse, web};
use sea_orm::DbErr;

use crate::catalog::{CatalogError, ListingProfile};

/// Page-size defaults for the storefront and admin listings.
#[derive(Debug, Clone, Copy)]
pub struct ListingProfiles {
    pub storefront: ListingProfile,
    pub admin: ListingProfile,
}

impl Default for ListingProfiles {
    fn default() -> Self {
        Self {
            storefront: ListingProfile::storefront(),
            admin: ListingProfile::admin(),
        }
    }
}

/// Map a catalog failure onto a response.
///
/// Store failures are reported as 503 and never retried here; broken
/// invariants are bugs, logged and answered with 500.
pub fn catalog_error(context: &str, e: CatalogError) -> HttpResponse {
    match e {
        CatalogError::StoreUnavailable(err) => {
            tracing::warn!(error = %err, "{context}");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "success": false,
                "error": context,
                "message": "Service temporarily unavailable",
            }))
        }
        CatalogError::InvariantViolation(msg) => {
            tracing::error!(invariant = %msg, "{context}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": context,
                "message": "Internal error",
            }))
        }
    }
}

/// Log a store failure and answer 500 without the driver's error text.
pub fn store_error(context: &str, e: DbErr) -> HttpResponse {
    tracing::warn!(error = %e, "{context}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "success": false,
        "error": context,
        "message": "Internal server error",
    }))
}

pub fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": message,
    }))
}

pub fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": message,
    }))
}

pub fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "success": false,
        "error": message,
    }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));

    // ── Storefront catalog (public) ──
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(products::list_products))
            .route("/category/{name}", web::get().to(products::products_by_category))
            .route("/search/{term}", web::get().to(products::search_products))
            .route("/{id}", web::get().to(products::get_product)),
    );

    // ── Categories (reads public, writes require an admin token) ──
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(categories::list_categories))
            .route("", web::post().to(categories::create_category))
            .route("/name/{name}", web::get().to(categories::get_category_by_name))
            .route("/{id}", web::get().to(categories::get_category))
            .route("/{id}", web::put().to(categories::update_category))
            .route("/{id}", web::delete().to(categories::delete_category))
            .route("/{id}/products", web::get().to(categories::category_products)),
    );

    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Admin panel (AdminUser extractor on every handler) ──
    cfg.service(
        web::scope("/admin")
            .route("/dashboard/stats", web::get().to(admin::dashboard_stats))
            .route("/products", web::get().to(admin::list_products))
            .route("/products", web::post().to(admin::create_product))
            .route("/products/{id}", web::put().to(admin::update_product))
            .route("/products/{id}", web::delete().to(admin::delete_product))
            .route("/users", web::get().to(users::list_users))
            .route("/users/{id}", web::put().to(users::update_user))
            .route("/users/{id}/role", web::put().to(users::update_role))
            .route("/users/{id}/status", web::put().to(users::update_status)),
    );
}
