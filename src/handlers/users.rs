use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use uuid::Uuid;

use super::{ListingProfiles, bad_request, catalog_error, forbidden, not_found, store_error};
use crate::auth::authorization::{can_assign_role, can_manage};
use crate::auth::middleware::AdminUser;
use crate::catalog::UserFilterSet;
use crate::db::users as user_db;
use crate::models::users::{self, UpdateRole, UpdateStatus, UpdateUser, UserResponse};

/// Load the target account and check the caller may manage it.
async fn managed_target(
    db: &DatabaseConnection,
    admin: &AdminUser,
    id: Uuid,
) -> Result<users::Model, HttpResponse> {
    let target = user_db::get_user_by_id(db, id)
        .await
        .map_err(|e| store_error("Error fetching user", e))?
        .ok_or_else(|| not_found("User not found"))?;

    if !can_manage(&admin.0.role, &target.role) {
        return Err(forbidden("You cannot manage this account"));
    }
    Ok(target)
}

/// GET /api/admin/users: filtered, paginated, newest first.
pub async fn list_users(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    profiles: web::Data<ListingProfiles>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let filters = UserFilterSet::normalize(&query, profiles.admin);

    match user_db::list_users(db.get_ref(), &filters).await {
        Ok(page) => HttpResponse::Ok().json(page.envelope("totalUsers")),
        Err(e) => catalog_error("Error fetching users", e),
    }
}

/// PUT /api/admin/users/{id}: partial profile update.
pub async fn update_user(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUser>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();
    if input.is_empty() {
        return bad_request("No fields to update");
    }
    if let Some(problem) = input.problem() {
        return bad_request(problem);
    }

    if let Err(response) = managed_target(db.get_ref(), &admin, id).await {
        return response;
    }

    if let Some(email) = &input.email {
        match user_db::email_taken(db.get_ref(), email, id).await {
            Ok(true) => return bad_request("Email is already in use by another user"),
            Ok(false) => {}
            Err(e) => return store_error("Error updating user", e),
        }
    }

    match user_db::update_user(db.get_ref(), id, input).await {
        Ok(Some(user)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": UserResponse::from(user),
        })),
        Ok(None) => not_found("User not found"),
        Err(e) => store_error("Error updating user", e),
    }
}

/// PUT /api/admin/users/{id}/role
pub async fn update_role(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRole>,
) -> impl Responder {
    let id = path.into_inner();
    let requested = body.into_inner().role;

    let target = match managed_target(db.get_ref(), &admin, id).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    if !can_assign_role(&admin.0.role, &target.role, &requested) {
        return forbidden("Only a super admin can grant administrator roles");
    }

    match user_db::set_role(db.get_ref(), id, requested).await {
        Ok(Some(user)) => {
            tracing::info!(user_id = %id, role = user.role.as_str(), admin_id = %admin.0.id, "role changed");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": UserResponse::from(user),
            }))
        }
        Ok(None) => not_found("User not found"),
        Err(e) => store_error("Error updating role", e),
    }
}

/// PUT /api/admin/users/{id}/status: activate or deactivate an account.
pub async fn update_status(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatus>,
) -> impl Responder {
    let id = path.into_inner();
    let UpdateStatus { active } = body.into_inner();

    if id == admin.0.id && !active {
        return bad_request("You cannot deactivate your own account");
    }
    if let Err(response) = managed_target(db.get_ref(), &admin, id).await {
        return response;
    }

    let message = if active { "User activated" } else { "User deactivated" };
    match user_db::set_active(db.get_ref(), id, active).await {
        Ok(Some(user)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": UserResponse::from(user),
            "message": message,
        })),
        Ok(None) => not_found("User not found"),
        Err(e) => store_error("Error updating status", e),
    }
}
