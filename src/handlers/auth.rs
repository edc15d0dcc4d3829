use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::users;
use crate::models::users::UserResponse;

/// GET /api/auth/me: return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser, db: web::Data<DatabaseConnection>) -> impl Responder {
    if let Err(e) = users::touch_last_login(db.get_ref(), user.0.id).await {
        tracing::warn!(error = %e, user_id = %user.0.id, "could not record last login");
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": UserResponse::from(user.0),
    }))
}
