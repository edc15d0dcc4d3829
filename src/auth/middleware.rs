use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures_util::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;

use crate::auth::jwt;
use crate::db::users::get_user_by_id;
use crate::models::users;

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// The caller, resolved from a valid bearer token to an active account.
pub struct AuthenticatedUser(pub users::Model);

/// An authenticated caller whose stored role may use the admin panel.
pub struct AdminUser(pub users::Model);

fn reject(response: HttpResponse, reason: impl Into<String>) -> Error {
    InternalError::from_response(reason.into(), response).into()
}

fn unauthorized(message: &str) -> Error {
    reject(
        HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": message,
        })),
        message,
    )
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let bearer = BearerAuth::extract(&req)
                .await
                .map_err(|_| unauthorized("Access token required"))?;

            // 2. Validate the token against the shared secret.
            let secret = req.app_data::<web::Data<JwtSecret>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("JWT secret not configured")
            })?;

            let claims = jwt::validate_token(bearer.token(), &secret.0).map_err(|e| {
                tracing::debug!(reason = %e, "rejected bearer token");
                unauthorized("Invalid or expired token")
            })?;

            let user_id = claims
                .user_id()
                .map_err(|_| unauthorized("Invalid or expired token"))?;

            // 3. Load the account; the stored row is authoritative for role and status.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            let user = get_user_by_id(db.get_ref(), user_id)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "user lookup failed during authentication");
                    reject(
                        HttpResponse::ServiceUnavailable().json(serde_json::json!({
                            "success": false,
                            "error": "Service temporarily unavailable",
                        })),
                        e.to_string(),
                    )
                })?
                .ok_or_else(|| unauthorized("User not found"))?;

            if !user.active {
                return Err(unauthorized("Account is disabled"));
            }

            Ok(AuthenticatedUser(user))
        })
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let authenticated = AuthenticatedUser::from_request(req, payload);

        Box::pin(async move {
            let AuthenticatedUser(user) = authenticated.await?;

            if !user.role.is_admin_level() {
                return Err(reject(
                    HttpResponse::Forbidden().json(serde_json::json!({
                        "success": false,
                        "error": "Access denied. Administrator permissions required",
                    })),
                    "admin role required",
                ));
            }

            Ok(AdminUser(user))
        })
    }
}
