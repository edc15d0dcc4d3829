use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

/// GET /api/health: liveness plus a database ping.
pub async fn health(db: web::Data<DatabaseConnection>) -> impl Responder {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "status": "ok",
            "database": "connected",
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check ping failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "success": false,
                "status": "degraded",
                "database": "unreachable",
            }))
        }
    }
}
