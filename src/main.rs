use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use ferreteria_backend::auth::middleware::JwtSecret;
use ferreteria_backend::cache::CategoryCache;
use ferreteria_backend::catalog::ListingProfile;
use ferreteria_backend::config::AppConfig;
use ferreteria_backend::create_pool;
use ferreteria_backend::handlers::{self, ListingProfiles};
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config)
        .await
        .expect("Failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        tracing::info!("Migrations applied");
    }

    let db_data = web::Data::new(db);

    let category_cache = web::Data::new(Arc::new(CategoryCache::new(config.categories_ttl)));
    let jwt_secret = web::Data::new(JwtSecret(config.jwt_secret.clone()));
    let profiles = web::Data::new(ListingProfiles {
        storefront: ListingProfile::storefront().with_default_page_size(config.catalog_page_size),
        admin: ListingProfile::admin().with_default_page_size(config.admin_page_size),
    });

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    let cors_origin = config.cors_origin.clone();

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(category_cache.clone())
            .app_data(jwt_secret.clone())
            .app_data(profiles.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
