use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::filters::{ADMIN_PAGE_SIZE, STOREFRONT_PAGE_SIZE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Process configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub catalog_page_size: u64,
    pub admin_page_size: u64,
    pub categories_ttl: Duration,
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            port: parse_or("PORT", 8080),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            catalog_page_size: parse_or("CATALOG_PAGE_SIZE", STOREFRONT_PAGE_SIZE),
            admin_page_size: parse_or("ADMIN_PAGE_SIZE", ADMIN_PAGE_SIZE),
            categories_ttl: Duration::from_secs(parse_or("CACHE_TTL_CATEGORIES", 300)),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.trim().is_empty()),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
