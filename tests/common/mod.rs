//! Shared fixtures: an in-memory SQLite store with the catalog schema.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use ferreteria_backend::models::users::Roles;
use ferreteria_backend::models::{categories, products, reviews, users};

const SCHEMA: &str = r#"
CREATE TABLE categories (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    image TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);
CREATE TABLE products (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    price REAL NOT NULL,
    sale_price REAL,
    stock INTEGER NOT NULL DEFAULT 0,
    min_stock INTEGER NOT NULL DEFAULT 5,
    average_rating REAL NOT NULL DEFAULT 0,
    review_count INTEGER NOT NULL DEFAULT 0,
    featured INTEGER NOT NULL DEFAULT 0,
    brand TEXT,
    model_number TEXT,
    weight REAL,
    dimensions TEXT,
    warranty_months INTEGER NOT NULL DEFAULT 0,
    main_image TEXT,
    additional_images TEXT,
    category_id BLOB NOT NULL REFERENCES categories (id),
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
CREATE TABLE users (
    id BLOB PRIMARY KEY NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    role TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    last_login TEXT
);
CREATE TABLE reviews (
    id BLOB PRIMARY KEY NOT NULL,
    product_id BLOB NOT NULL REFERENCES products (id),
    user_id BLOB NOT NULL REFERENCES users (id),
    rating INTEGER NOT NULL,
    title TEXT,
    comment TEXT,
    created_at TEXT NOT NULL
);
"#;

/// A fresh single-connection in-memory store with the schema applied.
pub async fn store() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.expect("open sqlite");
    for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        db.execute_unprepared(statement).await.expect("create schema");
    }
    db
}

pub fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

pub async fn category(db: &DatabaseConnection, name: &str, active: bool) -> categories::Model {
    categories::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        description: Set(None),
        image: Set(None),
        active: Set(active),
        created_at: Set(at(0)),
    }
    .insert(db)
    .await
    .expect("insert category")
}

/// Builder for seeded products; only the fields tests care about vary.
pub struct ProductSeed {
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub average_rating: f64,
    pub stock: i32,
    pub featured: bool,
    pub active: bool,
    pub created_offset: i64,
    pub images: Vec<String>,
}

impl ProductSeed {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            brand: None,
            price,
            average_rating: 0.0,
            stock: 10,
            featured: false,
            active: true,
            created_offset: 0,
            images: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.average_rating = rating;
        self
    }

    pub fn stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn images(mut self, urls: &[&str]) -> Self {
        self.images = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn created(mut self, offset_secs: i64) -> Self {
        self.created_offset = offset_secs;
        self
    }

    pub async fn insert(self, db: &DatabaseConnection, category_id: Uuid) -> products::Model {
        products::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(self.name),
            description: Set(self.description),
            price: Set(self.price),
            sale_price: Set(None),
            stock: Set(self.stock),
            min_stock: Set(5),
            average_rating: Set(self.average_rating),
            review_count: Set(0),
            featured: Set(self.featured),
            brand: Set(self.brand),
            model_number: Set(None),
            weight: Set(None),
            dimensions: Set(None),
            warranty_months: Set(0),
            main_image: Set(None),
            additional_images: Set(
                (!self.images.is_empty()).then(|| products::image_list(self.images)),
            ),
            category_id: Set(category_id),
            active: Set(self.active),
            created_at: Set(at(self.created_offset)),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .expect("insert product")
    }
}

pub async fn user(
    db: &DatabaseConnection,
    first_name: &str,
    email: &str,
    role: Roles,
    active: bool,
    created_offset: i64,
) -> users::Model {
    users::ActiveModel {
        id: Set(Uuid::now_v7()),
        first_name: Set(first_name.to_string()),
        last_name: Set(None),
        email: Set(email.to_string()),
        phone: Set(None),
        role: Set(role),
        active: Set(active),
        created_at: Set(at(created_offset)),
        last_login: Set(None),
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn review(
    db: &DatabaseConnection,
    product_id: Uuid,
    user_id: Uuid,
    rating: i32,
    title: &str,
    created_offset: i64,
) -> reviews::Model {
    reviews::ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(product_id),
        user_id: Set(user_id),
        rating: Set(rating),
        title: Set(Some(title.to_string())),
        comment: Set(None),
        created_at: Set(at(created_offset)),
    }
    .insert(db)
    .await
    .expect("insert review")
}
