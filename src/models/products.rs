use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, Set};
use serde::{Deserialize, Serialize};

use super::double_option;
use super::reviews::ReviewSummary;

/// SeaORM entity for the `products` table.
///
/// Rows are never removed; `active = false` marks a soft-deleted product.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub sale_price: Option<f64>,
    pub stock: i32,
    pub min_stock: i32,
    #[sea_orm(column_type = "Double")]
    pub average_rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub brand: Option<String>,
    pub model_number: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub warranty_months: i32,
    pub main_image: Option<String>,
    /// JSON array of image URLs.
    #[sea_orm(column_type = "Json", nullable)]
    pub additional_images: Option<Json>,
    pub category_id: Uuid,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// A product row as shown in listings, joined with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub stock: i32,
    pub min_stock: i32,
    pub average_rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub brand: Option<String>,
    pub main_image: Option<String>,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub category_id: Uuid,
    pub category_name: String,
}

/// Every column of one product plus its category name, for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub stock: i32,
    pub min_stock: i32,
    pub average_rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub brand: Option<String>,
    pub model_number: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub warranty_months: i32,
    pub main_image: Option<String>,
    pub additional_images: Option<Json>,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: DateTimeUtc,
}

/// Detail page payload: the product with its latest reviews inline.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithReviews {
    #[serde(flatten)]
    pub product: ProductDetail,
    pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub category_id: Uuid,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_min_stock")]
    pub min_stock: i32,
    pub brand: Option<String>,
    pub model_number: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    #[serde(default)]
    pub warranty_months: i32,
    #[serde(default)]
    pub featured: bool,
    pub main_image: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
}

fn default_min_stock() -> i32 {
    5
}

/// Store a list of image URLs as a JSON array.
pub fn image_list(images: Vec<String>) -> Json {
    Json::from(images)
}

impl CreateProduct {
    /// First validation problem with the request, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("Name, price and category are required");
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Some("Price must be greater than 0");
        }
        if self.sale_price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Some("Sale price must not be negative");
        }
        if self.stock < 0 || self.min_stock < 0 || self.warranty_months < 0 {
            return Some("Stock and warranty values must not be negative");
        }
        None
    }
}

/// Admin partial update: only the fields present in the body are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub sale_price: Option<Option<f64>>,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub model_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub dimensions: Option<Option<String>>,
    pub warranty_months: Option<i32>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub main_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub additional_images: Option<Option<Vec<String>>>,
    pub active: Option<bool>,
}

impl UpdateProduct {
    pub fn problem(&self) -> Option<&'static str> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Some("Name must not be empty");
        }
        if self.price.is_some_and(|p| !p.is_finite() || p <= 0.0) {
            return Some("Price must be greater than 0");
        }
        if matches!(self.sale_price, Some(Some(p)) if !p.is_finite() || p < 0.0) {
            return Some("Sale price must not be negative");
        }
        if [self.stock, self.min_stock, self.warranty_months]
            .iter()
            .flatten()
            .any(|v| *v < 0)
        {
            return Some("Stock and warranty values must not be negative");
        }
        None
    }

    /// Write the present fields onto an active model.
    pub fn apply(self, row: &mut ActiveModel) {
        if let Some(name) = self.name {
            row.name = Set(name);
        }
        if let Some(description) = self.description {
            row.description = Set(description);
        }
        if let Some(price) = self.price {
            row.price = Set(price);
        }
        if let Some(sale_price) = self.sale_price {
            row.sale_price = Set(sale_price);
        }
        if let Some(category_id) = self.category_id {
            row.category_id = Set(category_id);
        }
        if let Some(stock) = self.stock {
            row.stock = Set(stock);
        }
        if let Some(min_stock) = self.min_stock {
            row.min_stock = Set(min_stock);
        }
        if let Some(brand) = self.brand {
            row.brand = Set(brand);
        }
        if let Some(model_number) = self.model_number {
            row.model_number = Set(model_number);
        }
        if let Some(weight) = self.weight {
            row.weight = Set(weight);
        }
        if let Some(dimensions) = self.dimensions {
            row.dimensions = Set(dimensions);
        }
        if let Some(warranty_months) = self.warranty_months {
            row.warranty_months = Set(warranty_months);
        }
        if let Some(featured) = self.featured {
            row.featured = Set(featured);
        }
        if let Some(main_image) = self.main_image {
            row.main_image = Set(main_image);
        }
        if let Some(images) = self.additional_images {
            row.additional_images = Set(images.map(image_list));
        }
        if let Some(flag) = self.active {
            row.active = Set(flag);
        }
    }
}
