use sea_orm::prelude::Expr;
use sea_orm::sea_query::ExprTrait;
use sea_orm::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::categories::list_with_counts;
use crate::db::products::listing_select;
use crate::models::categories::CategorySummary;
use crate::models::products::ProductSummary;
use crate::models::{products, users};

const SAMPLE_SIZE: u64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: u64,
    pub active: u64,
    pub featured: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub by_role: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: uuid::Uuid,
    pub name: String,
    pub stock: i32,
    pub min_stock: i32,
}

/// Figures for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub products: ProductStats,
    /// Active categories, largest first.
    pub categories: Vec<CategorySummary>,
    pub users: UserStats,
    pub top_products: Vec<ProductSummary>,
    pub low_stock_products: Vec<LowStockProduct>,
}

fn low_stock() -> Condition {
    Condition::all()
        .add(products::Column::Active.eq(true))
        .add(
            Expr::col((products::Entity, products::Column::Stock))
                .lte(Expr::col((products::Entity, products::Column::MinStock))),
        )
}

pub async fn stats(db: &DatabaseConnection) -> Result<DashboardStats, DbErr> {
    let products = ProductStats {
        total: products::Entity::find().count(db).await?,
        active: products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .count(db)
            .await?,
        featured: products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .filter(products::Column::Featured.eq(true))
            .count(db)
            .await?,
        low_stock: products::Entity::find().filter(low_stock()).count(db).await?,
        out_of_stock: products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .filter(products::Column::Stock.lte(0))
            .count(db)
            .await?,
    };

    let mut categories = list_with_counts(db).await?;
    categories.sort_by(|a, b| b.total_products.cmp(&a.total_products));

    // Ranked by rating weighted with review volume.
    let top_products = listing_select()
        .filter(products::Column::Active.eq(true))
        .order_by_desc(
            Expr::col((products::Entity, products::Column::AverageRating))
                .mul(Expr::col((products::Entity, products::Column::ReviewCount))),
        )
        .order_by_asc(products::Column::Id)
        .limit(SAMPLE_SIZE)
        .into_model::<ProductSummary>()
        .all(db)
        .await?;

    let by_role: BTreeMap<String, i64> = users::Entity::find()
        .select_only()
        .column(users::Column::Role)
        .column_as(users::Column::Id.count(), "total")
        .group_by(users::Column::Role)
        .into_tuple::<(String, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let users = UserStats {
        total: users::Entity::find().count(db).await?,
        active: users::Entity::find()
            .filter(users::Column::Active.eq(true))
            .count(db)
            .await?,
        by_role,
    };

    let low_stock_products = products::Entity::find()
        .filter(low_stock())
        .order_by_asc(products::Column::Stock)
        .order_by_asc(products::Column::Id)
        .limit(SAMPLE_SIZE)
        .all(db)
        .await?
        .into_iter()
        .map(|p| LowStockProduct {
            id: p.id,
            name: p.name,
            stock: p.stock,
            min_stock: p.min_stock,
        })
        .collect();

    Ok(DashboardStats {
        products,
        categories,
        users,
        top_products,
        low_stock_products,
    })
}
