use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func};
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::categories::{self, CategorySummary, CreateCategory, UpdateCategory};
use crate::models::products;

/// Outcome of a category soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDelete {
    Deleted,
    NotFound,
    /// Refused; the category still has this many active products.
    InUse(u64),
}

/// Active categories, alphabetically, each with its number of active products.
pub async fn list_with_counts(db: &DatabaseConnection) -> Result<Vec<CategorySummary>, DbErr> {
    let rows = categories::Entity::find()
        .filter(categories::Column::Active.eq(true))
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await?;

    let counts: HashMap<Uuid, i64> = products::Entity::find()
        .select_only()
        .column(products::Column::CategoryId)
        .column_as(products::Column::Id.count(), "total")
        .filter(products::Column::Active.eq(true))
        .group_by(products::Column::CategoryId)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(rows
        .into_iter()
        .map(|c| CategorySummary {
            total_products: counts.get(&c.id).copied().unwrap_or(0),
            id: c.id,
            name: c.name,
            description: c.description,
            image: c.image,
        })
        .collect())
}

/// Fetch an active category by ID.
pub async fn get_active_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find_by_id(id)
        .filter(categories::Column::Active.eq(true))
        .one(db)
        .await
}

/// Fetch an active category by its exact name.
pub async fn get_active_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find()
        .filter(categories::Column::Name.eq(name))
        .filter(categories::Column::Active.eq(true))
        .one(db)
        .await
}

/// Whether another category already uses `name`, ignoring case.
pub async fn name_taken(
    db: &DatabaseConnection,
    name: &str,
    except: Option<Uuid>,
) -> Result<bool, DbErr> {
    let mut query = categories::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col((categories::Entity, categories::Column::Name))))
            .eq(name.trim().to_lowercase()),
    );
    if let Some(id) = except {
        query = query.filter(categories::Column::Id.ne(id));
    }

    Ok(query.count(db).await? > 0)
}

/// Insert a new category.
pub async fn insert_category(
    db: &DatabaseConnection,
    input: CreateCategory,
) -> Result<categories::Model, DbErr> {
    let new_category = categories::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        image: Set(input.image),
        active: Set(true),
        created_at: Set(chrono::Utc::now()),
    };

    new_category.insert(db).await
}

/// Apply a partial update. Returns `None` when the category does not exist.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateCategory,
) -> Result<Option<categories::Model>, DbErr> {
    let Some(category) = categories::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: categories::ActiveModel = category.into();

    if let Some(name) = input.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(image) = input.image {
        active.image = Set(image);
    }
    if let Some(flag) = input.active {
        active.active = Set(flag);
    }

    active.update(db).await.map(Some)
}

/// Deactivate a category unless it still has active products.
pub async fn soft_delete_category(db: &DatabaseConnection, id: Uuid) -> Result<SoftDelete, DbErr> {
    if categories::Entity::find_by_id(id).one(db).await?.is_none() {
        return Ok(SoftDelete::NotFound);
    }

    let in_use = products::Entity::find()
        .filter(products::Column::CategoryId.eq(id))
        .filter(products::Column::Active.eq(true))
        .count(db)
        .await?;
    if in_use > 0 {
        return Ok(SoftDelete::InUse(in_use));
    }

    categories::Entity::update_many()
        .col_expr(categories::Column::Active, Expr::value(false))
        .filter(categories::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(SoftDelete::Deleted)
}
