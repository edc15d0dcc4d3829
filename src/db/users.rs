use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::catalog::predicates::{assemble_users, user_conjunction};
use crate::catalog::{CatalogError, Page, Paginator, UserFilterSet, build_page};
use crate::catalog::ordering::user_ordering;
use crate::models::users::{self, Roles, UpdateUser, UserResponse};

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Admin user listing, newest first.
pub async fn list_users(
    db: &DatabaseConnection,
    filters: &UserFilterSet,
) -> Result<Page<UserResponse>, CatalogError> {
    let condition = user_conjunction(&assemble_users(filters))?;
    let filtered = users::Entity::find().filter(condition);
    let window = build_page(filters.page(), filters.page_size())?;

    let page = Paginator::new(db)
        .paginate::<users::Entity, users::Model>(filtered, &user_ordering(), window)
        .await?;

    Ok(page.map(UserResponse::from))
}

/// Whether an account other than `except` already uses `email`.
pub async fn email_taken(db: &DatabaseConnection, email: &str, except: Uuid) -> Result<bool, DbErr> {
    let count = users::Entity::find()
        .filter(users::Column::Email.eq(email.trim().to_lowercase()))
        .filter(users::Column::Id.ne(except))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Update an existing user (admin-level). Returns `None` if the user does not exist.
pub async fn update_user(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateUser,
) -> Result<Option<users::Model>, DbErr> {
    let Some(user) = users::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: users::ActiveModel = user.into();
    input.apply(&mut active);

    active.update(db).await.map(Some)
}

pub async fn set_role(
    db: &DatabaseConnection,
    id: Uuid,
    role: Roles,
) -> Result<Option<users::Model>, DbErr> {
    let Some(user) = users::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: users::ActiveModel = user.into();
    active.role = Set(role);

    active.update(db).await.map(Some)
}

pub async fn set_active(
    db: &DatabaseConnection,
    id: Uuid,
    flag: bool,
) -> Result<Option<users::Model>, DbErr> {
    let Some(user) = users::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: users::ActiveModel = user.into();
    active.active = Set(flag);

    active.update(db).await.map(Some)
}

/// Record that the user just authenticated.
pub async fn touch_last_login(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
    users::Entity::update_many()
        .col_expr(users::Column::LastLogin, Expr::value(chrono::Utc::now()))
        .filter(users::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}
