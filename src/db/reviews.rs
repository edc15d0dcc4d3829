use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews::{self, ReviewSummary};
use crate::models::users;

/// Most recent reviews of a product, newest first, with reviewer names.
pub async fn latest_for_product(
    db: &DatabaseConnection,
    product_id: Uuid,
    limit: u64,
) -> Result<Vec<ReviewSummary>, DbErr> {
    reviews::Entity::find()
        .select_only()
        .columns([
            reviews::Column::Id,
            reviews::Column::Rating,
            reviews::Column::Title,
            reviews::Column::Comment,
            reviews::Column::CreatedAt,
        ])
        .column_as(users::Column::FirstName, "reviewer_first_name")
        .column_as(users::Column::LastName, "reviewer_last_name")
        .join(JoinType::InnerJoin, reviews::Relation::User.def())
        .filter(reviews::Column::ProductId.eq(product_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .order_by_asc(reviews::Column::Id)
        .limit(limit)
        .into_model::<ReviewSummary>()
        .all(db)
        .await
}
