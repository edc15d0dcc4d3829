use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use super::reviews as review_db;
use crate::catalog::{
    CatalogError, FilterSet, Ordering, Page, Paginator, assemble, build_ordering, build_page,
    conjunction,
};
use crate::models::categories;
use crate::models::products::{
    self, CreateProduct, ProductDetail, ProductSummary, ProductWithReviews, UpdateProduct,
    image_list,
};

/// Reviews shown inline on the product detail page.
pub const DETAIL_REVIEWS: u64 = 10;

/// Products joined with their category, selecting everything a
/// [`ProductSummary`] needs.
pub fn listing_select() -> Select<products::Entity> {
    products::Entity::find()
        .join(JoinType::InnerJoin, products::Relation::Category.def())
        .column_as(categories::Column::Name, "category_name")
}

/// The listing select narrowed by every predicate of `filters`.
pub fn filtered_listing(filters: &FilterSet) -> Result<Select<products::Entity>, CatalogError> {
    let condition = conjunction(&assemble(filters))?;
    Ok(listing_select().filter(condition))
}

/// Run a catalog listing: predicates, ordering, page window, data and count.
pub async fn list_products(
    db: &DatabaseConnection,
    filters: &FilterSet,
) -> Result<Page<ProductSummary>, CatalogError> {
    let ordering = build_ordering(filters.sort_key(), filters.sort_direction());
    list_products_ordered(db, filters, &ordering).await
}

/// Same as [`list_products`], with the ordering chosen by the caller.
pub async fn list_products_ordered(
    db: &DatabaseConnection,
    filters: &FilterSet,
    ordering: &Ordering<products::Column>,
) -> Result<Page<ProductSummary>, CatalogError> {
    let filtered = filtered_listing(filters)?;
    let window = build_page(filters.page(), filters.page_size())?;

    Paginator::new(db).paginate(filtered, ordering, window).await
}

/// Fetch one active product with its category name.
pub async fn get_active_product(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<ProductDetail>, DbErr> {
    listing_select()
        .filter(products::Column::Id.eq(id))
        .filter(products::Column::Active.eq(true))
        .filter(categories::Column::Active.eq(true))
        .into_model::<ProductDetail>()
        .one(db)
        .await
}

/// Product detail page: the active product plus its latest reviews.
pub async fn get_product_detail(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<ProductWithReviews>, DbErr> {
    let Some(product) = get_active_product(db, id).await? else {
        return Ok(None);
    };
    let reviews = review_db::latest_for_product(db, id, DETAIL_REVIEWS).await?;

    Ok(Some(ProductWithReviews { product, reviews }))
}

/// Fetch a product by ID regardless of its status.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<products::Model>, DbErr> {
    products::Entity::find_by_id(id).one(db).await
}

/// Insert a new product.
pub async fn insert_product(
    db: &DatabaseConnection,
    input: CreateProduct,
) -> Result<products::Model, DbErr> {
    let new_product = products::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        price: Set(input.price),
        sale_price: Set(input.sale_price),
        stock: Set(input.stock),
        min_stock: Set(input.min_stock),
        average_rating: Set(0.0),
        review_count: Set(0),
        featured: Set(input.featured),
        brand: Set(input.brand),
        model_number: Set(input.model_number),
        weight: Set(input.weight),
        dimensions: Set(input.dimensions),
        warranty_months: Set(input.warranty_months),
        main_image: Set(input.main_image),
        additional_images: Set(
            (!input.additional_images.is_empty()).then(|| image_list(input.additional_images)),
        ),
        category_id: Set(input.category_id),
        active: Set(true),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_product.insert(db).await
}

/// Apply a partial update. Returns `None` when the product does not exist.
pub async fn update_product(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProduct,
) -> Result<Option<products::Model>, DbErr> {
    let Some(product) = products::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: products::ActiveModel = product.into();
    input.apply(&mut active);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await.map(Some)
}

/// Mark a product inactive. Returns `false` if no active product had that ID.
pub async fn soft_delete_product(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let result = products::Entity::update_many()
        .col_expr(products::Column::Active, Expr::value(false))
        .col_expr(products::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(products::Column::Id.eq(id))
        .filter(products::Column::Active.eq(true))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}
