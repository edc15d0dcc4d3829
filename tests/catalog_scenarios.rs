//! Catalog listings against an in-memory SQLite store.
//!
//! Run with: `cargo test --test catalog_scenarios`
mod common;

use std::collections::HashMap;

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, EntityTrait, MockDatabase};

use common::{ProductSeed, at, category, store, user};
use ferreteria_backend::catalog::{CatalogError, FilterSet, ListingProfile, UserFilterSet};
use ferreteria_backend::db::categories::{SoftDelete, list_with_counts, soft_delete_category};
use ferreteria_backend::db::products::list_products;
use ferreteria_backend::db::users::list_users;
use ferreteria_backend::models::products;
use ferreteria_backend::models::users::Roles;

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn storefront(pairs: &[(&str, &str)]) -> FilterSet {
    FilterSet::normalize(&query(pairs), ListingProfile::storefront())
}

fn admin(pairs: &[(&str, &str)]) -> FilterSet {
    FilterSet::normalize(&query(pairs), ListingProfile::admin())
}

fn names(items: &[products::ProductSummary]) -> Vec<&str> {
    items.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn search_finds_the_matching_rows_on_one_page() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;

    ProductSeed::new("Martillo de bola", 15.0).insert(&db, tools.id).await;
    ProductSeed::new("Mazo", 22.0)
        .description("Tipo martillo de goma")
        .insert(&db, tools.id)
        .await;
    ProductSeed::new("Cincel", 9.5).brand("Martillos Kiam").insert(&db, tools.id).await;
    ProductSeed::new("Destornillador", 4.0).insert(&db, tools.id).await;
    ProductSeed::new("Martillo viejo", 3.0).inactive().insert(&db, tools.id).await;

    let filters = storefront(&[("search", "martillo"), ("page", "1"), ("limit", "12")]);
    let page = list_products(&db, &filters).await.unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next);
    assert!(!page.has_prev);
    assert_eq!(names(&page.items), vec!["Cincel", "Martillo de bola", "Mazo"]);
    assert!(page.items.iter().all(|p| p.category_name == "Herramientas"));
}

#[tokio::test]
async fn second_page_of_twenty_five_rows() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    for i in 1..=25 {
        ProductSeed::new(&format!("Producto {i:02}"), 10.0 + i as f64)
            .insert(&db, tools.id)
            .await;
    }

    let filters = storefront(&[("category", "all"), ("page", "2"), ("limit", "10")]);
    let page = list_products(&db, &filters).await.unwrap();

    let expected: Vec<String> = (11..=20).map(|i| format!("Producto {i:02}")).collect();
    assert_eq!(names(&page.items), expected);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_items, 25);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(page.has_prev);
}

#[tokio::test]
async fn inverted_price_bounds_match_nothing() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    ProductSeed::new("Taladro", 75.0).insert(&db, tools.id).await;
    ProductSeed::new("Sierra", 120.0).insert(&db, tools.id).await;

    let filters = storefront(&[("minPrice", "100"), ("maxPrice", "50")]);
    let page = list_products(&db, &filters).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
    assert!(!page.has_next);
}

#[tokio::test]
async fn hostile_sort_key_falls_back_to_name() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    ProductSeed::new("Tenaza", 8.0).insert(&db, tools.id).await;
    ProductSeed::new("Alicate", 12.0).insert(&db, tools.id).await;
    ProductSeed::new("Llave inglesa", 5.0).insert(&db, tools.id).await;

    let filters = storefront(&[("sortBy", "'; DROP TABLE products; --")]);
    let page = list_products(&db, &filters).await.unwrap();
    assert_eq!(names(&page.items), vec!["Alicate", "Llave inglesa", "Tenaza"]);

    let filters = admin(&[("sortBy", "'; DROP TABLE products; --")]);
    let page = list_products(&db, &filters).await.unwrap();
    assert_eq!(names(&page.items), vec!["Alicate", "Llave inglesa", "Tenaza"]);

    let remaining = products::Entity::find().all(&db).await.unwrap();
    assert_eq!(remaining.len(), 3);
}

#[tokio::test]
async fn metacharacters_in_search_are_literal() {
    let db = store().await;
    let paint = category(&db, "Pinturas", true).await;
    ProductSeed::new("Esmalte 100% acrilico", 30.0).insert(&db, paint.id).await;
    ProductSeed::new("Esmalte 1000 ml", 25.0).insert(&db, paint.id).await;
    ProductSeed::new("Rodillo_grande", 6.0).insert(&db, paint.id).await;
    ProductSeed::new("Rodillo chico", 4.0).insert(&db, paint.id).await;

    let percent = list_products(&db, &storefront(&[("search", "100%")])).await.unwrap();
    assert_eq!(names(&percent.items), vec!["Esmalte 100% acrilico"]);

    let underscore = list_products(&db, &storefront(&[("search", "o_g")])).await.unwrap();
    assert_eq!(names(&underscore.items), vec!["Rodillo_grande"]);

    let quote = list_products(&db, &storefront(&[("search", "' OR '1'='1")])).await.unwrap();
    assert!(quote.items.is_empty());
}

#[tokio::test]
async fn storefront_hides_inactive_products_and_categories() {
    let db = store().await;
    let visible = category(&db, "Electricidad", true).await;
    let hidden = category(&db, "Temporada", false).await;

    ProductSeed::new("Cable 2mm", 3.0).insert(&db, visible.id).await;
    ProductSeed::new("Enchufe", 2.0).inactive().insert(&db, visible.id).await;
    ProductSeed::new("Adorno", 7.0).insert(&db, hidden.id).await;

    let page = list_products(&db, &storefront(&[])).await.unwrap();
    assert_eq!(names(&page.items), vec!["Cable 2mm"]);

    // Admin listings see everything unless asked otherwise.
    let all = list_products(&db, &admin(&[])).await.unwrap();
    assert_eq!(all.total_items, 3);

    let inactive = list_products(&db, &admin(&[("activo", "false")])).await.unwrap();
    assert_eq!(names(&inactive.items), vec!["Enchufe"]);
}

#[tokio::test]
async fn category_featured_and_price_filters_combine() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    let garden = category(&db, "Jardin", true).await;

    ProductSeed::new("Pala", 20.0).featured().insert(&db, garden.id).await;
    ProductSeed::new("Rastrillo", 14.0).insert(&db, garden.id).await;
    ProductSeed::new("Tijera de podar", 45.0).featured().insert(&db, garden.id).await;
    ProductSeed::new("Martillo", 15.0).featured().insert(&db, tools.id).await;

    let filters = storefront(&[
        ("category", "Jardin"),
        ("featured", "true"),
        ("maxPrice", "30"),
    ]);
    let page = list_products(&db, &filters).await.unwrap();
    assert_eq!(names(&page.items), vec!["Pala"]);
}

#[tokio::test]
async fn sort_keys_and_tie_break() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;

    let first = ProductSeed::new("Nivel", 10.0).rating(4.5).created(30).insert(&db, tools.id).await;
    let second = ProductSeed::new("Escuadra", 10.0).rating(3.0).created(10).insert(&db, tools.id).await;
    ProductSeed::new("Flexometro", 6.0).rating(5.0).created(20).insert(&db, tools.id).await;

    let by_price = list_products(&db, &storefront(&[("sortBy", "precio"), ("order", "DESC")]))
        .await
        .unwrap();
    // Equal prices keep insertion order through the id tie-break.
    assert_eq!(by_price.items[0].id, first.id);
    assert_eq!(by_price.items[1].id, second.id);
    assert_eq!(by_price.items[2].name, "Flexometro");

    let by_rating = list_products(&db, &storefront(&[("sortBy", "rating"), ("order", "desc")]))
        .await
        .unwrap();
    assert_eq!(names(&by_rating.items), vec!["Flexometro", "Nivel", "Escuadra"]);

    // Admin default is newest first.
    let newest = list_products(&db, &admin(&[])).await.unwrap();
    assert_eq!(names(&newest.items), vec!["Nivel", "Flexometro", "Escuadra"]);
}

#[tokio::test]
async fn repeated_queries_return_identical_pages() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    for i in 0..15 {
        // Many equal names and prices, so only the tie-break decides order.
        ProductSeed::new("Tornillo", 1.0).created(i).insert(&db, tools.id).await;
    }

    let filters = storefront(&[("page", "2"), ("limit", "5")]);
    let once = list_products(&db, &filters).await.unwrap();
    let twice = list_products(&db, &filters).await.unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.items.len(), 5);
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    ProductSeed::new("Lija", 1.0).insert(&db, tools.id).await;

    let page = list_products(&db, &storefront(&[("page", "9")])).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 1);
    assert!(!page.has_next);
    assert!(page.has_prev);
}

#[tokio::test]
async fn store_failure_surfaces_as_store_unavailable() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection refused".to_string())])
        .into_connection();

    let result = list_products(&db, &storefront(&[("search", "martillo")])).await;
    assert!(matches!(result, Err(CatalogError::StoreUnavailable(_))));
}

#[tokio::test]
async fn category_counts_only_active_products() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    let empty = category(&db, "Adhesivos", true).await;
    category(&db, "Archivada", false).await;

    ProductSeed::new("Martillo", 15.0).insert(&db, tools.id).await;
    ProductSeed::new("Serrucho", 18.0).insert(&db, tools.id).await;
    ProductSeed::new("Formon", 11.0).inactive().insert(&db, tools.id).await;

    let categories = list_with_counts(&db).await.unwrap();
    let summary: Vec<(&str, i64)> = categories
        .iter()
        .map(|c| (c.name.as_str(), c.total_products))
        .collect();
    assert_eq!(summary, vec![("Adhesivos", 0), ("Herramientas", 2)]);

    assert_eq!(
        soft_delete_category(&db, tools.id).await.unwrap(),
        SoftDelete::InUse(2)
    );
    assert_eq!(
        soft_delete_category(&db, empty.id).await.unwrap(),
        SoftDelete::Deleted
    );
    assert_eq!(
        soft_delete_category(&db, uuid::Uuid::now_v7()).await.unwrap(),
        SoftDelete::NotFound
    );
}

#[tokio::test]
async fn user_listing_filters_and_envelope() {
    let db = store().await;
    user(&db, "Ana", "ana@kiam.test", Roles::Customer, true, 10).await;
    user(&db, "Bruno", "bruno@kiam.test", Roles::Customer, false, 20).await;
    user(&db, "Carla", "carla@kiam.test", Roles::Employee, true, 30).await;
    user(&db, "Dario", "dario@kiam.test", Roles::Admin, true, 40).await;

    let everyone = UserFilterSet::normalize(&query(&[]), ListingProfile::admin());
    let page = list_users(&db, &everyone).await.unwrap();
    let order: Vec<&str> = page.items.iter().map(|u| u.first_name.as_str()).collect();
    assert_eq!(order, vec!["Dario", "Carla", "Bruno", "Ana"]);

    let customers = UserFilterSet::normalize(
        &query(&[("tipo_usuario", "cliente"), ("activo", "true")]),
        ListingProfile::admin(),
    );
    let page = list_users(&db, &customers).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].email, "ana@kiam.test");

    let body = page.envelope("totalUsers");
    assert_eq!(body["pagination"]["totalUsers"], 1);
    assert!(body["pagination"].get("totalProducts").is_none());

    let search = UserFilterSet::normalize(&query(&[("search", "CARLA@")]), ListingProfile::admin());
    let page = list_users(&db, &search).await.unwrap();
    assert_eq!(page.items[0].role, Roles::Employee);
}

#[tokio::test]
async fn schema_fixture_timestamps_round_trip() {
    let db = store().await;
    let tools = category(&db, "Herramientas", true).await;
    let product = ProductSeed::new("Llana", 7.0).created(90).insert(&db, tools.id).await;
    assert_eq!(product.created_at, at(90));
    assert!(db.execute_unprepared("SELECT 1").await.is_ok());
}
