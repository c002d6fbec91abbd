//! Integration tests for the Products domain
//!
//! Run against a real PostgreSQL via testcontainers with the migrations
//! applied, checking the SQL side of filtering, ordering and updates.

use domain_products::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn create_input(name: String, price: f64, brand: Option<&str>) -> CreateProduct {
    CreateProduct {
        name,
        price,
        brand: brand.map(str::to_string),
        image: String::new(),
    }
}

fn query(params: ListProductsParams) -> ProductQuery {
    ProductQuery::try_from(params).unwrap()
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_get_product() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let input = create_input(builder.name("product", "main"), builder.price(0), Some("Canon"));
    let created = repo.create(input.clone()).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.name, input.name);
    assert_eq!(created.image, "");

    let fetched = assert_some(repo.get_by_id(created.id).await.unwrap(), "get_by_id");
    assert_eq!(fetched.name, input.name);
    assert_eq!(fetched.brand.as_deref(), Some("Canon"));
    assert_price_eq(fetched.price, input.price, "stored price");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_name_of_191_multibyte_characters_fits_column() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let name = "é".repeat(191);
    let created = repo.create(create_input(name.clone(), 1.0, None)).await.unwrap();

    assert_eq!(created.name, name);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_filters_match_in_memory_semantics() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    repo.create(create_input("Free sticker".into(), 0.0, None)).await.unwrap();
    repo.create(create_input("Walkman 50% off".into(), 40.0, Some("Sony"))).await.unwrap();
    repo.create(create_input("Walkman 500".into(), 60.0, Some("SONY"))).await.unwrap();
    repo.create(create_input("Galaxy".into(), 700.0, Some("Samsung"))).await.unwrap();

    let by_brand = query(ListProductsParams {
        brand: Some("sony".into()),
        ..Default::default()
    });
    assert_eq!(repo.count(&by_brand.filter).await.unwrap(), 2);

    let literal_percent = query(ListProductsParams {
        search: Some("50%".into()),
        ..Default::default()
    });
    let found = repo.list(&literal_percent).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Walkman 50% off");

    let free_only = query(ListProductsParams {
        max_price: Some("0".into()),
        ..Default::default()
    });
    let found = repo.list(&free_only).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Free sticker");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_is_newest_first_and_paged() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("paging");

    let mut ids = Vec::new();
    for i in 0..12 {
        let input = create_input(builder.name("product", &i.to_string()), builder.price(i), None);
        ids.push(repo.create(input).await.unwrap().id);
    }

    let second_page = query(ListProductsParams {
        page: Some("2".into()),
        limit: Some("5".into()),
        ..Default::default()
    });
    let page: Vec<i32> = repo
        .list(&second_page)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    let expected: Vec<i32> = ids.iter().rev().skip(5).take(5).copied().collect();
    assert_eq!(page, expected);
    assert_eq!(repo.count(&second_page.filter).await.unwrap(), 12);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_overwrites_fields_and_keeps_image() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let mut input = create_input("Lens".into(), 300.0, Some("Canon"));
    input.image = "/uploads/1_lens.jpg".into();
    let created = repo.create(input).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateProduct {
                name: "Lens II".into(),
                price: 350.0,
                brand: None,
                image: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Lens II");
    assert_eq!(updated.brand, None);
    assert_eq!(updated.image, "/uploads/1_lens.jpg");
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);

    let replaced = repo
        .update(
            created.id,
            UpdateProduct {
                name: "Lens II".into(),
                price: 350.0,
                brand: None,
                image: Some("/uploads/2_lens.jpg".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.image, "/uploads/2_lens.jpg");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_and_delete_of_missing_row() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let result = repo
        .update(
            12345,
            UpdateProduct {
                name: "Ghost".into(),
                price: 1.0,
                brand: None,
                image: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ProductError::NotFound(12345))));

    assert!(!repo.delete(12345).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_ids_are_not_reused_after_delete() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let first = repo.create(create_input("A".into(), 1.0, None)).await.unwrap();
    assert!(repo.delete(first.id).await.unwrap());
    assert!(repo.get_by_id(first.id).await.unwrap().is_none());

    let second = repo.create(create_input("B".into(), 1.0, None)).await.unwrap();
    assert!(second.id > first.id);
}
