//! End-to-end checker tests against SQLite catalogs
//!
//! Each duplicated-url_key scenario writes the raw rows to a catalog with
//! stores 0 and 1, then runs the checker through the read-only source.

mod helpers;

use std::sync::Arc;

use helpers::catalog_db::{create_test_catalog, TestCatalog, URL_KEY, URL_PATH};
use urlck_common::{ProductId, StoreId};
use urlck_pc::checker::url_key::duplicated_problem;
use urlck_pc::checker::url_path::PROBLEM_DESCRIPTION;
use urlck_pc::model::{Assignment, ProblemRecord};
use urlck_pc::{Checker, UrlKeyChecker, UrlPathChecker};

async fn catalog_with_rows(products: u32, rows: &[(u16, u32, &str)]) -> TestCatalog {
    let catalog = create_test_catalog()
        .await
        .unwrap()
        .with_stores_and_products(1, products)
        .await
        .unwrap();
    for &(store_id, entity_id, value) in rows {
        catalog
            .set_value(URL_KEY, store_id, entity_id, Some(value))
            .await
            .unwrap();
    }
    catalog
}

async fn url_key_problems(products: u32, rows: &[(u16, u32, &str)]) -> Vec<ProblemRecord> {
    let catalog = catalog_with_rows(products, rows).await;
    let checker = UrlKeyChecker::new(Arc::new(catalog.source().await.unwrap()), URL_KEY);
    checker.check().await.unwrap()
}

fn duplicate(id: u32, store: u16, other_id: u32, other_store: u16) -> ProblemRecord {
    ProblemRecord {
        id: ProductId(id),
        sku: format!("sku {}", id),
        store_id: StoreId(store),
        problem: duplicated_problem(&Assignment::new(
            StoreId(other_store),
            ProductId(other_id),
            "",
        )),
    }
}

#[tokio::test]
async fn test_two_products_different_url_keys() {
    let problems = url_key_problems(2, &[(0, 1, "url_key_1"), (0, 2, "url_key_2")]).await;
    assert!(problems.is_empty());
}

#[tokio::test]
async fn test_single_product_different_url_keys_per_store() {
    let problems = url_key_problems(1, &[(0, 1, "url_key_1"), (1, 1, "url_key_2")]).await;
    assert!(problems.is_empty());
}

#[tokio::test]
async fn test_single_product_same_url_key_on_several_stores() {
    let problems = url_key_problems(1, &[(0, 1, "url_key_1"), (1, 1, "url_key_1")]).await;
    assert!(problems.is_empty());
}

#[tokio::test]
async fn test_two_products_same_url_key_same_store() {
    let problems = url_key_problems(2, &[(0, 1, "url_key_1"), (0, 2, "url_key_1")]).await;
    assert_eq!(problems, vec![duplicate(1, 0, 2, 0), duplicate(2, 0, 1, 0)]);
}

#[tokio::test]
async fn test_three_products_same_url_key_same_store() {
    let problems = url_key_problems(
        3,
        &[(0, 1, "url_key_1"), (0, 2, "url_key_1"), (0, 3, "url_key_1")],
    )
    .await;

    assert_eq!(
        problems,
        vec![
            duplicate(1, 0, 2, 0),
            duplicate(1, 0, 3, 0),
            duplicate(2, 0, 1, 0),
            duplicate(2, 0, 3, 0),
            duplicate(3, 0, 1, 0),
            duplicate(3, 0, 2, 0),
        ]
    );
}

#[tokio::test]
async fn test_same_url_keys_on_different_store_views() {
    let problems = url_key_problems(
        2,
        &[
            (0, 1, "url_key_1"),
            (1, 1, "url_key_2"),
            (0, 2, "url_key_2"),
            (1, 2, "url_key_1"),
        ],
    )
    .await;
    assert!(problems.is_empty());
}

#[tokio::test]
async fn test_inherited_url_key_collides_with_store_override() {
    let problems = url_key_problems(
        2,
        &[(0, 1, "url_key_1"), (0, 2, "url_key_2"), (1, 2, "url_key_1")],
    )
    .await;
    assert_eq!(problems, vec![duplicate(1, 0, 2, 1), duplicate(2, 1, 1, 0)]);
}

#[tokio::test]
async fn test_collision_only_in_store_without_override() {
    // Store 2 inherits both defaults; stores 1 and 3 override product 2
    let catalog = create_test_catalog()
        .await
        .unwrap()
        .with_stores_and_products(3, 2)
        .await
        .unwrap();
    catalog.set_value(URL_KEY, 0, 1, Some("shirt")).await.unwrap();
    catalog.set_value(URL_KEY, 0, 2, Some("shirt")).await.unwrap();
    catalog.set_value(URL_KEY, 1, 2, Some("shirt-red")).await.unwrap();
    catalog.set_value(URL_KEY, 3, 2, Some("shirt-blue")).await.unwrap();

    let checker = UrlKeyChecker::new(Arc::new(catalog.source().await.unwrap()), URL_KEY);
    let problems = checker.check().await.unwrap();

    assert_eq!(problems, vec![duplicate(1, 0, 2, 0), duplicate(2, 0, 1, 0)]);
}

#[tokio::test]
async fn test_checker_is_idempotent() {
    let catalog = catalog_with_rows(
        3,
        &[(0, 1, "a"), (0, 2, "a"), (1, 3, "a"), (1, 1, "b")],
    )
    .await;
    let checker = UrlKeyChecker::new(Arc::new(catalog.source().await.unwrap()), URL_KEY);

    let first = checker.check().await.unwrap();
    let second = checker.check().await.unwrap();

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn test_url_path_values_reported() {
    let catalog = create_test_catalog()
        .await
        .unwrap()
        .with_stores_and_products(2, 3)
        .await
        .unwrap();
    catalog.set_value(URL_PATH, 0, 3, Some("three.html")).await.unwrap();
    catalog.set_value(URL_PATH, 2, 1, Some("one.html")).await.unwrap();
    catalog.set_value(URL_PATH, 1, 2, None).await.unwrap();

    let checker = UrlPathChecker::new(Arc::new(catalog.source().await.unwrap()), URL_PATH);
    let problems = checker.check().await.unwrap();

    let expected: Vec<ProblemRecord> = [(1, 2), (3, 0)]
        .into_iter()
        .map(|(id, store)| ProblemRecord {
            id: ProductId(id),
            sku: format!("sku {}", id),
            store_id: StoreId(store),
            problem: PROBLEM_DESCRIPTION.to_string(),
        })
        .collect();
    assert_eq!(problems, expected);
}

#[tokio::test]
async fn test_empty_store_row_hides_default_url_key() {
    // product 1 keeps "k" only at store 0; store 1 stores an empty value
    let problems = url_key_problems(2, &[(0, 1, "k"), (1, 1, ""), (1, 2, "k")]).await;
    assert!(problems.is_empty());
}

#[tokio::test]
async fn test_null_store_row_hides_default_url_key() {
    let catalog = catalog_with_rows(2, &[(0, 1, "k"), (1, 2, "k")]).await;
    catalog.set_value(URL_KEY, 1, 1, None).await.unwrap();

    let checker = UrlKeyChecker::new(Arc::new(catalog.source().await.unwrap()), URL_KEY);
    assert!(checker.check().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_url_path_is_reported() {
    let catalog = create_test_catalog()
        .await
        .unwrap()
        .with_stores_and_products(1, 2)
        .await
        .unwrap();
    catalog.set_value(URL_PATH, 0, 1, Some("")).await.unwrap();
    catalog.set_value(URL_PATH, 1, 2, Some("")).await.unwrap();

    let checker = UrlPathChecker::new(Arc::new(catalog.source().await.unwrap()), URL_PATH);
    let anchors: Vec<(ProductId, StoreId)> = checker
        .check()
        .await
        .unwrap()
        .iter()
        .map(|r| (r.id, r.store_id))
        .collect();

    assert_eq!(
        anchors,
        vec![(ProductId(1), StoreId(0)), (ProductId(2), StoreId(1))]
    );
}
