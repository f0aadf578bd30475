//! Tests for catalog database creation

use std::path::PathBuf;
use tempfile::TempDir;
use urlck_common::db::init::init_catalog_database;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("catalog.db");
    (dir, path)
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let (_dir, db_path) = temp_db();

    let result = init_catalog_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let (_dir, db_path) = temp_db();

    let pool1 = init_catalog_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_catalog_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_default_store_and_attributes_seeded() {
    let (_dir, db_path) = temp_db();
    let pool = init_catalog_database(&db_path).await.unwrap();

    let admin: String = sqlx::query_scalar("SELECT code FROM store WHERE store_id = 0")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(admin, "admin");

    let codes: Vec<String> =
        sqlx::query_scalar("SELECT attribute_code FROM eav_attribute ORDER BY attribute_code")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(codes, vec!["url_key".to_string(), "url_path".to_string()]);
}

#[tokio::test]
async fn test_one_value_per_store_and_product() {
    let (_dir, db_path) = temp_db();
    let pool = init_catalog_database(&db_path).await.unwrap();

    sqlx::query("INSERT INTO catalog_product_entity (entity_id, sku) VALUES (1, 'sku 1')")
        .execute(&pool)
        .await
        .unwrap();

    let insert = "INSERT INTO catalog_product_entity_varchar (attribute_id, store_id, entity_id, value) \
                  SELECT attribute_id, 0, 1, ? FROM eav_attribute WHERE attribute_code = 'url_key'";

    sqlx::query(insert).bind("first").execute(&pool).await.unwrap();
    let duplicate = sqlx::query(insert).bind("second").execute(&pool).await;

    assert!(duplicate.is_err(), "Second value for same store/product should be rejected");
}
