//! Catalog schema creation
//!
//! Minimal Magento-style EAV layout holding everything the checkers read:
//! stores, product entities, attribute codes and per-store varchar values.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Create (or open) a writable catalog database with the expected schema
pub async fn init_catalog_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new catalog database: {}", db_path.display());
    } else {
        info!("Opened existing catalog database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    create_catalog_schema(&pool).await?;

    Ok(pool)
}

/// Create all catalog tables (idempotent)
pub async fn create_catalog_schema(pool: &SqlitePool) -> Result<()> {
    create_store_table(pool).await?;
    create_product_entity_table(pool).await?;
    create_attribute_table(pool).await?;
    create_product_varchar_table(pool).await?;
    Ok(())
}

async fn create_store_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS store (
            store_id INTEGER PRIMARY KEY,
            code TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // The default scope always exists
    sqlx::query("INSERT OR IGNORE INTO store (store_id, code) VALUES (0, 'admin')")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_product_entity_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catalog_product_entity (
            entity_id INTEGER PRIMARY KEY,
            sku TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_attribute_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS eav_attribute (
            attribute_id INTEGER PRIMARY KEY,
            attribute_code TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO eav_attribute (attribute_code) VALUES ('url_key'), ('url_path')",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_product_varchar_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catalog_product_entity_varchar (
            value_id INTEGER PRIMARY KEY AUTOINCREMENT,
            attribute_id INTEGER NOT NULL REFERENCES eav_attribute(attribute_id),
            store_id INTEGER NOT NULL REFERENCES store(store_id),
            entity_id INTEGER NOT NULL REFERENCES catalog_product_entity(entity_id),
            value TEXT,
            UNIQUE (attribute_id, store_id, entity_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
