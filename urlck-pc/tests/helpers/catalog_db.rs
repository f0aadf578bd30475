//! Catalog database fixtures
//!
//! Builds a throwaway catalog in a temp directory. Writes go through a
//! writable pool; checkers read through `connect_readonly` like the binary.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;
use urlck_common::db::{connect_readonly, init_catalog_database};
use urlck_pc::source::SqliteCatalogSource;

pub const URL_KEY: &str = "url_key";
pub const URL_PATH: &str = "url_path";

/// Temporary catalog database - TempDir must be kept alive for duration of test
pub struct TestCatalog {
    _dir: TempDir,
    pub path: PathBuf,
    pub pool: SqlitePool,
}

/// Create an empty catalog (default store and attributes only)
pub async fn create_test_catalog() -> Result<TestCatalog> {
    let dir = TempDir::new()?;
    let path = dir.path().join("catalog.db");
    let pool = init_catalog_database(&path).await?;

    Ok(TestCatalog {
        _dir: dir,
        path,
        pool,
    })
}

impl TestCatalog {
    pub async fn add_store(&self, store_id: u16, code: &str) -> Result<()> {
        sqlx::query("INSERT INTO store (store_id, code) VALUES (?, ?)")
            .bind(i64::from(store_id))
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn add_product(&self, entity_id: u32, sku: &str) -> Result<()> {
        sqlx::query("INSERT INTO catalog_product_entity (entity_id, sku) VALUES (?, ?)")
            .bind(i64::from(entity_id))
            .bind(sku)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Write a raw attribute row; `None` stores NULL
    pub async fn set_value(
        &self,
        attribute_code: &str,
        store_id: u16,
        entity_id: u32,
        value: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_product_entity_varchar (attribute_id, store_id, entity_id, value)
            SELECT attribute_id, ?, ?, ? FROM eav_attribute WHERE attribute_code = ?
            "#,
        )
        .bind(i64::from(store_id))
        .bind(i64::from(entity_id))
        .bind(value)
        .bind(attribute_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Stores 1..=count plus products 1..=count named "sku N"
    pub async fn with_stores_and_products(self, stores: u16, products: u32) -> Result<Self> {
        for store_id in 1..=stores {
            self.add_store(store_id, &format!("store_{}", store_id)).await?;
        }
        for entity_id in 1..=products {
            self.add_product(entity_id, &format!("sku {}", entity_id)).await?;
        }
        Ok(self)
    }

    /// Read-only source over the same file
    pub async fn source(&self) -> Result<SqliteCatalogSource> {
        let pool = connect_readonly(&self.path).await?;
        Ok(SqliteCatalogSource::new(pool))
    }
}
