//! Catalog data source backed by the SQLite EAV tables
//!
//! Store-level values follow the usual EAV fallback: a row at the store wins
//! (even an empty or NULL one), otherwise the default row (store 0) is
//! inherited.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;
use urlck_common::{Error, ProductId, Result, Sku, StoreId, DEFAULT_STORE_ID};

use super::{unknown_product, CatalogDataSource};
use crate::model::FetchedValue;

/// Read-only catalog source over a SQLite connection pool
#[derive(Clone)]
pub struct SqliteCatalogSource {
    pool: SqlitePool,
}

impl SqliteCatalogSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn attribute_id(&self, attribute_code: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT attribute_id FROM eav_attribute WHERE attribute_code = ?",
        )
        .bind(attribute_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| fetch_error(&format!("attribute '{}'", attribute_code), e))?
        .ok_or_else(|| Error::NotFound(format!("No attribute with code '{}'", attribute_code)))
    }

    async fn fetch_default_values(&self, attribute_id: i64) -> sqlx::Result<Vec<ValueRow>> {
        sqlx::query_as(
            r#"
            SELECT entity_id, value, 0
            FROM catalog_product_entity_varchar
            WHERE attribute_id = ?
              AND store_id = 0
              AND value IS NOT NULL
            ORDER BY entity_id
            "#,
        )
        .bind(attribute_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn fetch_store_values(
        &self,
        attribute_id: i64,
        store_id: StoreId,
    ) -> sqlx::Result<Vec<ValueRow>> {
        sqlx::query_as(
            r#"
            SELECT entity_id, value, is_override
            FROM (
                SELECT e.entity_id AS entity_id,
                       CASE WHEN s.value_id IS NOT NULL THEN s.value ELSE d.value END AS value,
                       s.value_id IS NOT NULL AS is_override
                FROM catalog_product_entity e
                LEFT JOIN catalog_product_entity_varchar d
                       ON d.entity_id = e.entity_id
                      AND d.attribute_id = ?
                      AND d.store_id = 0
                LEFT JOIN catalog_product_entity_varchar s
                       ON s.entity_id = e.entity_id
                      AND s.attribute_id = ?
                      AND s.store_id = ?
            )
            WHERE is_override
               OR value IS NOT NULL
            ORDER BY entity_id
            "#,
        )
        .bind(attribute_id)
        .bind(attribute_id)
        .bind(i64::from(store_id.0))
        .fetch_all(&self.pool)
        .await
    }
}

/// (entity_id, value, is_override)
type ValueRow = (i64, Option<String>, i64);

fn fetch_error(what: &str, e: sqlx::Error) -> Error {
    Error::DataSource(format!("Failed to fetch {}: {}", what, e))
}

#[async_trait]
impl CatalogDataSource for SqliteCatalogSource {
    async fn list_store_ids(&self) -> Result<Vec<StoreId>> {
        let raw: Vec<i64> = sqlx::query_scalar("SELECT store_id FROM store ORDER BY store_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| fetch_error("store ids", e))?;

        let mut store_ids = BTreeSet::from([DEFAULT_STORE_ID]);
        for id in raw {
            store_ids.insert(StoreId::try_from(id)?);
        }

        Ok(store_ids.into_iter().collect())
    }

    async fn fetch_assignments(
        &self,
        attribute_code: &str,
        store_id: StoreId,
    ) -> Result<BTreeMap<ProductId, FetchedValue>> {
        let attribute_id = self.attribute_id(attribute_code).await?;

        let fetched = if store_id.is_default() {
            self.fetch_default_values(attribute_id).await
        } else {
            self.fetch_store_values(attribute_id, store_id).await
        };
        let rows = fetched.map_err(|e| {
            fetch_error(&format!("{} values for store {}", attribute_code, store_id), e)
        })?;

        debug!(
            attribute = attribute_code,
            store_id = %store_id,
            rows = rows.len(),
            "Fetched attribute values"
        );

        let mut values = BTreeMap::new();
        for (entity_id, value, is_override) in rows {
            values.insert(
                ProductId::try_from(entity_id)?,
                FetchedValue {
                    value,
                    is_override: is_override != 0,
                },
            );
        }
        Ok(values)
    }

    async fn lookup_sku(&self, product_id: ProductId) -> Result<Sku> {
        sqlx::query_scalar::<_, String>("SELECT sku FROM catalog_product_entity WHERE entity_id = ?")
            .bind(i64::from(product_id.0))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| fetch_error(&format!("sku of product {}", product_id), e))?
            .ok_or_else(|| unknown_product(product_id))
    }

    /// One pass over the product table instead of a query per product
    async fn lookup_skus(&self, product_ids: &[ProductId]) -> Result<HashMap<ProductId, Sku>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT entity_id, sku FROM catalog_product_entity")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| fetch_error("product skus", e))?;

        let mut all = HashMap::with_capacity(rows.len());
        for (entity_id, sku) in rows {
            all.insert(ProductId::try_from(entity_id)?, sku);
        }

        product_ids
            .iter()
            .map(|&id| {
                all.get(&id)
                    .cloned()
                    .map(|sku| (id, sku))
                    .ok_or_else(|| unknown_product(id))
            })
            .collect()
    }
}
