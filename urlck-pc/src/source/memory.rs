//! In-memory catalog, used for fixtures and tests

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use urlck_common::{Error, ProductId, Result, Sku, StoreId, DEFAULT_STORE_ID};

use super::{unknown_product, CatalogDataSource};
use crate::model::FetchedValue;

/// Catalog held in memory
///
/// Behaves like the database source: non-default stores report inherited
/// values with `is_override = false`, and a store-level row always wins over
/// the default, even when it is empty or NULL.
#[derive(Debug, Clone)]
pub struct MemoryCatalogSource {
    store_ids: BTreeSet<StoreId>,
    skus: BTreeMap<ProductId, Sku>,
    values: BTreeMap<(String, StoreId, ProductId), Option<String>>,
}

impl Default for MemoryCatalogSource {
    fn default() -> Self {
        Self {
            store_ids: BTreeSet::from([DEFAULT_STORE_ID]),
            skus: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }
}

impl MemoryCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store_id: StoreId) -> Self {
        self.store_ids.insert(store_id);
        self
    }

    pub fn with_product(mut self, product_id: ProductId, sku: impl Into<Sku>) -> Self {
        self.skus.insert(product_id, sku.into());
        self
    }

    /// Store a raw attribute value at one store; the store is registered too
    pub fn with_value(
        mut self,
        attribute_code: &str,
        store_id: StoreId,
        product_id: ProductId,
        value: impl Into<String>,
    ) -> Self {
        self.store_ids.insert(store_id);
        self.values.insert(
            (attribute_code.to_string(), store_id, product_id),
            Some(value.into()),
        );
        self
    }

    /// Store a row holding NULL
    pub fn with_null_value(
        mut self,
        attribute_code: &str,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Self {
        self.store_ids.insert(store_id);
        self.values
            .insert((attribute_code.to_string(), store_id, product_id), None);
        self
    }

    fn raw_value(
        &self,
        attribute_code: &str,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Option<&Option<String>> {
        self.values
            .get(&(attribute_code.to_string(), store_id, product_id))
    }
}

#[async_trait]
impl CatalogDataSource for MemoryCatalogSource {
    async fn list_store_ids(&self) -> Result<Vec<StoreId>> {
        Ok(self.store_ids.iter().copied().collect())
    }

    async fn fetch_assignments(
        &self,
        attribute_code: &str,
        store_id: StoreId,
    ) -> Result<BTreeMap<ProductId, FetchedValue>> {
        if !self.store_ids.contains(&store_id) {
            return Err(Error::DataSource(format!("Unknown store {}", store_id)));
        }

        let mut rows = BTreeMap::new();
        for &product_id in self.skus.keys() {
            let row = if store_id.is_default() {
                match self.raw_value(attribute_code, store_id, product_id) {
                    Some(Some(value)) => FetchedValue::new(value.clone(), false),
                    _ => continue,
                }
            } else {
                match self.raw_value(attribute_code, store_id, product_id) {
                    Some(value) => FetchedValue {
                        value: value.clone(),
                        is_override: true,
                    },
                    None => match self.raw_value(attribute_code, DEFAULT_STORE_ID, product_id) {
                        Some(Some(value)) => FetchedValue::new(value.clone(), false),
                        _ => continue,
                    },
                }
            };

            rows.insert(product_id, row);
        }

        Ok(rows)
    }

    async fn lookup_sku(&self, product_id: ProductId) -> Result<Sku> {
        self.skus
            .get(&product_id)
            .cloned()
            .ok_or_else(|| unknown_product(product_id))
    }
}
