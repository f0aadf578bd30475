//! Catalog data sources
//!
//! A data source answers three questions for the checkers: which store views
//! exist, what value an attribute has per product at one store (and whether
//! that value is set there or inherited), and which SKU belongs to a product.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use urlck_common::{Error, ProductId, Result, Sku, StoreId};

use crate::model::FetchedValue;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCatalogSource;
pub use sqlite::SqliteCatalogSource;

/// Read access to the product catalog
#[async_trait]
pub trait CatalogDataSource: Send + Sync {
    /// All store ids, always including the default store
    async fn list_store_ids(&self) -> Result<Vec<StoreId>>;

    /// Values of `attribute_code` as seen by `store_id`
    ///
    /// For the default store only products with a non-NULL default value are
    /// returned. For any other store, every store-level row is returned with
    /// `is_override = true`, even when its value is empty or NULL. Products
    /// that merely inherit the default may be returned with
    /// `is_override = false` or omitted; a missing product never counts as an
    /// override. Empty values are returned as stored; callers decide whether
    /// they count.
    async fn fetch_assignments(
        &self,
        attribute_code: &str,
        store_id: StoreId,
    ) -> Result<BTreeMap<ProductId, FetchedValue>>;

    /// SKU of one product, `Error::NotFound` if the product is unknown
    async fn lookup_sku(&self, product_id: ProductId) -> Result<Sku>;

    /// SKUs of several products, failing on the first unknown id
    async fn lookup_skus(&self, product_ids: &[ProductId]) -> Result<HashMap<ProductId, Sku>> {
        let mut skus = HashMap::with_capacity(product_ids.len());
        for &product_id in product_ids {
            let sku = self.lookup_sku(product_id).await?;
            skus.insert(product_id, sku);
        }
        Ok(skus)
    }
}

pub(crate) fn unknown_product(product_id: ProductId) -> Error {
    Error::NotFound(format!("No product with id {}", product_id))
}
