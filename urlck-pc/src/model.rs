//! Catalog value and problem record types

use serde::Serialize;
use urlck_common::{ProductId, Sku, StoreId};

/// One row returned by a per-store attribute fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedValue {
    /// `None` only for a store-level row holding NULL
    pub value: Option<String>,
    /// `true` when the value is set at the fetched store itself, `false`
    /// when the store only inherits the default
    pub is_override: bool,
}

impl FetchedValue {
    pub fn new(value: impl Into<String>, is_override: bool) -> Self {
        Self {
            value: Some(value.into()),
            is_override,
        }
    }

    /// Store-level row whose value is NULL; it still hides the default
    pub fn null_override() -> Self {
        Self {
            value: None,
            is_override: true,
        }
    }

    /// NULL or empty
    pub fn is_blank(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }
}

/// An explicit attribute value: the default row of a product or an override
/// at one store view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub value: String,
}

impl Assignment {
    pub fn new(store_id: StoreId, product_id: ProductId, value: impl Into<String>) -> Self {
        Self {
            store_id,
            product_id,
            value: value.into(),
        }
    }

    /// Anything not stored at the default scope overrides it
    pub fn is_override(&self) -> bool {
        !self.store_id.is_default()
    }
}

/// One reported problem, anchored at a raw (store, product) row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemRecord {
    pub id: ProductId,
    pub sku: Sku,
    #[serde(rename = "storeId")]
    pub store_id: StoreId,
    pub problem: String,
}

/// Order records by product, then store
///
/// Stable, so records sharing both keys keep their generation order.
pub fn sort_problems(records: &mut [ProblemRecord]) {
    records.sort_by_key(|r| (r.id, r.store_id));
}
