//! Catalog identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store view identifier
///
/// Store `0` is the global default scope, see [`DEFAULT_STORE_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub u16);

/// The default (admin) store whose values every other store inherits
pub const DEFAULT_STORE_ID: StoreId = StoreId(0);

impl StoreId {
    pub fn is_default(self) -> bool {
        self == DEFAULT_STORE_ID
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for StoreId {
    type Error = crate::Error;

    fn try_from(raw: i64) -> crate::Result<Self> {
        u16::try_from(raw)
            .map(StoreId)
            .map_err(|_| crate::Error::Consistency(format!("Store id out of range: {}", raw)))
    }
}

/// Product entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ProductId {
    type Error = crate::Error;

    fn try_from(raw: i64) -> crate::Result<Self> {
        u32::try_from(raw)
            .map(ProductId)
            .map_err(|_| crate::Error::Consistency(format!("Product id out of range: {}", raw)))
    }
}

/// Product SKU, used for display only
pub type Sku = String;
