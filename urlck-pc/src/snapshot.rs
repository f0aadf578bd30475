//! Assignment snapshot and the cache that builds it
//!
//! A [`Snapshot`] is the immutable input of the checkers: every store id,
//! every explicit attribute value and the SKU of every product involved.
//! [`AssignmentCache`] fetches it from a [`CatalogDataSource`] at most once
//! per run. Tests construct snapshots directly with [`Snapshot::new`].

use futures::future::try_join_all;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use urlck_common::{Error, ProductId, Result, Sku, StoreId};

use crate::model::{Assignment, FetchedValue};
use crate::source::CatalogDataSource;

/// Explicit attribute values of one run, plus the SKU lookup
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    store_ids: Vec<StoreId>,
    assignments: Vec<Assignment>,
    blank_overrides: Vec<(StoreId, ProductId)>,
    skus: HashMap<ProductId, Sku>,
}

impl Snapshot {
    /// Build a snapshot from explicit assignments
    ///
    /// Assignment order is kept and determines the order of records that
    /// share a (product, store) anchor. Fails with `Error::Consistency` when
    /// a (store, product) pair appears twice or a value is empty.
    pub fn new(
        store_ids: Vec<StoreId>,
        assignments: Vec<Assignment>,
        skus: HashMap<ProductId, Sku>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(assignments.len());
        for assignment in &assignments {
            if assignment.value.is_empty() {
                return Err(Error::Consistency(format!(
                    "Empty value for product {} at store {}",
                    assignment.product_id, assignment.store_id
                )));
            }
            if !seen.insert((assignment.store_id, assignment.product_id)) {
                return Err(Error::Consistency(format!(
                    "More than one value for product {} at store {}",
                    assignment.product_id, assignment.store_id
                )));
            }
        }

        Ok(Self {
            store_ids,
            assignments,
            blank_overrides: Vec::new(),
            skus,
        })
    }

    /// Record store-level rows that hold no value but still hide the default
    ///
    /// Fails with `Error::Consistency` for the default store or for a pair
    /// that already has an assignment.
    pub fn with_blank_overrides(mut self, blank_overrides: Vec<(StoreId, ProductId)>) -> Result<Self> {
        let assigned: HashSet<(StoreId, ProductId)> = self
            .assignments
            .iter()
            .map(|a| (a.store_id, a.product_id))
            .collect();

        for &(store_id, product_id) in &blank_overrides {
            if store_id.is_default() || assigned.contains(&(store_id, product_id)) {
                return Err(Error::Consistency(format!(
                    "Blank override for product {} at store {} conflicts with a stored value",
                    product_id, store_id
                )));
            }
        }

        self.blank_overrides = blank_overrides;
        Ok(self)
    }

    pub fn store_ids(&self) -> &[StoreId] {
        &self.store_ids
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// (store, product) pairs overridden with an empty or NULL value
    pub fn blank_overrides(&self) -> &[(StoreId, ProductId)] {
        &self.blank_overrides
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// SKU of a product referenced by this snapshot
    pub fn sku(&self, product_id: ProductId) -> Result<&Sku> {
        self.skus.get(&product_id).ok_or_else(|| {
            Error::Consistency(format!("No sku known for product {}", product_id))
        })
    }

    /// Distinct product ids, ascending
    pub fn product_ids(&self) -> Vec<ProductId> {
        distinct_product_ids(&self.assignments)
    }
}

/// Distinct product ids of some assignments, ascending
pub fn distinct_product_ids(assignments: &[Assignment]) -> Vec<ProductId> {
    assignments
        .iter()
        .map(|a| a.product_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Raw per-store fetch results for one attribute
#[derive(Debug, Clone, Default)]
pub struct FetchedStores {
    pub store_ids: Vec<StoreId>,
    pub rows: Vec<(StoreId, BTreeMap<ProductId, FetchedValue>)>,
}

impl FetchedStores {
    /// Rows stored at the store they were fetched for: every default row and
    /// every override, in store order then product id
    pub fn stored(&self) -> impl Iterator<Item = (StoreId, ProductId, &FetchedValue)> + '_ {
        self.rows.iter().flat_map(|(store_id, rows)| {
            let store_id = *store_id;
            rows.iter()
                .filter(move |(_, row)| store_id.is_default() || row.is_override)
                .map(move |(product_id, row)| (store_id, *product_id, row))
        })
    }
}

/// List the stores and fetch one attribute for all of them concurrently
pub async fn fetch_all_stores(
    source: &dyn CatalogDataSource,
    attribute_code: &str,
) -> Result<FetchedStores> {
    let store_ids = source.list_store_ids().await?;
    info!(
        attribute = attribute_code,
        stores = store_ids.len(),
        "Fetching attribute values"
    );

    // Stores are independent; every fetch must finish before scopes can
    // be computed.
    let rows = try_join_all(store_ids.iter().map(|&store_id| async move {
        let rows = source.fetch_assignments(attribute_code, store_id).await?;
        debug!(store_id = %store_id, rows = rows.len(), "Store values fetched");
        Ok::<_, Error>((store_id, rows))
    }))
    .await?;

    Ok(FetchedStores { store_ids, rows })
}

/// Explicit values split into usable assignments and blank overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitRows {
    pub assignments: Vec<Assignment>,
    pub blank_overrides: Vec<(StoreId, ProductId)>,
}

/// Turn per-store fetch results into explicit assignments
///
/// Default store rows are always explicit; rows of other stores count only
/// when flagged as overrides. A blank default is dropped, a blank override
/// is kept aside since it still hides the default at its store.
pub fn explicit_assignments(fetched: &FetchedStores) -> ExplicitRows {
    let mut explicit = ExplicitRows::default();
    for (store_id, product_id, row) in fetched.stored() {
        match row.value.as_deref() {
            Some(value) if !row.is_blank() => explicit
                .assignments
                .push(Assignment::new(store_id, product_id, value)),
            _ if !store_id.is_default() => explicit.blank_overrides.push((store_id, product_id)),
            _ => {}
        }
    }
    explicit
}

/// Write-once cache of the [`Snapshot`] for one attribute
pub struct AssignmentCache {
    source: Arc<dyn CatalogDataSource>,
    attribute_code: String,
    snapshot: OnceCell<Snapshot>,
}

impl AssignmentCache {
    pub fn new(source: Arc<dyn CatalogDataSource>, attribute_code: impl Into<String>) -> Self {
        Self {
            source,
            attribute_code: attribute_code.into(),
            snapshot: OnceCell::new(),
        }
    }

    pub fn attribute_code(&self) -> &str {
        &self.attribute_code
    }

    /// The snapshot, fetched on first call
    ///
    /// A failed fetch leaves the cache empty and is returned as is; nothing
    /// is retried.
    pub async fn snapshot(&self) -> Result<&Snapshot> {
        self.snapshot.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<Snapshot> {
        let fetched = fetch_all_stores(self.source.as_ref(), &self.attribute_code).await?;
        let explicit = explicit_assignments(&fetched);
        let product_ids = distinct_product_ids(&explicit.assignments);
        let skus = self.source.lookup_skus(&product_ids).await?;

        info!(
            assignments = explicit.assignments.len(),
            blank_overrides = explicit.blank_overrides.len(),
            products = product_ids.len(),
            "Assignment snapshot built"
        );

        Snapshot::new(fetched.store_ids, explicit.assignments, skus)?
            .with_blank_overrides(explicit.blank_overrides)
    }
}
