//! Duplicated url_key detection
//!
//! Two products conflict when they carry the same url_key value at
//! assignments whose scopes share at least one store view. Each conflicting
//! pair is reported twice, once anchored at each side's raw row, so every
//! record points back at the exact (store, product) values involved.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use urlck_common::Result;

use super::Checker;
use crate::model::{sort_problems, Assignment, ProblemRecord};
use crate::scope::{ScopeResolver, ScopedAssignment};
use crate::snapshot::{AssignmentCache, Snapshot};
use crate::source::CatalogDataSource;

/// Problem text of a record anchored at one side of a conflicting pair
pub fn duplicated_problem(other: &Assignment) -> String {
    format!(
        "Product has a duplicated url_key value. It's the same as another product (ID: {}, Store: {})",
        other.product_id, other.store_id
    )
}

/// Find every pair of products sharing a value within overlapping scopes
///
/// Pure function of the snapshot: the same snapshot always yields the same
/// ordered records. Products never conflict with themselves. Every product
/// must have a SKU, conflicting or not.
pub fn find_duplicated_values(snapshot: &Snapshot) -> Result<Vec<ProblemRecord>> {
    for product_id in snapshot.product_ids() {
        snapshot.sku(product_id)?;
    }

    let resolver = ScopeResolver::new(snapshot);
    let scoped = resolver.resolve(snapshot);

    let mut by_value: BTreeMap<&str, Vec<&ScopedAssignment<'_>>> = BTreeMap::new();
    for entry in &scoped {
        by_value
            .entry(entry.assignment.value.as_str())
            .or_default()
            .push(entry);
    }

    let mut records = Vec::new();
    for group in by_value.values() {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a.assignment.product_id == b.assignment.product_id {
                    continue;
                }
                if !a.scope.intersects(&b.scope) {
                    continue;
                }

                records.push(duplicate_record(snapshot, a.assignment, b.assignment)?);
                records.push(duplicate_record(snapshot, b.assignment, a.assignment)?);
            }
        }
    }

    sort_problems(&mut records);
    Ok(records)
}

fn duplicate_record(
    snapshot: &Snapshot,
    anchor: &Assignment,
    other: &Assignment,
) -> Result<ProblemRecord> {
    Ok(ProblemRecord {
        id: anchor.product_id,
        sku: snapshot.sku(anchor.product_id)?.clone(),
        store_id: anchor.store_id,
        problem: duplicated_problem(other),
    })
}

/// Checks the url_key attribute for values shared between products
pub struct UrlKeyChecker {
    cache: AssignmentCache,
}

impl UrlKeyChecker {
    pub fn new(source: Arc<dyn CatalogDataSource>, attribute_code: impl Into<String>) -> Self {
        Self {
            cache: AssignmentCache::new(source, attribute_code),
        }
    }
}

#[async_trait]
impl Checker for UrlKeyChecker {
    fn name(&self) -> &'static str {
        "url-key"
    }

    fn description(&self) -> &'static str {
        "Checks data integrity of the values of the url_key product attribute."
    }

    async fn check(&self) -> Result<Vec<ProblemRecord>> {
        let snapshot = self.cache.snapshot().await?;
        let records = find_duplicated_values(snapshot)?;

        info!(
            attribute = self.cache.attribute_code(),
            problems = records.len(),
            "Duplicated value check finished"
        );
        Ok(records)
    }
}
