//! Non-null url_path detection
//!
//! Any explicit url_path value (default row or store override) that is not
//! NULL is reported, the empty string included. Inherited values are not,
//! since the store they surface at has nothing to remove.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use urlck_common::{Error, ProductId, Result, Sku};

use super::Checker;
use crate::model::{sort_problems, Assignment, ProblemRecord};
use crate::snapshot::{distinct_product_ids, fetch_all_stores, FetchedStores};
use crate::source::CatalogDataSource;

pub const PROBLEM_DESCRIPTION: &str = "Product has a non-null url_path attribute, this is known to cause problems with url rewrites in Magento. It's advised to remove this value from the database.";

/// Explicit rows whose value is not NULL
pub fn non_null_rows(fetched: &FetchedStores) -> Vec<Assignment> {
    fetched
        .stored()
        .filter_map(|(store_id, product_id, row)| {
            row.value
                .as_deref()
                .map(|value| Assignment::new(store_id, product_id, value))
        })
        .collect()
}

/// One record per non-NULL explicit row
pub fn find_non_null_values(
    rows: &[Assignment],
    skus: &HashMap<ProductId, Sku>,
) -> Result<Vec<ProblemRecord>> {
    let mut records = rows
        .iter()
        .map(|row| {
            let sku = skus.get(&row.product_id).ok_or_else(|| {
                Error::Consistency(format!("No sku known for product {}", row.product_id))
            })?;
            Ok(ProblemRecord {
                id: row.product_id,
                sku: sku.clone(),
                store_id: row.store_id,
                problem: PROBLEM_DESCRIPTION.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    sort_problems(&mut records);
    Ok(records)
}

/// Checks for url_path values that should not be stored at all
pub struct UrlPathChecker {
    source: Arc<dyn CatalogDataSource>,
    attribute_code: String,
}

impl UrlPathChecker {
    pub fn new(source: Arc<dyn CatalogDataSource>, attribute_code: impl Into<String>) -> Self {
        Self {
            source,
            attribute_code: attribute_code.into(),
        }
    }
}

#[async_trait]
impl Checker for UrlPathChecker {
    fn name(&self) -> &'static str {
        "url-path"
    }

    fn description(&self) -> &'static str {
        "Checks data integrity of the values of the url_path product attribute."
    }

    async fn check(&self) -> Result<Vec<ProblemRecord>> {
        let fetched = fetch_all_stores(self.source.as_ref(), &self.attribute_code).await?;
        let rows = non_null_rows(&fetched);
        let skus = self
            .source
            .lookup_skus(&distinct_product_ids(&rows))
            .await?;
        let records = find_non_null_values(&rows, &skus)?;

        info!(
            attribute = %self.attribute_code,
            problems = records.len(),
            "Non-null value check finished"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryCatalogSource;
    use urlck_common::StoreId;

    const URL_PATH: &str = "url_path";

    fn anchors(records: &[ProblemRecord]) -> Vec<(ProductId, StoreId)> {
        records.iter().map(|r| (r.id, r.store_id)).collect()
    }

    #[tokio::test]
    async fn test_reports_defaults_and_overrides_only() {
        let source = MemoryCatalogSource::new()
            .with_store(StoreId(2))
            .with_product(ProductId(1), "sku 1")
            .with_product(ProductId(2), "sku 2")
            .with_product(ProductId(3), "sku 3")
            .with_value(URL_PATH, StoreId(1), ProductId(2), "store/path")
            .with_value(URL_PATH, StoreId(0), ProductId(1), "default/path");

        let checker = UrlPathChecker::new(Arc::new(source), URL_PATH);
        let records = checker.check().await.unwrap();

        assert_eq!(
            anchors(&records),
            vec![(ProductId(1), StoreId(0)), (ProductId(2), StoreId(1))]
        );
        assert!(records.iter().all(|r| r.problem == PROBLEM_DESCRIPTION));
        assert_eq!(records[1].sku, "sku 2");
    }

    #[tokio::test]
    async fn test_empty_string_is_reported_and_null_is_not() {
        let source = MemoryCatalogSource::new()
            .with_product(ProductId(1), "sku 1")
            .with_product(ProductId(2), "sku 2")
            .with_value(URL_PATH, StoreId(0), ProductId(1), "")
            .with_value(URL_PATH, StoreId(1), ProductId(2), "")
            .with_null_value(URL_PATH, StoreId(0), ProductId(2))
            .with_null_value(URL_PATH, StoreId(2), ProductId(1));

        let checker = UrlPathChecker::new(Arc::new(source), URL_PATH);
        let records = checker.check().await.unwrap();

        assert_eq!(
            anchors(&records),
            vec![(ProductId(1), StoreId(0)), (ProductId(2), StoreId(1))]
        );
    }

    #[test]
    fn test_missing_sku_is_consistency_error() {
        let rows = vec![Assignment::new(StoreId(0), ProductId(4), "p")];
        assert!(matches!(
            find_non_null_values(&rows, &HashMap::new()),
            Err(Error::Consistency(_))
        ));
    }

    #[tokio::test]
    async fn test_clean_catalog() {
        let source = MemoryCatalogSource::new().with_product(ProductId(1), "sku 1");
        let checker = UrlPathChecker::new(Arc::new(source), URL_PATH);

        assert!(checker.check().await.unwrap().is_empty());
        assert_eq!(checker.name(), "url-path");
    }
}
