//! Catalog database access
//!
//! The checkers only ever read the catalog. [`connect_readonly`] opens the
//! database with SQLite `mode=ro`; [`init_catalog_database`] creates an empty
//! catalog with the expected schema and is used to build fixtures.

pub mod init;

pub use init::*;

use crate::{Error, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Connect to the catalog database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Catalog database not found: {}",
            db_path.display()
        )));
    }

    // mode=ro: the checkers never write
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&db_url)
        .await?;

    info!("Connected to catalog database (read-only): {}", db_path.display());
    Ok(pool)
}
