//! # urlck Common Library
//!
//! Shared code for the urlck catalog integrity checkers:
//! - Catalog identifiers (store ids, product ids)
//! - Error types
//! - Configuration loading and database path resolution
//! - Catalog database access and schema

pub mod config;
pub mod db;
pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::{ProductId, Sku, StoreId, DEFAULT_STORE_ID};
