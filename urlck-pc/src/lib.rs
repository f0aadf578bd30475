//! urlck-pc library - Product Catalog URL integrity checks
//!
//! Detects products whose `url_key` collides with another product in an
//! overlapping set of store views, and products carrying a non-null
//! `url_path` value. Read-only: nothing is ever corrected.
//!
//! Pipeline: [`source::CatalogDataSource`] → [`snapshot::AssignmentCache`] →
//! [`scope::ScopeResolver`] → [`checker::url_key::find_duplicated_values`] →
//! [`report`].

pub mod checker;
pub mod model;
pub mod report;
pub mod scope;
pub mod snapshot;
pub mod source;

pub use checker::{Checker, UrlKeyChecker, UrlPathChecker};
pub use model::{Assignment, FetchedValue, ProblemRecord};
pub use snapshot::{AssignmentCache, Snapshot};
