//! Integrity checkers
//!
//! Every checker is a one-shot, fail-fast computation over a catalog
//! snapshot: it either returns the complete, ordered list of problems or an
//! error, never a partial list.

use async_trait::async_trait;
use urlck_common::Result;

use crate::model::ProblemRecord;

pub mod url_key;
pub mod url_path;

pub use url_key::UrlKeyChecker;
pub use url_path::UrlPathChecker;

/// Checker trait - every integrity check implements this
#[async_trait]
pub trait Checker: Send + Sync {
    /// Short identifier, also the CLI subcommand (e.g. "url-key")
    fn name(&self) -> &'static str;

    /// One-line description for help output and logs
    fn description(&self) -> &'static str;

    /// Run the check
    ///
    /// # Returns
    /// * `Ok(records)` - Problems ordered by product id then store id; empty when the catalog is clean
    /// * `Err(_)` - Fetching the catalog failed or the data is inconsistent
    async fn check(&self) -> Result<Vec<ProblemRecord>>;
}
