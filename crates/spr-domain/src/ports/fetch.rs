//! Provider Detail Source Port
//!
//! Strategy seam over "fetch full provider records for a set of ids".
//! Two implementations exist: one aggregated round trip per id batch,
//! and a sequential per-id fallback. Both share one decode routine and
//! must produce identical result sets for identical registry state.

use crate::error::Result;
use crate::types::ServiceProvider;
use async_trait::async_trait;

/// Fetches fully-decoded provider records for a list of registry ids
#[async_trait]
pub trait ProviderDetailSource: Send + Sync {
    /// Resolve records for `ids`, preserving id order
    ///
    /// Ids that do not resolve to a registered provider are omitted, not
    /// errors; a provider whose product data cannot be read comes back
    /// with no products.
    async fn fetch_details(&self, ids: &[u64]) -> Result<Vec<ServiceProvider>>;

    /// A short identifier for logs (e.g. "aggregated", "sequential")
    fn source_name(&self) -> &'static str;
}
