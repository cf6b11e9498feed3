//! Provider Resolver
//!
//! Set-oriented queries over the registry without exposing pagination
//! to callers. The pagination cursor advances serially - each iteration
//! only waits for the next id page - while every page's detail fetch is
//! dispatched immediately as its own task, so total latency is
//! dominated by the number of pages, not the number of providers. The
//! join point re-imposes page order before returning.
//!
//! When the aggregated detail path fails for any reason the resolver
//! transparently substitutes the sequential per-id strategy; callers
//! only ever observe the degradation through a warning log.

use crate::batch::BatchAggregator;
use crate::fetch::{AggregatedDetailSource, SequentialDetailSource};
use crate::gateway::RegistryGateway;
use spr_domain::ports::ProviderDetailSource;
use spr_domain::{Address, Error, ProductType, Result, ServiceProvider};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Ids requested per page. Conservative so one page's aggregated fetch
/// stays under the aggregator's per-call size envelope; tunable, not a
/// correctness parameter.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Which paginated index a listing walks
#[derive(Clone, Copy)]
enum Listing {
    Active,
    ByProductType(ProductType),
}

/// Answers "give me providers matching X" over the paginated registry
pub struct ProviderResolver {
    gateway: Arc<RegistryGateway>,
    aggregated: Arc<dyn ProviderDetailSource>,
    sequential: Arc<dyn ProviderDetailSource>,
    page_size: u64,
}

impl ProviderResolver {
    /// Create a resolver over a gateway and batch aggregator
    pub fn new(gateway: Arc<RegistryGateway>, batch: Arc<BatchAggregator>) -> Self {
        let aggregated = Arc::new(AggregatedDetailSource::new(
            gateway.clone(),
            batch,
            ProductType::Pdp,
        ));
        let sequential = Arc::new(SequentialDetailSource::new(
            gateway.clone(),
            ProductType::Pdp,
        ));
        Self {
            gateway,
            aggregated,
            sequential,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size (must be positive)
    pub fn with_page_size(mut self, page_size: u64) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid_argument("page size must be positive"));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// All active providers, fully resolved
    pub async fn list_active(&self) -> Result<Vec<ServiceProvider>> {
        self.list(Listing::Active).await
    }

    /// All providers offering `product_type`
    ///
    /// The registry's product index may include inactive providers, so
    /// records whose `active` flag is false are discarded client-side.
    pub async fn list_by_product_type(
        &self,
        product_type: ProductType,
    ) -> Result<Vec<ServiceProvider>> {
        let mut providers = self.list(Listing::ByProductType(product_type)).await?;
        providers.retain(|p| p.info.active);
        Ok(providers)
    }

    /// One fully-resolved provider by id; `None` when absent
    pub async fn get_provider(&self, id: u64) -> Result<Option<ServiceProvider>> {
        if id == 0 {
            return Ok(None);
        }
        let providers =
            fetch_page_details(self.aggregated.clone(), self.sequential.clone(), vec![id]).await?;
        Ok(providers.into_iter().next())
    }

    /// One fully-resolved provider by controlling address; `None` when
    /// absent
    pub async fn get_provider_by_address(
        &self,
        address: Address,
    ) -> Result<Option<ServiceProvider>> {
        match self.gateway.get_provider_id_by_address(address).await? {
            Some(id) => self.get_provider(id).await,
            None => Ok(None),
        }
    }

    /// Walk one paginated index, overlapping every page's detail fetch
    ///
    /// A page-fetch failure aborts the whole listing; detail tasks
    /// already dispatched are left to finish or be dropped with the
    /// handles - there is no cancellation primitive here.
    async fn list(&self, listing: Listing) -> Result<Vec<ServiceProvider>> {
        let mut tasks: Vec<JoinHandle<Result<Vec<ServiceProvider>>>> = Vec::new();
        let mut offset = 0u64;

        loop {
            let page = match listing {
                Listing::Active => {
                    self.gateway
                        .get_all_active_providers(offset, self.page_size)
                        .await?
                }
                Listing::ByProductType(product_type) => {
                    self.gateway
                        .get_providers_by_product_type(product_type, offset, self.page_size)
                        .await?
                }
            };

            if !page.ids.is_empty() {
                let aggregated = self.aggregated.clone();
                let sequential = self.sequential.clone();
                let ids = page.ids;
                tasks.push(tokio::spawn(async move {
                    fetch_page_details(aggregated, sequential, ids).await
                }));
            }

            if !page.has_more {
                break;
            }
            offset += self.page_size;
        }

        let mut providers = Vec::new();
        for task in tasks {
            let page = task
                .await
                .map_err(|e| Error::internal(format!("page detail task failed: {e}")))??;
            providers.extend(page);
        }
        Ok(providers)
    }
}

/// Fetch one page's details, falling back to sequential point reads
/// when the aggregated path fails for any reason
async fn fetch_page_details(
    aggregated: Arc<dyn ProviderDetailSource>,
    sequential: Arc<dyn ProviderDetailSource>,
    ids: Vec<u64>,
) -> Result<Vec<ServiceProvider>> {
    match aggregated.fetch_details(&ids).await {
        Ok(providers) => Ok(providers),
        Err(error) => {
            warn!(
                %error,
                fallback = sequential.source_name(),
                "aggregated detail fetch failed, degrading to per-id reads"
            );
            sequential.fetch_details(&ids).await
        }
    }
}
