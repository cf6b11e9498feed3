//! Registry Gateway
//!
//! Typed, minimal wrapper over the registry contract's entry points.
//! Performs argument shaping and result unwrapping only; retry and
//! backoff policy belongs to callers. Point lookups convert the
//! registry's zero-identity sentinel into `None` so absence is always a
//! value, never an error.

use spr_chain::wire::{
    self, ProductPayload, ProviderWithProduct, RegistryCall, StorageServiceCall,
    REVERT_INSUFFICIENT_FEE,
};
use serde::de::DeserializeOwned;
use spr_domain::ports::ChainClient;
use spr_domain::{Address, Error, ProductType, ProviderInfo, ProviderPage, Result, TxHash};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Where the gateway learns the registry contract's address
enum AddressSource {
    /// Supplied directly by configuration
    Static(Address),
    /// Discovered from the related storage-service contract
    Discover {
        /// Storage-service contract answering the discovery read
        storage_service: Address,
    },
}

/// Single point of access to the on-chain registry
///
/// The lazily-resolved registry address is the gateway's only cached
/// resource: resolved at most once per instance and read-only
/// afterwards, so one gateway is safe to share across concurrent calls.
pub struct RegistryGateway {
    chain: Arc<dyn ChainClient>,
    source: AddressSource,
    address: OnceCell<Address>,
}

impl RegistryGateway {
    /// Create a gateway against a known registry address
    pub fn new(chain: Arc<dyn ChainClient>, registry: Address) -> Self {
        Self {
            chain,
            source: AddressSource::Static(registry),
            address: OnceCell::new(),
        }
    }

    /// Create a gateway that discovers the registry address from the
    /// related storage-service contract on first use
    pub fn with_discovery(chain: Arc<dyn ChainClient>, storage_service: Address) -> Self {
        Self {
            chain,
            source: AddressSource::Discover { storage_service },
            address: OnceCell::new(),
        }
    }

    /// The identity writes are submitted from
    pub fn sender(&self) -> Address {
        self.chain.sender()
    }

    /// The registry contract's address, resolving it on first use
    pub async fn registry_address(&self) -> Result<Address> {
        self.address
            .get_or_try_init(|| async {
                match self.source {
                    AddressSource::Static(address) => Ok(address),
                    AddressSource::Discover { storage_service } => {
                        let call = StorageServiceCall::ServiceProviderRegistry
                            .to_call(storage_service)?;
                        let raw = self.chain.call(call).await?;
                        let address: Address = wire::decode_return(&raw)?;
                        debug!(%address, %storage_service, "discovered registry address");
                        Ok(address)
                    }
                }
            })
            .await
            .copied()
    }

    async fn read<T: DeserializeOwned>(&self, call: RegistryCall) -> Result<T> {
        let target = self.registry_address().await?;
        let raw = self.chain.call(call.to_call(target)?).await?;
        wire::decode_return(&raw)
    }

    async fn write(&self, call: RegistryCall, value: u128) -> Result<TxHash> {
        let target = self.registry_address().await?;
        self.chain.send(call.to_call(target)?, value).await
    }

    // -- point reads --

    /// Provider record by id; `None` when absent
    pub async fn get_provider(&self, id: u64) -> Result<Option<ProviderInfo>> {
        let info: ProviderInfo = self.read(RegistryCall::GetProvider { id }).await?;
        Ok(present(info))
    }

    /// Provider record by controlling address; `None` when absent
    pub async fn get_provider_by_address(&self, address: Address) -> Result<Option<ProviderInfo>> {
        let info: ProviderInfo = self
            .read(RegistryCall::GetProviderByAddress { address })
            .await?;
        Ok(present(info))
    }

    /// Provider id by controlling address; `None` when absent
    pub async fn get_provider_id_by_address(&self, address: Address) -> Result<Option<u64>> {
        let id: u64 = self
            .read(RegistryCall::GetProviderIdByAddress { address })
            .await?;
        Ok(if id == 0 { None } else { Some(id) })
    }

    /// Provider record plus one product's capability pairs in a single
    /// call - the building block for batched queries. Unlike the point
    /// reads above this reverts for a nonexistent id or product,
    /// surfacing as [`Error::RegistryCall`].
    pub async fn get_provider_with_product(
        &self,
        id: u64,
        product_type: ProductType,
    ) -> Result<ProviderWithProduct> {
        self.read(RegistryCall::GetProviderWithProduct { id, product_type })
            .await
    }

    // -- scalar reads --

    /// Whether an address controls a record
    pub async fn is_registered_provider(&self, address: Address) -> Result<bool> {
        self.read(RegistryCall::IsRegisteredProvider { address })
            .await
    }

    /// Whether a provider id exists and is active
    pub async fn is_provider_active(&self, id: u64) -> Result<bool> {
        self.read(RegistryCall::IsProviderActive { id }).await
    }

    /// Whether a provider offers a product type
    pub async fn provider_has_product(&self, id: u64, product_type: ProductType) -> Result<bool> {
        self.read(RegistryCall::ProviderHasProduct { id, product_type })
            .await
    }

    /// Total number of records ever registered
    pub async fn provider_count(&self) -> Result<u64> {
        self.read(RegistryCall::GetProviderCount).await
    }

    /// Number of currently-active records
    pub async fn active_provider_count(&self) -> Result<u64> {
        self.read(RegistryCall::ActiveProviderCount).await
    }

    /// The fee currently required to register
    ///
    /// The fee can change between blocks; re-read it immediately before
    /// every registration instead of caching it.
    pub async fn registration_fee(&self) -> Result<u128> {
        self.read(RegistryCall::RegistrationFee).await
    }

    // -- paginated reads --

    /// One page of active provider ids
    pub async fn get_all_active_providers(&self, offset: u64, limit: u64) -> Result<ProviderPage> {
        self.read(RegistryCall::GetAllActiveProviders { offset, limit })
            .await
    }

    /// One page of ids of providers carrying a product type; the
    /// registry's index may include inactive providers
    pub async fn get_providers_by_product_type(
        &self,
        product_type: ProductType,
        offset: u64,
        limit: u64,
    ) -> Result<ProviderPage> {
        self.read(RegistryCall::GetProvidersByProductType {
            product_type,
            offset,
            limit,
        })
        .await
    }

    // -- writes --

    /// Register the sender as a provider, paying `fee`
    ///
    /// Fails with [`Error::InsufficientFee`] when the paid amount is
    /// below the registry's current required fee.
    pub async fn register_provider(
        &self,
        payee: Address,
        name: &str,
        description: &str,
        initial_product: Option<ProductPayload>,
        fee: u128,
    ) -> Result<TxHash> {
        self.write(
            RegistryCall::RegisterProvider {
                payee,
                name: name.to_string(),
                description: description.to_string(),
                initial_product,
            },
            fee,
        )
        .await
        .map_err(|e| match e.revert_reason() {
            Some(REVERT_INSUFFICIENT_FEE) => {
                Error::insufficient_fee(format!("registry rejected a paid fee of {fee}"))
            }
            _ => e,
        })
    }

    /// Update the sender's name and description
    pub async fn update_provider_info(&self, name: &str, description: &str) -> Result<TxHash> {
        self.write(
            RegistryCall::UpdateProviderInfo {
                name: name.to_string(),
                description: description.to_string(),
            },
            0,
        )
        .await
    }

    /// Deactivate the sender's record; a no-op success when the sender
    /// is unregistered or already removed
    pub async fn remove_provider(&self) -> Result<TxHash> {
        self.write(RegistryCall::RemoveProvider, 0).await
    }

    /// Attach a new product to the sender's record
    pub async fn add_product(&self, product: ProductPayload) -> Result<TxHash> {
        self.write(RegistryCall::AddProduct { product }, 0).await
    }

    /// Replace an existing product's capability pairs
    pub async fn update_product(&self, product: ProductPayload) -> Result<TxHash> {
        self.write(RegistryCall::UpdateProduct { product }, 0).await
    }

    /// Detach a product from the sender's record
    pub async fn remove_product(&self, product_type: ProductType) -> Result<TxHash> {
        self.write(RegistryCall::RemoveProduct { product_type }, 0)
            .await
    }
}

/// Convert the wire-level zero sentinel into `None`
fn present(info: ProviderInfo) -> Option<ProviderInfo> {
    if info.is_absent() { None } else { Some(info) }
}
