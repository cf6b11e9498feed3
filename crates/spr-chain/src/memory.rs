//! In-memory chain backend
//!
//! A [`ChainClient`] implementation carrying complete registry semantics
//! in process memory, for development and testing. State is not
//! persisted. Cloned handles (and handles from [`MemoryChain::with_sender`])
//! share one registry, so tests can act as several identities against
//! the same state.
//!
//! The backend hosts up to three contracts: the registry itself, an
//! optional call aggregator (absent by default, as on a local
//! development network), and an optional storage-service contract that
//! answers registry-address discovery.

use crate::wire::{
    self, ProductPayload, ProviderWithProduct, RegistryCall, StorageServiceCall,
    REVERT_ALREADY_REGISTERED, REVERT_CAPABILITY_MISMATCH, REVERT_INSUFFICIENT_FEE,
    REVERT_NOT_PROVIDER, REVERT_PRODUCT_EXISTS, REVERT_PRODUCT_NOT_FOUND,
    REVERT_PROVIDER_NOT_FOUND,
};
use async_trait::async_trait;
use spr_domain::ports::{Bytes, Call, CallOutcome, ChainClient};
use spr_domain::{Address, Error, ProductType, ProviderInfo, ProviderPage, Result, TxHash};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Stored capability pairs for one product
#[derive(Clone, Debug)]
struct StoredProduct {
    is_active: bool,
    capability_keys: Vec<String>,
    capability_values: Vec<String>,
}

/// One persisted provider record
#[derive(Clone, Debug)]
struct StoredProvider {
    info: ProviderInfo,
    products: HashMap<ProductType, StoredProduct>,
}

/// Registry contract state. `providers` is ordered by id so paginated
/// enumeration is deterministic; ids start at 1 and are never reused.
#[derive(Debug)]
struct RegistryState {
    providers: BTreeMap<u64, StoredProvider>,
    ids_by_address: HashMap<Address, u64>,
    next_id: u64,
    registration_fee: u128,
}

impl RegistryState {
    fn new(registration_fee: u128) -> Self {
        Self {
            providers: BTreeMap::new(),
            ids_by_address: HashMap::new(),
            next_id: 1,
            registration_fee,
        }
    }
}

/// In-memory chain backend with full registry semantics
#[derive(Clone)]
pub struct MemoryChain {
    registry: Address,
    aggregator: Option<Address>,
    storage_service: Option<Address>,
    sender: Address,
    state: Arc<RwLock<RegistryState>>,
    tx_counter: Arc<AtomicU64>,
}

impl MemoryChain {
    /// Create a backend hosting a registry at `registry`, sending
    /// transactions as `sender`. No aggregator or storage-service
    /// contract is deployed until configured.
    pub fn new(registry: Address, sender: Address) -> Self {
        Self {
            registry,
            aggregator: None,
            storage_service: None,
            sender,
            state: Arc::new(RwLock::new(RegistryState::new(0))),
            tx_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Deploy an aggregator contract at `address`
    pub fn with_aggregator(mut self, address: Address) -> Self {
        self.aggregator = Some(address);
        self
    }

    /// Deploy a storage-service contract at `address` that answers
    /// registry-address discovery
    pub fn with_storage_service(mut self, address: Address) -> Self {
        self.storage_service = Some(address);
        self
    }

    /// A handle over the same registry acting as another identity
    pub fn with_sender(&self, sender: Address) -> Self {
        let mut handle = self.clone();
        handle.sender = sender;
        handle
    }

    /// The registry contract's address
    pub fn registry_address(&self) -> Address {
        self.registry
    }

    /// Change the fee required by future registrations
    pub fn set_registration_fee(&self, fee: u128) {
        if let Ok(mut state) = self.state.write() {
            state.registration_fee = fee;
        }
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|_| Error::internal("registry state lock poisoned"))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|_| Error::internal("registry state lock poisoned"))
    }

    fn next_tx_hash(&self) -> TxHash {
        let n = self.tx_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHash::from_bytes(bytes)
    }

    /// Execute one read-only call against whichever contract it targets
    fn execute_read(&self, call: &Call) -> Result<Bytes> {
        if call.target == self.registry {
            return self.execute_registry_read(&RegistryCall::decode(&call.data)?);
        }
        if self.storage_service == Some(call.target) {
            let StorageServiceCall::ServiceProviderRegistry =
                StorageServiceCall::decode(&call.data)?;
            return wire::encode_return(&self.registry);
        }
        if self.aggregator == Some(call.target) {
            return self.execute_aggregate(&call.data);
        }
        Err(Error::registry_call(format!(
            "no contract deployed at {}",
            call.target
        )))
    }

    /// Execute an aggregated payload: every slot runs independently and
    /// failures are captured as flags, never propagated
    fn execute_aggregate(&self, data: &[u8]) -> Result<Bytes> {
        let calls = wire::decode_aggregate(data)?;
        let outcomes: Vec<CallOutcome> = calls
            .iter()
            .map(|sub| match self.execute_read(sub) {
                Ok(return_data) => CallOutcome {
                    success: true,
                    return_data,
                },
                Err(_) => CallOutcome {
                    success: false,
                    return_data: Vec::new(),
                },
            })
            .collect();
        wire::encode_aggregate_return(&outcomes)
    }

    fn execute_registry_read(&self, call: &RegistryCall) -> Result<Bytes> {
        let state = self.read_state()?;
        match call {
            RegistryCall::GetProvider { id } => {
                let info = state
                    .providers
                    .get(id)
                    .map_or_else(ProviderInfo::absent, |p| p.info.clone());
                wire::encode_return(&info)
            }
            RegistryCall::GetProviderByAddress { address } => {
                let info = state
                    .ids_by_address
                    .get(address)
                    .and_then(|id| state.providers.get(id))
                    .map_or_else(ProviderInfo::absent, |p| p.info.clone());
                wire::encode_return(&info)
            }
            RegistryCall::GetProviderIdByAddress { address } => {
                let id = state.ids_by_address.get(address).copied().unwrap_or(0);
                wire::encode_return(&id)
            }
            RegistryCall::GetProviderWithProduct { id, product_type } => {
                let provider = state
                    .providers
                    .get(id)
                    .ok_or_else(|| Error::revert(REVERT_PROVIDER_NOT_FOUND))?;
                let product = provider
                    .products
                    .get(product_type)
                    .ok_or_else(|| Error::revert(REVERT_PRODUCT_NOT_FOUND))?;
                wire::encode_return(&ProviderWithProduct {
                    info: provider.info.clone(),
                    product_type: *product_type,
                    is_active: product.is_active,
                    capability_keys: product.capability_keys.clone(),
                    capability_values: product.capability_values.clone(),
                })
            }
            RegistryCall::IsRegisteredProvider { address } => {
                wire::encode_return(&state.ids_by_address.contains_key(address))
            }
            RegistryCall::IsProviderActive { id } => {
                let active = state.providers.get(id).is_some_and(|p| p.info.active);
                wire::encode_return(&active)
            }
            RegistryCall::ProviderHasProduct { id, product_type } => {
                let has = state
                    .providers
                    .get(id)
                    .is_some_and(|p| p.products.contains_key(product_type));
                wire::encode_return(&has)
            }
            RegistryCall::GetProviderCount => {
                wire::encode_return(&(state.providers.len() as u64))
            }
            RegistryCall::ActiveProviderCount => {
                let count = state.providers.values().filter(|p| p.info.active).count() as u64;
                wire::encode_return(&count)
            }
            RegistryCall::RegistrationFee => wire::encode_return(&state.registration_fee),
            RegistryCall::GetAllActiveProviders { offset, limit } => {
                let page = paginate(
                    state.providers.values().filter(|p| p.info.active),
                    *offset,
                    *limit,
                );
                wire::encode_return(&page)
            }
            RegistryCall::GetProvidersByProductType {
                product_type,
                offset,
                limit,
            } => {
                // The product index deliberately includes inactive
                // providers; callers filter client-side.
                let page = paginate(
                    state
                        .providers
                        .values()
                        .filter(|p| p.products.contains_key(product_type)),
                    *offset,
                    *limit,
                );
                wire::encode_return(&page)
            }
            _ => Err(Error::invalid_argument(
                "state-changing entry point invoked via read-only call",
            )),
        }
    }

    fn execute_registry_write(&self, call: RegistryCall, value: u128) -> Result<()> {
        let sender = self.sender;
        let mut state = self.write_state()?;
        match call {
            RegistryCall::RegisterProvider {
                payee,
                name,
                description,
                initial_product,
            } => {
                if state.ids_by_address.contains_key(&sender) {
                    return Err(Error::revert(REVERT_ALREADY_REGISTERED));
                }
                if value < state.registration_fee {
                    return Err(Error::revert(REVERT_INSUFFICIENT_FEE));
                }
                let mut products = HashMap::new();
                if let Some(product) = initial_product {
                    let (product_type, stored) = validate_product(product)?;
                    products.insert(product_type, stored);
                }
                let id = state.next_id;
                state.next_id += 1;
                state.providers.insert(
                    id,
                    StoredProvider {
                        info: ProviderInfo {
                            id,
                            service_provider: sender,
                            payee,
                            name,
                            description,
                            active: true,
                        },
                        products,
                    },
                );
                state.ids_by_address.insert(sender, id);
                Ok(())
            }
            RegistryCall::UpdateProviderInfo { name, description } => {
                let provider = provider_of_mut(&mut state, sender)?;
                provider.info.name = name;
                provider.info.description = description;
                Ok(())
            }
            RegistryCall::RemoveProvider => {
                // Idempotent: removing an unregistered or already-removed
                // record is a successful no-op.
                if let Some(id) = state.ids_by_address.get(&sender).copied() {
                    if let Some(provider) = state.providers.get_mut(&id) {
                        provider.info.active = false;
                        provider.products.clear();
                    }
                }
                Ok(())
            }
            RegistryCall::AddProduct { product } => {
                let (product_type, stored) = validate_product(product)?;
                let provider = provider_of_mut(&mut state, sender)?;
                if provider.products.contains_key(&product_type) {
                    return Err(Error::revert(REVERT_PRODUCT_EXISTS));
                }
                provider.products.insert(product_type, stored);
                Ok(())
            }
            RegistryCall::UpdateProduct { product } => {
                let (product_type, stored) = validate_product(product)?;
                let provider = provider_of_mut(&mut state, sender)?;
                if !provider.products.contains_key(&product_type) {
                    return Err(Error::revert(REVERT_PRODUCT_NOT_FOUND));
                }
                provider.products.insert(product_type, stored);
                Ok(())
            }
            RegistryCall::RemoveProduct { product_type } => {
                let provider = provider_of_mut(&mut state, sender)?;
                provider.products.remove(&product_type);
                Ok(())
            }
            _ => Err(Error::invalid_argument(
                "read-only entry point submitted as a transaction",
            )),
        }
    }
}

/// Resolve the sender's record for a provider-scoped write
fn provider_of_mut<'a>(
    state: &'a mut RegistryState,
    sender: Address,
) -> Result<&'a mut StoredProvider> {
    let id = state
        .ids_by_address
        .get(&sender)
        .copied()
        .ok_or_else(|| Error::revert(REVERT_NOT_PROVIDER))?;
    state
        .providers
        .get_mut(&id)
        .ok_or_else(|| Error::revert(REVERT_NOT_PROVIDER))
}

fn validate_product(product: ProductPayload) -> Result<(ProductType, StoredProduct)> {
    if product.capability_keys.len() != product.capability_values.len() {
        return Err(Error::revert(REVERT_CAPABILITY_MISMATCH));
    }
    Ok((
        product.product_type,
        StoredProduct {
            is_active: true,
            capability_keys: product.capability_keys,
            capability_values: product.capability_values,
        },
    ))
}

fn paginate<'a, I>(matching: I, offset: u64, limit: u64) -> ProviderPage
where
    I: Iterator<Item = &'a StoredProvider>,
{
    let ids: Vec<u64> = matching.map(|p| p.info.id).collect();
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let page: Vec<u64> = ids.iter().skip(offset).take(limit).copied().collect();
    let has_more = ids.len() > offset.saturating_add(page.len());
    ProviderPage {
        ids: page,
        has_more,
    }
}

#[async_trait]
impl ChainClient for MemoryChain {
    async fn call(&self, call: Call) -> Result<Bytes> {
        self.execute_read(&call)
    }

    async fn send(&self, call: Call, value: u128) -> Result<TxHash> {
        if call.target != self.registry {
            return Err(Error::registry_call(format!(
                "no contract deployed at {}",
                call.target
            )));
        }
        self.execute_registry_write(RegistryCall::decode(&call.data)?, value)?;
        Ok(self.next_tx_hash())
    }

    fn sender(&self) -> Address {
        self.sender
    }
}
