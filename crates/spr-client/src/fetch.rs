//! Provider detail fetch strategies
//!
//! Two implementations of [`ProviderDetailSource`] share one assembly
//! routine, so the aggregated path and its sequential fallback apply
//! identical filtering and decoding rules by construction. Per-id
//! failures are absorbed here: an unreadable provider record drops that
//! id from the result set, an unreadable product yields a provider with
//! no products. Only whole-batch failures escalate.

use crate::batch::BatchAggregator;
use crate::gateway::RegistryGateway;
use async_trait::async_trait;
use spr_chain::wire::{self, ProviderWithProduct, RegistryCall, REVERT_PRODUCT_NOT_FOUND};
use spr_domain::ports::ProviderDetailSource;
use spr_domain::{
    codec, Product, ProductType, ProviderInfo, Result, ServiceProvider,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Assemble one resolved record from its two read results
///
/// The single decode routine both strategies go through. `info == None`
/// (failed or sentinel provider read) drops the id; an absent or
/// undecodable product yields a productless provider.
fn assemble_provider(
    info: Option<ProviderInfo>,
    product: Option<ProviderWithProduct>,
) -> Option<ServiceProvider> {
    let info = info?;
    if info.is_absent() {
        return None;
    }

    let mut products = HashMap::new();
    if let Some(raw) = product {
        match codec::decode_capabilities(&raw.capability_keys, &raw.capability_values) {
            Ok(decoded) => {
                products.insert(
                    raw.product_type,
                    Product {
                        product_type: raw.product_type,
                        is_active: raw.is_active,
                        capabilities: decoded.pairs,
                        offering: decoded.offering,
                    },
                );
            }
            Err(error) => {
                debug!(id = info.id, %error, "discarding undecodable product data");
            }
        }
    }

    Some(ServiceProvider {
        info,
        products,
    })
}

/// Detail source issuing one aggregated round trip per id batch
///
/// Emits exactly two calls per id - provider record and combined
/// product read - so outcome slots `2i`/`2i+1` map back to `ids[i]`.
pub struct AggregatedDetailSource {
    gateway: Arc<RegistryGateway>,
    batch: Arc<BatchAggregator>,
    product_type: ProductType,
}

impl AggregatedDetailSource {
    /// Create an aggregated source fetching `product_type` details
    pub fn new(
        gateway: Arc<RegistryGateway>,
        batch: Arc<BatchAggregator>,
        product_type: ProductType,
    ) -> Self {
        Self {
            gateway,
            batch,
            product_type,
        }
    }
}

#[async_trait]
impl ProviderDetailSource for AggregatedDetailSource {
    async fn fetch_details(&self, ids: &[u64]) -> Result<Vec<ServiceProvider>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let registry = self.gateway.registry_address().await?;

        let mut calls = Vec::with_capacity(ids.len() * 2);
        for &id in ids {
            calls.push(RegistryCall::GetProvider { id }.to_call(registry)?);
            calls.push(
                RegistryCall::GetProviderWithProduct {
                    id,
                    product_type: self.product_type,
                }
                .to_call(registry)?,
            );
        }

        let outcomes = self.batch.try_aggregate(calls).await?;

        let mut providers = Vec::with_capacity(ids.len());
        for (i, &id) in ids.iter().enumerate() {
            let info_slot = &outcomes[2 * i];
            let product_slot = &outcomes[2 * i + 1];

            let info = if info_slot.success {
                match wire::decode_return::<ProviderInfo>(&info_slot.return_data) {
                    Ok(info) => Some(info),
                    Err(error) => {
                        debug!(id, %error, "dropping id with undecodable provider record");
                        None
                    }
                }
            } else {
                None
            };
            let product = if product_slot.success {
                wire::decode_return::<ProviderWithProduct>(&product_slot.return_data).ok()
            } else {
                None
            };

            if let Some(provider) = assemble_provider(info, product) {
                providers.push(provider);
            }
        }
        Ok(providers)
    }

    fn source_name(&self) -> &'static str {
        "aggregated"
    }
}

/// Detail source issuing two gateway point reads per id
///
/// The degradation path when no aggregator is usable: O(2N) round trips
/// instead of one, same filtering and decoding rules.
pub struct SequentialDetailSource {
    gateway: Arc<RegistryGateway>,
    product_type: ProductType,
}

impl SequentialDetailSource {
    /// Create a sequential source fetching `product_type` details
    pub fn new(gateway: Arc<RegistryGateway>, product_type: ProductType) -> Self {
        Self {
            gateway,
            product_type,
        }
    }
}

#[async_trait]
impl ProviderDetailSource for SequentialDetailSource {
    async fn fetch_details(&self, ids: &[u64]) -> Result<Vec<ServiceProvider>> {
        let mut providers = Vec::with_capacity(ids.len());
        for &id in ids {
            let info = match self.gateway.get_provider(id).await {
                Ok(info) => info,
                Err(error) => {
                    debug!(id, %error, "dropping id with unreadable provider record");
                    None
                }
            };
            if info.is_none() {
                continue;
            }

            let product = match self
                .gateway
                .get_provider_with_product(id, self.product_type)
                .await
            {
                Ok(product) => Some(product),
                Err(error) => {
                    if error.revert_reason() != Some(REVERT_PRODUCT_NOT_FOUND) {
                        debug!(id, %error, "product read failed, resolving provider without products");
                    }
                    None
                }
            };

            if let Some(provider) = assemble_provider(info, product) {
                providers.push(provider);
            }
        }
        Ok(providers)
    }

    fn source_name(&self) -> &'static str {
        "sequential"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spr_domain::Address;

    #[test]
    fn sentinel_info_drops_the_record() {
        assert!(assemble_provider(Some(ProviderInfo::absent()), None).is_none());
        assert!(assemble_provider(None, None).is_none());
    }

    #[test]
    fn undecodable_product_keeps_the_provider() {
        let info = ProviderInfo {
            id: 3,
            service_provider: Address::from_bytes([7u8; 20]),
            payee: Address::from_bytes([7u8; 20]),
            name: "p".to_string(),
            description: String::new(),
            active: true,
        };
        let product = ProviderWithProduct {
            info: info.clone(),
            product_type: ProductType::Pdp,
            is_active: true,
            capability_keys: vec![spr_domain::keys::CAP_MIN_PIECE_SIZE.to_string()],
            capability_values: vec!["not-a-number".to_string()],
        };
        let provider = assemble_provider(Some(info), Some(product)).expect("provider kept");
        assert!(provider.products.is_empty());
    }
}
