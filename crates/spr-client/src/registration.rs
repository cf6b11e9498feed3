//! Registration workflow
//!
//! Registers the sender as a provider or routes to the update path when
//! a record already exists, skipping every write whose target value is
//! already on chain. The registration fee is re-read immediately before
//! submission - it is a read-before-write value that can change, so
//! caching it would race the registry. Awaiting confirmation and
//! extracting the assigned id stay with the chain-client collaborator.

use crate::gateway::RegistryGateway;
use spr_chain::wire::{ProductPayload, REVERT_PRODUCT_NOT_FOUND};
use spr_domain::{
    codec, Address, ProductType, Result, ServiceOffering, TxHash,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Desired registry state for one provider
#[derive(Clone, Debug)]
pub struct ProviderRegistration {
    /// Payment destination; may differ from the sending identity
    pub payee: Address,

    /// Provider name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Product the offering applies to
    pub product_type: ProductType,

    /// Service offering to publish, when the provider sells a product
    pub offering: Option<ServiceOffering>,

    /// Extension capability pairs appended after the recognized fields
    pub capabilities: Vec<(String, String)>,
}

/// What the workflow did for one registration request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new record was created
    Registered {
        /// Transaction carrying the registration
        tx: TxHash,
    },
    /// An existing record was brought up to date
    Updated {
        /// Transaction updating name/description, when they differed
        info_tx: Option<TxHash>,
        /// Transaction updating or adding the product, when it differed
        product_tx: Option<TxHash>,
    },
    /// The record already matched the desired state; no write issued
    Unchanged,
}

/// Orchestrates idempotent provider registration
pub struct RegistrationService {
    gateway: Arc<RegistryGateway>,
}

impl RegistrationService {
    /// Create a registration service over a gateway
    pub fn new(gateway: Arc<RegistryGateway>) -> Self {
        Self { gateway }
    }

    /// Register the sender, or update its existing record
    ///
    /// Never creates a second id for an already-registered address: the
    /// existing record is diffed against the desired state and only the
    /// differing parts are written.
    pub async fn register_or_update(
        &self,
        registration: &ProviderRegistration,
    ) -> Result<RegistrationOutcome> {
        let sender = self.gateway.sender();

        let payload = registration
            .offering
            .as_ref()
            .map(|offering| -> Result<ProductPayload> {
                let (capability_keys, capability_values) =
                    codec::encode_offering(offering, &registration.capabilities)?;
                Ok(ProductPayload {
                    product_type: registration.product_type,
                    capability_keys,
                    capability_values,
                })
            })
            .transpose()?;

        let Some(current) = self.gateway.get_provider_by_address(sender).await? else {
            // Fee is read here, not earlier: it can change between
            // blocks and the registry rejects stale amounts.
            let fee = self.gateway.registration_fee().await?;
            let tx = self
                .gateway
                .register_provider(
                    registration.payee,
                    &registration.name,
                    &registration.description,
                    payload,
                    fee,
                )
                .await?;
            info!(%sender, %tx, "registered provider");
            return Ok(RegistrationOutcome::Registered { tx });
        };

        debug!(id = current.id, %sender, "already registered, using update path");

        let info_tx = if current.name != registration.name
            || current.description != registration.description
        {
            Some(
                self.gateway
                    .update_provider_info(&registration.name, &registration.description)
                    .await?,
            )
        } else {
            None
        };

        let product_tx = match payload {
            Some(payload) => self.sync_product(current.id, payload).await?,
            None => None,
        };

        if info_tx.is_none() && product_tx.is_none() {
            debug!(id = current.id, "registry already matches desired state");
            Ok(RegistrationOutcome::Unchanged)
        } else {
            Ok(RegistrationOutcome::Updated { info_tx, product_tx })
        }
    }

    /// Bring one product's capability pairs up to date, writing only on
    /// a real difference
    async fn sync_product(&self, id: u64, payload: ProductPayload) -> Result<Option<TxHash>> {
        let current = match self
            .gateway
            .get_provider_with_product(id, payload.product_type)
            .await
        {
            Ok(product) => Some(product),
            Err(error) if error.revert_reason() == Some(REVERT_PRODUCT_NOT_FOUND) => None,
            Err(error) => return Err(error),
        };

        match current {
            Some(product)
                if product.capability_keys == payload.capability_keys
                    && product.capability_values == payload.capability_values =>
            {
                Ok(None)
            }
            Some(_) => Ok(Some(self.gateway.update_product(payload).await?)),
            None => Ok(Some(self.gateway.add_product(payload).await?)),
        }
    }
}
