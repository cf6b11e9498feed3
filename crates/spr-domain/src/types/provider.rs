//! Provider and product records
//!
//! These are the client-side views of registry state. The registry is
//! the sole owner of persisted records; everything here is a transient
//! copy fetched per call.

use super::address::Address;
use super::offering::ServiceOffering;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Typed service product categories offered through the registry
///
/// A closed set: adding a variant is a protocol revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// Verifiable storage backed by proof-of-data-possession
    Pdp,
}

impl ProductType {
    /// Stable name used in logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdp => "pdp",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core registry record for one provider
///
/// `id == 0` together with a zero `service_provider` identity is the
/// wire-level "not registered" sentinel; the gateway converts it to
/// `None` before it reaches callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Registry-assigned identifier, unique and never reused; 0 means
    /// "not registered"
    pub id: u64,

    /// On-chain identity controlling the record
    pub service_provider: Address,

    /// Destination for payments; may differ from `service_provider`
    pub payee: Address,

    /// Human-readable provider name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Whether the provider is currently active; deactivation keeps the id
    pub active: bool,
}

impl ProviderInfo {
    /// The wire-level sentinel for a record that does not exist
    pub fn absent() -> Self {
        Self {
            id: 0,
            service_provider: Address::ZERO,
            payee: Address::ZERO,
            name: String::new(),
            description: String::new(),
            active: false,
        }
    }

    /// Whether this record is the non-existence sentinel
    pub fn is_absent(&self) -> bool {
        self.service_provider.is_zero()
    }
}

/// One typed service offering attached to a provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product category
    pub product_type: ProductType,

    /// Whether the product is currently offered
    pub is_active: bool,

    /// Full capability set: schema-decoded keys and extension pairs alike
    pub capabilities: HashMap<String, String>,

    /// Typed view of the recognized capability subset
    pub offering: ServiceOffering,
}

/// A fully-resolved provider record: registry info plus decoded products
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceProvider {
    /// Core registry record
    pub info: ProviderInfo,

    /// Products keyed by type; keys unique per provider
    pub products: HashMap<ProductType, Product>,
}

impl ServiceProvider {
    /// Look up one product by type
    pub fn product(&self, product_type: ProductType) -> Option<&Product> {
        self.products.get(&product_type)
    }
}

/// One page of a paginated id enumeration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPage {
    /// Provider ids in registry order
    pub ids: Vec<u64>,

    /// Whether another page follows this one
    pub has_more: bool,
}
