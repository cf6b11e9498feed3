//! Typed wire model for the registry's entry points
//!
//! Every registry operation travels through the [`ChainClient`] port as
//! an opaque payload addressed to a contract. This module pins the one
//! versioned encoding of those payloads: a [`RegistryCall`] enum covering
//! each entry point, typed return structs per call, and the framing for
//! aggregated multi-call round trips. There is exactly one signature per
//! operation; protocol revisions bump the schema, they do not probe
//! alternatives at runtime.
//!
//! Payloads use postcard, a compact self-describing-enough binary format
//! with serde semantics; a payload that fails to decode is a protocol
//! violation surfaced as a decoding error.
//!
//! [`ChainClient`]: spr_domain::ports::ChainClient

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use spr_domain::ports::{Bytes, Call, CallOutcome};
use spr_domain::{Address, Error, ProductType, ProviderInfo, Result};

// Revert reasons reported by the registry. The gateway matches on these
// to map remote failures onto typed errors.

/// Registration paid less than the current required fee
pub const REVERT_INSUFFICIENT_FEE: &str = "insufficient registration fee";
/// Combined read addressed a provider id that does not exist
pub const REVERT_PROVIDER_NOT_FOUND: &str = "provider not found";
/// Combined read or product write addressed a product that does not exist
pub const REVERT_PRODUCT_NOT_FOUND: &str = "product not found";
/// Registration attempted from an address that already controls a record
pub const REVERT_ALREADY_REGISTERED: &str = "provider already registered";
/// Provider-scoped write from an address with no record
pub const REVERT_NOT_PROVIDER: &str = "caller is not a registered provider";
/// Product added twice under the same type
pub const REVERT_PRODUCT_EXISTS: &str = "product already registered";
/// Write carried capability arrays of different lengths
pub const REVERT_CAPABILITY_MISMATCH: &str = "capability arrays are not index-aligned";

/// Capability payload attached to a product write
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// Product category the pairs describe
    pub product_type: ProductType,
    /// Capability keys, index-aligned with `capability_values`
    pub capability_keys: Vec<String>,
    /// Capability values, index-aligned with `capability_keys`
    pub capability_values: Vec<String>,
}

/// Every entry point of the registry contract, as one typed call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCall {
    // -- point and scalar reads --
    /// Provider record by id; answers the zero sentinel when absent
    GetProvider {
        /// Registry-assigned provider id
        id: u64,
    },
    /// Provider record by controlling address; zero sentinel when absent
    GetProviderByAddress {
        /// Controlling identity to look up
        address: Address,
    },
    /// Provider id by controlling address; 0 when absent
    GetProviderIdByAddress {
        /// Controlling identity to look up
        address: Address,
    },
    /// Provider record plus one product's capability pairs; reverts for
    /// a nonexistent id or product
    GetProviderWithProduct {
        /// Registry-assigned provider id
        id: u64,
        /// Product to include
        product_type: ProductType,
    },
    /// Whether an address controls a record
    IsRegisteredProvider {
        /// Identity to check
        address: Address,
    },
    /// Whether a provider id exists and is active
    IsProviderActive {
        /// Registry-assigned provider id
        id: u64,
    },
    /// Whether a provider offers a product type
    ProviderHasProduct {
        /// Registry-assigned provider id
        id: u64,
        /// Product to check
        product_type: ProductType,
    },
    /// Total number of records ever registered
    GetProviderCount,
    /// Number of currently-active records
    ActiveProviderCount,
    /// Current fee required to register, read before every registration
    RegistrationFee,

    // -- paginated reads --
    /// One page of active provider ids
    GetAllActiveProviders {
        /// Number of matching records to skip
        offset: u64,
        /// Maximum ids in the page
        limit: u64,
    },
    /// One page of ids of providers carrying a product type; the index
    /// may include inactive providers
    GetProvidersByProductType {
        /// Product the page is filtered by
        product_type: ProductType,
        /// Number of matching records to skip
        offset: u64,
        /// Maximum ids in the page
        limit: u64,
    },

    // -- writes --
    /// Register the sender as a provider, optionally attaching an
    /// initial product in the same transaction
    RegisterProvider {
        /// Payment destination
        payee: Address,
        /// Provider name
        name: String,
        /// Free-text description
        description: String,
        /// Product attached atomically with registration, if any
        initial_product: Option<ProductPayload>,
    },
    /// Update the sender's name and description
    UpdateProviderInfo {
        /// New provider name
        name: String,
        /// New description
        description: String,
    },
    /// Deactivate the sender's record and clear its products; a no-op
    /// for unregistered or already-removed senders
    RemoveProvider,
    /// Attach a new product to the sender's record
    AddProduct {
        /// Product and capability pairs to attach
        product: ProductPayload,
    },
    /// Replace an existing product's capability pairs
    UpdateProduct {
        /// Product and replacement capability pairs
        product: ProductPayload,
    },
    /// Detach a product from the sender's record
    RemoveProduct {
        /// Product to detach
        product_type: ProductType,
    },
}

impl RegistryCall {
    /// Encode this call into a wire payload
    pub fn encode(&self) -> Result<Bytes> {
        postcard::to_stdvec(self)
            .map_err(|e| Error::internal(format!("failed to encode registry call: {e}")))
    }

    /// Decode a wire payload back into a call
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes)
            .map_err(|e| Error::decoding_protocol(format!("malformed registry call payload: {e}")))
    }

    /// Address this call to a contract
    pub fn to_call(&self, target: Address) -> Result<Call> {
        Ok(Call {
            target,
            data: self.encode()?,
        })
    }
}

/// Return payload of [`RegistryCall::GetProviderWithProduct`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderWithProduct {
    /// Provider record
    pub info: ProviderInfo,
    /// Product category included
    pub product_type: ProductType,
    /// Whether the product is currently offered
    pub is_active: bool,
    /// Capability keys, index-aligned with `capability_values`
    pub capability_keys: Vec<String>,
    /// Capability values, index-aligned with `capability_keys`
    pub capability_values: Vec<String>,
}

/// Entry point exposed by the related storage-service contract used to
/// auto-discover the registry's address when it is not configured
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageServiceCall {
    /// Address of the provider registry this service reads from
    ServiceProviderRegistry,
}

impl StorageServiceCall {
    /// Address this call to the storage-service contract
    pub fn to_call(&self, target: Address) -> Result<Call> {
        let data = postcard::to_stdvec(self)
            .map_err(|e| Error::internal(format!("failed to encode discovery call: {e}")))?;
        Ok(Call { target, data })
    }

    /// Decode a wire payload back into a discovery call
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes)
            .map_err(|e| Error::decoding_protocol(format!("malformed discovery call payload: {e}")))
    }
}

/// Encode a typed return value into return data
pub fn encode_return<T: Serialize>(value: &T) -> Result<Bytes> {
    postcard::to_stdvec(value)
        .map_err(|e| Error::internal(format!("failed to encode return payload: {e}")))
}

/// Decode return data into the caller's expected type
///
/// A shape mismatch means the remote side answered a different protocol
/// version; callers treat it as a protocol violation.
pub fn decode_return<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    postcard::from_bytes(bytes)
        .map_err(|e| Error::decoding_protocol(format!("malformed return payload: {e}")))
}

/// Frame a list of independent calls into one aggregated payload
pub fn encode_aggregate(calls: &[Call]) -> Result<Bytes> {
    postcard::to_stdvec(calls)
        .map_err(|e| Error::internal(format!("failed to encode aggregate payload: {e}")))
}

/// Unframe an aggregated payload back into its calls
pub fn decode_aggregate(bytes: &[u8]) -> Result<Vec<Call>> {
    postcard::from_bytes(bytes)
        .map_err(|e| Error::decoding_protocol(format!("malformed aggregate payload: {e}")))
}

/// Encode the per-slot outcomes of an aggregated call
pub fn encode_aggregate_return(outcomes: &[CallOutcome]) -> Result<Bytes> {
    postcard::to_stdvec(outcomes)
        .map_err(|e| Error::internal(format!("failed to encode aggregate return: {e}")))
}

/// Decode the per-slot outcomes of an aggregated call
pub fn decode_aggregate_return(bytes: &[u8]) -> Result<Vec<CallOutcome>> {
    postcard::from_bytes(bytes)
        .map_err(|e| Error::decoding_protocol(format!("malformed aggregate return: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spr_domain::ProviderPage;

    #[test]
    fn call_payload_round_trip() {
        let call = RegistryCall::GetProviderWithProduct {
            id: 7,
            product_type: ProductType::Pdp,
        };
        let bytes = call.encode().expect("encode");
        assert_eq!(RegistryCall::decode(&bytes).expect("decode"), call);
    }

    #[test]
    fn page_return_round_trip() {
        let page = ProviderPage {
            ids: vec![3, 5, 8],
            has_more: true,
        };
        let bytes = encode_return(&page).expect("encode");
        let back: ProviderPage = decode_return(&bytes).expect("decode");
        assert_eq!(back, page);
    }

    #[test]
    fn malformed_payload_is_a_protocol_violation() {
        let err = RegistryCall::decode(&[0xff, 0xff, 0xff, 0xff]).expect_err("must fail");
        assert!(matches!(err, Error::Decoding { key: None, .. }));
    }

    #[test]
    fn aggregate_framing_round_trip() {
        let target = Address::from_bytes([9u8; 20]);
        let calls = vec![
            RegistryCall::GetProvider { id: 1 }.to_call(target).expect("call"),
            RegistryCall::GetProvider { id: 2 }.to_call(target).expect("call"),
        ];
        let framed = encode_aggregate(&calls).expect("encode");
        assert_eq!(decode_aggregate(&framed).expect("decode"), calls);
    }
}
