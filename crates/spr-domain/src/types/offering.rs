//! Typed view of a provider's service offering

use super::address::Address;
use serde::{Deserialize, Serialize};

/// The strongly-typed subset of a product's capabilities recognized by
/// the capability codec
///
/// Every field corresponds to one stable capability key. `Default`
/// produces the all-zero offering; a recognized key absent from the
/// capability pairs leaves its field at the zero value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// HTTP(S) endpoint where the provider serves its storage API.
    /// Required: encoding fails when empty.
    pub service_url: String,

    /// Smallest piece the provider accepts, in bytes
    pub min_piece_size: u64,

    /// Largest piece the provider accepts, in bytes
    pub max_piece_size: u64,

    /// Storage price in smallest token units per TiB per month.
    /// Wider than the schema's 64-bit numeric domain client-side, so
    /// encoding enforces the bound.
    pub storage_price_per_tib_per_month: u128,

    /// Minimum commitment period the provider requires, in epochs
    pub min_proving_period_epochs: u64,

    /// Free-text geographic location; empty when unspecified
    pub location: String,

    /// Token contract accepted for payment; zero when unspecified
    pub payment_token: Address,

    /// Whether the provider announces piece CIDs to IPNI
    pub ipni_piece: bool,

    /// Whether the provider announces IPFS CIDs to IPNI
    pub ipni_ipfs: bool,
}
