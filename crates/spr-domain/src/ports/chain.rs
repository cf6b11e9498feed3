//! Chain Client Port
//!
//! Boundary to the blockchain node, wallet, and RPC transport, which are
//! external collaborators of this workspace. Implementations own signing
//! and confirmation semantics; this crate only shapes calls and decodes
//! results.

use crate::error::Result;
use crate::types::{Address, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw call payload and return data
pub type Bytes = Vec<u8>;

/// One call against a contract: a target identity and an opaque payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Contract the call is addressed to
    pub target: Address,

    /// Encoded entry-point payload
    pub data: Bytes,
}

/// Outcome of one slot inside an aggregated call
///
/// Per-slot failure never aborts sibling slots; a failed slot simply
/// carries `success == false` and empty return data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Whether the slot's call executed without reverting
    pub success: bool,

    /// Raw return data for successful slots
    pub return_data: Bytes,
}

/// Chain Client Port
///
/// The transport collaborator: executes read-only calls and submits
/// state-changing transactions under a fixed sender identity. A revert
/// surfaces as [`crate::Error::RegistryCall`] carrying the raw reason
/// when the remote side reports one; implementations never retry.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Execute a read-only call and return its raw result
    async fn call(&self, call: Call) -> Result<Bytes>;

    /// Submit a state-changing call with an attached payment amount,
    /// returning the transaction hash once accepted by the transport.
    /// Awaiting confirmation stays with the caller.
    async fn send(&self, call: Call, value: u128) -> Result<TxHash>;

    /// The identity transactions are sent from
    fn sender(&self) -> Address;
}
