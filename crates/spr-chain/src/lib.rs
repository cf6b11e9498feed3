//! # Storage Provider Registry - Wire Layer
//!
//! The typed call model for the registry's fixed entry points, the
//! aggregate-call framing, and an in-memory chain backend with full
//! registry semantics for development and testing.
//!
//! Production deployments implement [`spr_domain::ports::ChainClient`]
//! over their node/wallet stack; the wire module is what both that
//! implementation and [`MemoryChain`] speak.

pub mod memory;
pub mod wire;

pub use memory::MemoryChain;
pub use wire::{ProductPayload, ProviderWithProduct, RegistryCall, StorageServiceCall};
