//! # Storage Provider Registry Client
//!
//! A client SDK for discovering, registering, and querying
//! storage-service providers recorded in an on-chain registry, and for
//! consuming their advertised service offerings.
//!
//! This crate is the public facade: it re-exports the domain types, the
//! wire layer, and the client orchestration API.
//!
//! ## Features
//!
//! - **Provider resolution**: set-oriented queries over a paginated
//!   registry, with per-page detail fetches overlapped so latency
//!   scales with pages, not providers
//! - **Batched reads**: many point reads in one aggregated round trip,
//!   with per-call failure isolation and a transparent sequential
//!   fallback
//! - **Capability codec**: schema-less key/value capability pairs
//!   decoded into strongly-typed service offerings, extensible without
//!   breaking the round-trip law
//! - **Idempotent registration**: re-registering routes into the update
//!   path and skips writes whose targets already match
//!
//! ## Example
//!
//! ```ignore
//! use spr::client::{BatchAggregator, ProviderResolver, RegistryGateway};
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(RegistryGateway::new(chain.clone(), registry_address));
//! let batch = Arc::new(BatchAggregator::new(chain, aggregator_address));
//! let resolver = ProviderResolver::new(gateway, batch);
//!
//! for provider in resolver.list_active().await? {
//!     println!("{}: {}", provider.info.id, provider.info.name);
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - core types, capability codec, error taxonomy, ports
//! - `chain` - typed wire model and the in-memory chain backend
//! - `client` - gateway, batching, resolution, registration, config

/// Domain layer - core types, codec, and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use spr_domain::*;
}

/// Wire layer - typed call model and chain backends
///
/// Re-exports from the chain crate for convenience
pub mod chain {
    pub use spr_chain::*;
}

/// Client layer - gateway, batching, resolution, and registration
///
/// Re-exports from the client crate for convenience
pub mod client {
    pub use spr_client::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the orchestration entry points for convenience
pub use client::{
    BatchAggregator, ProviderRegistration, ProviderResolver, RegistrationOutcome,
    RegistrationService, RegistryGateway,
};
