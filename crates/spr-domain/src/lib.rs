//! # Storage Provider Registry - Domain Layer
//!
//! Core types, error taxonomy, capability codec, and port definitions
//! for the on-chain storage provider registry client. This crate is the
//! leaf of the workspace: it depends on no other workspace member and
//! holds no I/O of its own.
//!
//! ## Contents
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Value types: addresses, provider/product records, offerings |
//! | [`codec`] | Capability codec: offering ⇄ ordered key/value pairs |
//! | [`keys`] | Stable, versioned capability key constants |
//! | [`ports`] | Async trait seams to chain backends and fetch strategies |
//! | [`error`] | One error enum for the whole workspace |

pub mod codec;
pub mod error;
pub mod keys;
pub mod ports;
pub mod types;

pub use codec::{DecodedCapabilities, decode_capabilities, encode_offering, field_codecs};
pub use error::{Error, Result};
pub use types::{
    Address, Product, ProductType, ProviderInfo, ProviderPage, ServiceOffering, ServiceProvider,
    TxHash,
};
