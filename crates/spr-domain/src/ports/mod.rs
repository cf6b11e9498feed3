//! Port definitions
//!
//! Async trait seams decoupling the orchestration layer from concrete
//! backends. Implementations live in `spr-chain` (chain backends) and
//! `spr-client` (detail-fetch strategies).

pub mod chain;
pub mod fetch;

pub use chain::{Bytes, Call, CallOutcome, ChainClient};
pub use fetch::ProviderDetailSource;
