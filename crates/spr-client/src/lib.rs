//! # Storage Provider Registry - Client Layer
//!
//! Orchestration over the registry's entry points: the typed gateway,
//! the batch aggregator with per-call failure isolation, the provider
//! resolver with overlapped pagination, and the idempotent registration
//! workflow, plus configuration and logging for embedding applications.
//!
//! ## Putting a client together
//!
//! ```ignore
//! use spr_client::{BatchAggregator, ProviderResolver, RegistryGateway};
//! use spr_client::config::{ConfigLoader, RegistrySource};
//! use std::sync::Arc;
//!
//! let config = ConfigLoader::new().with_config_path("spr.toml").load()?;
//! let chain: Arc<dyn spr_domain::ports::ChainClient> = /* node/wallet stack */;
//!
//! let gateway = Arc::new(match config.registry_source()? {
//!     RegistrySource::Static(addr) => RegistryGateway::new(chain.clone(), addr),
//!     RegistrySource::Discover(addr) => RegistryGateway::with_discovery(chain.clone(), addr),
//! });
//! let batch = Arc::new(BatchAggregator::new(chain, config.aggregator()?));
//! let resolver = ProviderResolver::new(gateway, batch);
//! let providers = resolver.list_active().await?;
//! ```

pub mod batch;
pub mod config;
pub mod fetch;
pub mod gateway;
pub mod logging;
pub mod registration;
pub mod resolver;

pub use batch::BatchAggregator;
pub use config::{ClientConfig, ConfigLoader, LoggingConfig, Network, RegistrySource};
pub use fetch::{AggregatedDetailSource, SequentialDetailSource};
pub use gateway::RegistryGateway;
pub use logging::init_logging;
pub use registration::{ProviderRegistration, RegistrationOutcome, RegistrationService};
pub use resolver::{ProviderResolver, DEFAULT_PAGE_SIZE};
