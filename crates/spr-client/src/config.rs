//! Client configuration
//!
//! Handles loading configuration from default values, a TOML file, and
//! `SPR_`-prefixed environment variables, merged in that order via
//! Figment. External contract identities come from configuration, never
//! computed: the registry address (or a storage-service address to
//! discover it from) and the call aggregator's address, which has a
//! network default on public networks and none on a local devnet.

use crate::resolver::DEFAULT_PAGE_SIZE;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use spr_domain::{Address, Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "SPR";

/// The canonical aggregation contract, deployed at the same address on
/// every public network
const PUBLIC_AGGREGATOR: Address = Address::from_bytes([
    0xca, 0x11, 0xbd, 0xe0, 0x59, 0x77, 0xb3, 0x63, 0x11, 0x67, 0x02, 0x88, 0x62, 0xbe, 0x2a,
    0x17, 0x39, 0x76, 0xca, 0x11,
]);

/// The network a client instance talks to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test network
    Calibration,
    /// Local development network: no default contract identities at all
    #[default]
    Devnet,
}

impl Network {
    /// The network's default aggregator contract, when one exists
    pub fn default_aggregator(&self) -> Option<Address> {
        match self {
            Self::Mainnet | Self::Calibration => Some(PUBLIC_AGGREGATOR),
            Self::Devnet => None,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Emit JSON-structured lines instead of human-readable ones
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Where the gateway should learn the registry's address from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrySource {
    /// Configured directly
    Static(Address),
    /// Discover via the storage-service contract on first use
    Discover(Address),
}

/// Top-level client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Active network
    pub network: Network,

    /// Registry contract address; optional when `storage_service_address`
    /// is set, in which case it is auto-discovered
    pub registry_address: Option<String>,

    /// Related storage-service contract used for registry discovery
    pub storage_service_address: Option<String>,

    /// Aggregator contract address; falls back to the network default
    pub aggregator_address: Option<String>,

    /// Ids requested per pagination page
    pub page_size: u64,

    /// Logging section
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            registry_address: None,
            storage_service_address: None,
            aggregator_address: None,
            page_size: DEFAULT_PAGE_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Where the registry address comes from
    ///
    /// An explicitly configured address wins over discovery.
    pub fn registry_source(&self) -> Result<RegistrySource> {
        if let Some(raw) = &self.registry_address {
            return Ok(RegistrySource::Static(parse_address(
                "registry_address",
                raw,
            )?));
        }
        if let Some(raw) = &self.storage_service_address {
            return Ok(RegistrySource::Discover(parse_address(
                "storage_service_address",
                raw,
            )?));
        }
        Err(Error::config(
            "either registry_address or storage_service_address must be set",
        ))
    }

    /// The aggregator to use, if any: the configured address, else the
    /// network default. `None` on a devnet without explicit
    /// configuration - aggregation is unavailable there.
    pub fn aggregator(&self) -> Result<Option<Address>> {
        match &self.aggregator_address {
            Some(raw) => Ok(Some(parse_address("aggregator_address", raw)?)),
            None => Ok(self.network.default_aggregator()),
        }
    }

    /// Validate the configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be positive"));
        }
        self.registry_source()?;
        self.aggregator()?;
        if self.network == Network::Devnet && self.aggregator_address.is_none() {
            warn!("no aggregator configured on devnet; listings will use per-id reads");
        }
        Ok(())
    }
}

fn parse_address(field: &str, raw: &str) -> Result<Address> {
    raw.parse()
        .map_err(|e| Error::config_with_source(format!("invalid {field} '{raw}'"), e))
}

/// Configuration loader service
#[derive(Clone, Default)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `ClientConfig::default()`
    /// 2. TOML configuration file (if it exists)
    /// 3. Environment variables with prefix (e.g. `SPR_NETWORK`; nested
    ///    keys use a double underscore, e.g. `SPR_LOGGING__LEVEL`)
    pub fn load(&self) -> Result<ClientConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                info!("configuration loaded from {}", config_path.display());
            } else {
                warn!("configuration file not found: {}", config_path.display());
            }
        }

        let prefix = self
            .env_prefix
            .clone()
            .unwrap_or_else(|| CONFIG_ENV_PREFIX.to_string());
        figment = figment.merge(Env::prefixed(&format!("{prefix}_")).split("__"));

        let config: ClientConfig = figment
            .extract()
            .map_err(|e| Error::config_with_source("failed to extract configuration", e))?;

        config.validate()?;
        Ok(config)
    }
}
