//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the storage provider registry client
///
/// Absence of a record is never an error: point lookups return `Ok(None)`
/// when the registry answers with the zero-identity sentinel.
#[derive(Error, Debug)]
pub enum Error {
    /// Capability encoding error (required field missing or a numeric
    /// value outside the schema's numeric domain)
    #[error("capability encoding error: {message}")]
    Encoding {
        /// The capability key the error applies to, when one is known
        key: Option<String>,
        /// Description of the encoding error
        message: String,
    },

    /// Capability decoding error (malformed value for a recognized key,
    /// or a protocol violation such as mismatched key/value arrays)
    #[error("capability decoding error: {message}")]
    Decoding {
        /// The capability key the error applies to, when one is known
        key: Option<String>,
        /// Description of the decoding error
        message: String,
    },

    /// Write attempted with a stale or insufficient registration fee
    #[error("insufficient registration fee: {message}")]
    InsufficientFee {
        /// Description of the fee shortfall
        message: String,
    },

    /// Remote execution reverted or the transport failed for a single call
    #[error("registry call failed: {message}")]
    RegistryCall {
        /// Description of the failure
        message: String,
        /// Raw revert reason reported by the remote side, when available
        reason: Option<String>,
    },

    /// No call aggregator is configured for the active network
    #[error("aggregation unavailable: {message}")]
    AggregationUnavailable {
        /// Description of why aggregation cannot be used
        message: String,
    },

    /// Configuration-related error
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid argument provided to a function
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Internal system error
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Codec error creation methods
impl Error {
    /// Create an encoding error for a specific capability key
    pub fn encoding<K: Into<String>, S: Into<String>>(key: K, message: S) -> Self {
        Self::Encoding {
            key: Some(key.into()),
            message: message.into(),
        }
    }

    /// Create a decoding error for a specific capability key
    pub fn decoding<K: Into<String>, S: Into<String>>(key: K, message: S) -> Self {
        Self::Decoding {
            key: Some(key.into()),
            message: message.into(),
        }
    }

    /// Create a decoding error with no associated key (protocol violation)
    pub fn decoding_protocol<S: Into<String>>(message: S) -> Self {
        Self::Decoding {
            key: None,
            message: message.into(),
        }
    }
}

// Call error creation methods
impl Error {
    /// Create an insufficient-fee error
    pub fn insufficient_fee<S: Into<String>>(message: S) -> Self {
        Self::InsufficientFee {
            message: message.into(),
        }
    }

    /// Create a registry call error without a revert reason
    pub fn registry_call<S: Into<String>>(message: S) -> Self {
        Self::RegistryCall {
            message: message.into(),
            reason: None,
        }
    }

    /// Create a registry call error carrying the raw revert reason
    pub fn revert<S: Into<String>>(reason: S) -> Self {
        let reason = reason.into();
        Self::RegistryCall {
            message: format!("execution reverted: {reason}"),
            reason: Some(reason),
        }
    }

    /// Create an aggregation-unavailable error
    pub fn aggregation_unavailable<S: Into<String>>(message: S) -> Self {
        Self::AggregationUnavailable {
            message: message.into(),
        }
    }

    /// The raw revert reason, if this error carries one
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::RegistryCall { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

// Ambient error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
