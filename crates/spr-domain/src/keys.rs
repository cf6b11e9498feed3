//! Stable capability key constants
//!
//! Capability keys are versioned protocol constants: renaming one is a
//! breaking schema change requiring a new schema version. Schema v1
//! stores every numeric capability value as a decimal string that must
//! fit an unsigned 64-bit integer.

/// HTTP(S) endpoint where the provider serves its storage API
pub const CAP_SERVICE_URL: &str = "serviceURL";

/// Smallest piece the provider accepts, in bytes
pub const CAP_MIN_PIECE_SIZE: &str = "minPieceSizeInBytes";

/// Largest piece the provider accepts, in bytes
pub const CAP_MAX_PIECE_SIZE: &str = "maxPieceSizeInBytes";

/// Storage price in smallest token units per TiB per month
pub const CAP_STORAGE_PRICE: &str = "storagePricePerTibPerMonth";

/// Minimum commitment period the provider requires, in epochs
pub const CAP_MIN_PROVING_PERIOD: &str = "minProvingPeriodInEpochs";

/// Free-text geographic location of the provider
pub const CAP_LOCATION: &str = "location";

/// Token contract accepted for payment
pub const CAP_PAYMENT_TOKEN: &str = "paymentTokenAddress";

/// Whether the provider announces piece CIDs to IPNI
pub const CAP_IPNI_PIECE: &str = "ipniPiece";

/// Whether the provider announces IPFS CIDs to IPNI
pub const CAP_IPNI_IPFS: &str = "ipniIpfs";
