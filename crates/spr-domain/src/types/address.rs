//! On-chain identity primitives

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte on-chain account or contract identity
///
/// The zero address is the registry's non-existence sentinel: any record
/// whose controlling identity is zero is treated as "not found" by every
/// lookup, never as a valid record.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero sentinel identity
    pub const ZERO: Address = Address([0u8; 20]);

    /// Byte length of an address
    pub const LEN: usize = 20;

    /// Create an address from raw bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw byte view of the address
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero (non-existence) sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse a `0x`-prefixed hex address
    pub fn parse<S: AsRef<str>>(s: S) -> Result<Self> {
        s.as_ref().parse()
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(hex_part)
            .map_err(|e| Error::invalid_argument(format!("invalid hex address '{s}': {e}")))?;
        let bytes: [u8; 20] = raw.try_into().map_err(|_| {
            Error::invalid_argument(format!("address '{s}' is not {} bytes", Self::LEN))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// A 32-byte transaction hash returned by state-changing calls
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    /// Create a transaction hash from raw bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw byte view of the hash
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({self})")
    }
}
