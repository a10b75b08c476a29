//! # Protocol Configuration & Constants
//!
//! Every fixed size, algorithm name and default in cckey lives here. These
//! values are part of the network's address and signature format: changing
//! any of them produces keys and account ids the live network will not
//! recognize.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CryptoError, Result};

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Network-scope tag attached to keys and accounts by the surrounding SDK.
///
/// This is bookkeeping only. It is carried alongside identities so the
/// transaction and RPC layers know which chain they are talking to, and it
/// never enters a hash, a key derivation or a signature in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u8);

impl NetworkId {
    /// The raw tag value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for NetworkId {
    fn default() -> Self {
        DEFAULT_NETWORK_ID
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Solo consensus network. The SDK default when no network id is given.
pub const DEFAULT_NETWORK_ID: NetworkId = NetworkId(0x11);

/// RPC endpoint assumed by the SDK facade when none is configured.
pub const DEFAULT_RPC_SERVER: &str = "http://localhost:8080";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Signature curve. Fixed by the protocol.
pub const SIGNING_CURVE: &str = "secp256k1";

/// Wide hash used for digests and the first stage of account-id derivation.
pub const WIDE_HASH_FUNCTION: &str = "BLAKE2b-256";

/// Narrow hash used to compress a public key hash into an account id.
pub const COMPRESS_HASH_FUNCTION: &str = "RIPEMD-160";

/// Private key length: a 32-byte big-endian scalar.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// SEC1 compressed public key: `0x02`/`0x03` tag plus the x coordinate.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// SEC1 uncompressed public key: `0x04` tag plus x and y.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Raw `x || y` public key, the form CodeChain hashes into account ids.
pub const RAW_PUBLIC_KEY_LENGTH: usize = 64;

/// Wide hash / message digest length.
pub const DIGEST_LENGTH: usize = 32;

/// Account id length (RIPEMD-160 output).
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Recoverable signature: `r (32) || s (32) || recovery id (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Largest key accepted by keyed BLAKE2b.
pub const MAX_MAC_KEY_LENGTH: usize = 64;

/// Recovery ids live in `0..=3`.
pub const MAX_RECOVERY_ID: u8 = 3;

// ---------------------------------------------------------------------------
// SDK configuration
// ---------------------------------------------------------------------------

/// Settings for the SDK facade.
///
/// Only `network_id` has meaning inside this crate, and even that one is
/// passed through untouched. `server` is kept for the RPC layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SdkConfig {
    /// HTTP RPC server address.
    pub server: String,
    /// Network the SDK is pointed at.
    pub network_id: NetworkId,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_RPC_SERVER.to_string(),
            network_id: DEFAULT_NETWORK_ID,
        }
    }
}

impl SdkConfig {
    /// Config for `server` on the default network.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }

    /// Builder-style override of the network id.
    pub fn with_network_id(mut self, network_id: NetworkId) -> Self {
        self.network_id = network_id;
        self
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CryptoError::DecodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sec1_lengths_are_consistent() {
        assert_eq!(COMPRESSED_PUBLIC_KEY_LENGTH, 1 + PRIVATE_KEY_LENGTH);
        assert_eq!(UNCOMPRESSED_PUBLIC_KEY_LENGTH, 1 + RAW_PUBLIC_KEY_LENGTH);
        assert_eq!(SIGNATURE_LENGTH, 2 * DIGEST_LENGTH + 1);
    }

    #[test]
    fn default_config_matches_sdk_defaults() {
        let config = SdkConfig::default();
        assert_eq!(config.network_id, NetworkId(0x11));
        assert_eq!(config.server, DEFAULT_RPC_SERVER);
    }

    #[test]
    fn json_config_fills_missing_fields() {
        let config = SdkConfig::from_json(r#"{"server": "http://node:8080"}"#).unwrap();
        assert_eq!(config.server, "http://node:8080");
        assert_eq!(config.network_id, DEFAULT_NETWORK_ID);

        let config = SdkConfig::from_json(r#"{"networkId": 17}"#).unwrap();
        assert_eq!(config.network_id, NetworkId(17));
    }

    #[test]
    fn malformed_json_is_a_decoding_error() {
        let err = SdkConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CryptoError::DecodingError(_)));
    }

    #[test]
    fn network_id_displays_as_hex() {
        assert_eq!(NetworkId(0x11).to_string(), "0x11");
    }
}
