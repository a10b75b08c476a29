//! # SDK Facade
//!
//! The entry object of the client SDK. It carries the RPC server address
//! and the network id for the layers that need them, and exposes the
//! hashing, key and signature primitives through [`util`] in the hex-string
//! shape SDK users already know.
//!
//! Constructing an [`Sdk`] does no I/O. The server address is stored for
//! the RPC layer; nothing in this crate connects to it.

use rand::rngs::OsRng;

use crate::config::{NetworkId, SdkConfig};
use crate::identity::Identity;

/// SDK entry point.
///
/// # Example
///
/// ```
/// use cckey_core::config::SdkConfig;
/// use cckey_core::sdk::{util, Sdk};
///
/// let sdk = Sdk::new(SdkConfig::new("http://localhost:8080"));
/// assert_eq!(sdk.network_id().value(), 0x11);
///
/// let private_key = util::generate_private_key();
/// let account_id = util::get_account_id_from_private(&private_key).unwrap();
/// assert_eq!(account_id.len(), 40);
/// ```
#[derive(Debug, Clone)]
pub struct Sdk {
    config: SdkConfig,
}

impl Sdk {
    pub fn new(config: SdkConfig) -> Self {
        tracing::debug!(
            server = %config.server,
            network_id = %config.network_id,
            "sdk configured"
        );
        Self { config }
    }

    /// RPC server address, for the transport layer.
    pub fn server(&self) -> &str {
        &self.config.server
    }

    pub fn network_id(&self) -> NetworkId {
        self.config.network_id
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Generate a fresh identity tagged with this SDK's network id.
    pub fn generate_identity(&self) -> Identity {
        Identity::generate(self.config.network_id, &mut OsRng)
    }
}

impl Default for Sdk {
    fn default() -> Self {
        Self::new(SdkConfig::default())
    }
}

/// Hex-string helpers mirroring the SDK's `util` namespace.
///
/// Private keys are 64 hex characters, public keys 128 (the `x || y` form),
/// account ids 40, digests 64 and signatures 130. Bad hex or bad lengths
/// come back as [`CryptoError::DecodingError`](crate::error::CryptoError).
pub mod util {
    use crate::crypto::{self, PrivateKey, PublicKey, Signature};
    use crate::error::{CryptoError, Result};

    fn parse_digest(digest_hex: &str) -> Result<[u8; 32]> {
        let bytes = hex::decode(digest_hex.strip_prefix("0x").unwrap_or(digest_hex))?;
        bytes.as_slice().try_into().map_err(|_| {
            CryptoError::DecodingError(format!("digest must be 32 bytes, got {}", bytes.len()))
        })
    }

    pub fn blake256(data: &[u8]) -> String {
        hex::encode(crypto::blake256(data))
    }

    pub fn blake256_with_key(data: &[u8], key: &[u8]) -> Result<String> {
        crypto::blake256_with_key(data, key).map(hex::encode)
    }

    pub fn ripemd160(data: &[u8]) -> String {
        hex::encode(crypto::ripemd160(data))
    }

    /// Sign a hex digest; returns the 65-byte signature as hex.
    pub fn sign_ecdsa(digest_hex: &str, private_key_hex: &str) -> Result<String> {
        let digest = parse_digest(digest_hex)?;
        let private_key = PrivateKey::from_hex(private_key_hex)?;
        Ok(crypto::sign(&digest, &private_key)?.to_hex())
    }

    pub fn verify_ecdsa(
        digest_hex: &str,
        signature_hex: &str,
        public_key_hex: &str,
    ) -> Result<bool> {
        let digest = parse_digest(digest_hex)?;
        let signature = Signature::from_hex(signature_hex)?;
        let public_key = PublicKey::from_hex(public_key_hex)?;
        crypto::verify(&digest, &signature, &public_key)
    }

    /// Recover the signer's public key as 128 hex characters.
    pub fn recover_ecdsa(digest_hex: &str, signature_hex: &str) -> Result<String> {
        let digest = parse_digest(digest_hex)?;
        let signature = Signature::from_hex(signature_hex)?;
        Ok(crypto::recover(&digest, &signature)?.to_hex())
    }

    pub fn generate_private_key() -> String {
        crypto::generate_private_key().to_hex()
    }

    pub fn get_account_id_from_private(private_key_hex: &str) -> Result<String> {
        let private_key = PrivateKey::from_hex(private_key_hex)?;
        Ok(crypto::derive_account_id_from_private(&private_key).to_hex())
    }

    pub fn get_public_from_private(private_key_hex: &str) -> Result<String> {
        let private_key = PrivateKey::from_hex(private_key_hex)?;
        Ok(crypto::derive_public_key(&private_key).to_hex())
    }
}
