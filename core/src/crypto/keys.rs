//! # Key Management
//!
//! secp256k1 private keys, their public keys, and the 20-byte account ids
//! the network uses to refer to them.
//!
//! ```text
//! private key (32 bytes, scalar in [1, n-1])
//!     -> k * G                       -> public key (x || y, 64 bytes)
//!     -> blake256(x || y)            -> 32 bytes
//!     -> ripemd160(..)               -> account id (20 bytes)
//! ```
//!
//! The account id pipeline hashes the 64-byte `x || y` form of the public
//! key: the uncompressed SEC1 encoding with its `0x04` tag stripped. That
//! byte layout is part of the network's address format. Do not switch it to
//! the compressed form, the ids would stop matching the live chain.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, k256).
//! - Generation draws from an injected CSPRNG; [`generate_private_key`] uses
//!   the OS RNG. Out-of-range draws are thrown away and redrawn, never
//!   clamped, so the distribution over `[1, n-1]` stays uniform.
//! - Key bytes are never logged and never appear in `Debug` output.

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use zeroize::Zeroize;

use super::hash::{blake256, ripemd160};
use crate::config::{
    ACCOUNT_ID_LENGTH, COMPRESSED_PUBLIC_KEY_LENGTH, PRIVATE_KEY_LENGTH, RAW_PUBLIC_KEY_LENGTH,
    UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};
use crate::error::{CryptoError, Result};

/// A secp256k1 private key: a scalar in `[1, n-1]`.
///
/// Zero and anything at or above the curve order cannot be represented, so
/// every `PrivateKey` you hold is usable for derivation and signing.
///
/// ## Serialization
///
/// `PrivateKey` intentionally does NOT implement `Serialize`/`Deserialize`.
/// Exporting a private key should be a deliberate act: call
/// [`to_bytes`](Self::to_bytes) or [`to_hex`](Self::to_hex).
///
/// # Examples
///
/// ```
/// use cckey_core::crypto::keys::{derive_public_key, PrivateKey};
///
/// let key = PrivateKey::from_hex(
///     "0000000000000000000000000000000000000000000000000000000000000001",
/// ).unwrap();
/// let public = derive_public_key(&key);
/// assert_eq!(public.to_bytes().len(), 64);
/// ```
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Build a private key from its 32-byte big-endian encoding.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidPrivateKey`] if the scalar is zero or `>= n`.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self> {
        let signing_key =
            SigningKey::from_bytes(bytes.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Like [`from_bytes`](Self::from_bytes), but from a slice of unknown
    /// length. Anything other than 32 bytes is a decoding error.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: &[u8; PRIVATE_KEY_LENGTH] = slice.try_into().map_err(|_| {
            CryptoError::DecodingError(format!(
                "private key must be {PRIVATE_KEY_LENGTH} bytes, got {}",
                slice.len()
            ))
        })?;
        Self::from_bytes(bytes)
    }

    /// Parse a hex-encoded private key (64 hex characters, optional `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(strip_hex_prefix(s))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Export the 32-byte big-endian scalar.
    ///
    /// **Handle with care.** Whoever holds these bytes controls the account.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut out = [0u8; PRIVATE_KEY_LENGTH];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// Hex export of [`to_bytes`](Self::to_bytes). Same warning applies.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The public key for this private key. Same as [`derive_public_key`].
    pub fn public_key(&self) -> PublicKey {
        derive_public_key(self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "PrivateKey(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for PrivateKey {
    /// Compared through the public key so secret bytes never go through a
    /// non-constant-time comparison.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for PrivateKey {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A point on secp256k1, derived from exactly one [`PrivateKey`].
///
/// Decodes from compressed (33 bytes), uncompressed (65 bytes) or the
/// network's raw `x || y` form (64 bytes). All three describe the same
/// point and compare equal once decoded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    pub(crate) fn from_verifying_key(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Decode a SEC1 point (compressed or uncompressed).
    ///
    /// Rejects off-curve points and the point at infinity.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let verifying_key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| CryptoError::DecodingError("not a valid secp256k1 point".into()))?;
        Ok(Self { verifying_key })
    }

    /// Decode the 64-byte `x || y` form used on the network.
    pub fn from_bytes(bytes: &[u8; RAW_PUBLIC_KEY_LENGTH]) -> Result<Self> {
        let mut sec1 = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(bytes);
        Self::from_sec1_bytes(&sec1)
    }

    /// Decode any of the three accepted encodings, picked by length.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        match slice.len() {
            RAW_PUBLIC_KEY_LENGTH => {
                let mut raw = [0u8; RAW_PUBLIC_KEY_LENGTH];
                raw.copy_from_slice(slice);
                Self::from_bytes(&raw)
            }
            COMPRESSED_PUBLIC_KEY_LENGTH | UNCOMPRESSED_PUBLIC_KEY_LENGTH => {
                Self::from_sec1_bytes(slice)
            }
            other => Err(CryptoError::DecodingError(format!(
                "public key must be 33, 64 or 65 bytes, got {other}"
            ))),
        }
    }

    /// Parse a hex-encoded public key in any of the accepted encodings.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        Self::from_slice(&bytes)
    }

    /// The network's 64-byte `x || y` encoding.
    pub fn to_bytes(&self) -> [u8; RAW_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; RAW_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(&self.to_uncompressed()[1..]);
        out
    }

    /// SEC1 compressed encoding: `0x02`/`0x03` then x.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LENGTH] {
        let point = self.verifying_key.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// SEC1 uncompressed encoding: `0x04`, x, y.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        let point = self.verifying_key.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Hex of the 64-byte network encoding. 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The account id for this key. Same as [`derive_account_id`].
    pub fn account_id(&self) -> AccountId {
        derive_account_id(self)
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_compressed().hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// 20-byte account identifier: `ripemd160(blake256(x || y))`.
///
/// Collision resistance comes from the two hashes; nothing extra is
/// guaranteed here. Network prefixes and checksummed address formats are
/// layered on by the surrounding SDK, not by this type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    /// Wrap 20 raw bytes.
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    /// Lowercase hex, 40 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 40 hex characters (optional `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        let arr: [u8; ACCOUNT_ID_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::DecodingError(format!(
                "account id must be {ACCOUNT_ID_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Generate a fresh private key from the OS CSPRNG.
pub fn generate_private_key() -> PrivateKey {
    generate_private_key_with(&mut OsRng)
}

/// Generate a private key from a caller-supplied CSPRNG.
///
/// Draws 32 bytes and keeps them only if they encode a scalar in
/// `[1, n-1]`; otherwise draws again. The rejection probability is about
/// 2^-128 per draw, so in practice this loops once.
///
/// Passing a seeded RNG makes the output reproducible, which is what the
/// tests do.
pub fn generate_private_key_with<R>(rng: &mut R) -> PrivateKey
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
    loop {
        rng.fill_bytes(&mut bytes);
        match PrivateKey::from_bytes(&bytes) {
            Ok(key) => {
                bytes.zeroize();
                return key;
            }
            Err(_) => {
                tracing::debug!("discarding out-of-range private key draw");
            }
        }
    }
}

/// Multiply the base point by `private_key`.
pub fn derive_public_key(private_key: &PrivateKey) -> PublicKey {
    PublicKey::from_verifying_key(*private_key.signing_key().verifying_key())
}

/// [`derive_public_key`] for callers holding raw key bytes.
///
/// # Errors
///
/// [`CryptoError::InvalidPrivateKey`] when the scalar is zero or `>= n`.
pub fn derive_public_key_raw(private_key: &[u8; PRIVATE_KEY_LENGTH]) -> Result<PublicKey> {
    let key = PrivateKey::from_bytes(private_key)?;
    Ok(derive_public_key(&key))
}

/// `ripemd160(blake256(x || y))` over the 64-byte public key encoding.
pub fn derive_account_id(public_key: &PublicKey) -> AccountId {
    AccountId(ripemd160(&blake256(&public_key.to_bytes())))
}

/// Exactly `derive_account_id(&derive_public_key(private_key))`.
pub fn derive_account_id_from_private(private_key: &PrivateKey) -> AccountId {
    derive_account_id(&derive_public_key(private_key))
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}
