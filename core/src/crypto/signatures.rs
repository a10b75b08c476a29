//! # Digital Signatures
//!
//! Recoverable ECDSA over secp256k1: the thing that actually authorizes a
//! transaction on the network.
//!
//! All three operations take a 32-byte digest, never a raw payload. Hash the
//! payload first (usually with [`blake256`](super::hash::blake256)) and pass
//! the result in. Nothing here hashes for you, so nothing here can silently
//! hash twice.
//!
//! ## Nonces
//!
//! Signing is deterministic: nonces come from RFC 6979 (HMAC-DRBG over the
//! key and digest), chosen explicitly through `k256`'s
//! `sign_prehash_recoverable`. Signing the same digest with the same key
//! always yields the same signature, and a weak RNG at signing time cannot
//! leak the key because no RNG is involved.
//!
//! ## Malleability
//!
//! Produced signatures are low-S (s <= n/2), and verification treats high-S
//! signatures as non-matching, the same rule libsecp256k1 enforces on the
//! network. The recovery id is adjusted whenever s gets flipped so that
//! [`recover`] still lands on the signer's key.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::keys::{PrivateKey, PublicKey};
use crate::config::{DIGEST_LENGTH, MAX_RECOVERY_ID, PRIVATE_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::error::{CryptoError, Result};

/// A recoverable ECDSA signature: `r`, `s` and a recovery id.
///
/// Wire form is 65 bytes, `r (32) || s (32) || recovery id (1)`.
///
/// Decoding only checks the length. Whether `r` and `s` fall in `[1, n-1]`
/// is checked when the signature is used, so a structurally bad signature
/// read off the wire surfaces as [`CryptoError::MalformedSignature`] from
/// [`verify`] or [`recover`] rather than disappearing at parse time.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    recovery_id: u8,
}

impl Signature {
    /// Assemble a signature from its parts.
    pub const fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Self {
        Self { r, s, recovery_id }
    }

    /// Decode the 65-byte wire form.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self {
            r,
            s,
            recovery_id: bytes[64],
        }
    }

    /// Decode from a slice; anything but 65 bytes is a decoding error.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: &[u8; SIGNATURE_LENGTH] = slice.try_into().map_err(|_| {
            CryptoError::DecodingError(format!(
                "signature must be {SIGNATURE_LENGTH} bytes, got {}",
                slice.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Parse 130 hex characters (optional `0x`).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Self::from_slice(&bytes)
    }

    /// The 65-byte wire form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.recovery_id;
        out
    }

    /// Hex of the wire form. 130 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The `r` component, big-endian.
    pub const fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The `s` component, big-endian.
    pub const fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Which of the candidate points is the signer's key (0..=3).
    pub const fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Convert `(r, s)` into a k256 signature, enforcing `r, s in [1, n-1]`.
    fn to_k256(self) -> Result<K256Signature> {
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        K256Signature::from_slice(&rs).map_err(|_| CryptoError::MalformedSignature)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature(r={}, s={}, v={})",
            hex::encode(self.r),
            hex::encode(self.s),
            self.recovery_id
        )
    }
}

impl FromStr for Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Sign a 32-byte digest.
///
/// Deterministic (RFC 6979) and low-S. The attached recovery id makes
/// `recover(digest, &sig)` return `derive_public_key(private_key)`.
///
/// # Example
///
/// ```
/// use cckey_core::crypto::{blake256, generate_private_key, recover, sign, verify};
///
/// let key = generate_private_key();
/// let digest = blake256(b"transfer 100 CCC to alice");
/// let signature = sign(&digest, &key).unwrap();
///
/// assert!(verify(&digest, &signature, &key.public_key()).unwrap());
/// assert_eq!(recover(&digest, &signature).unwrap(), key.public_key());
/// ```
pub fn sign(digest: &[u8; DIGEST_LENGTH], private_key: &PrivateKey) -> Result<Signature> {
    let (signature, recovery_id): (K256Signature, RecoveryId) = private_key
        .signing_key()
        .sign_prehash_recoverable(digest)
        .map_err(|_| CryptoError::InvalidPrivateKey)?;

    // k256 already hands back low-S signatures; normalize anyway and keep the
    // recovery id in step with any flip.
    let normalized = signature.normalize_s();
    let recovery_byte = if normalized.is_some() {
        recovery_id.to_byte() ^ 1
    } else {
        recovery_id.to_byte()
    };
    let signature = normalized.unwrap_or(signature);

    let (r, s) = signature.split_bytes();
    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&r);
    s_bytes.copy_from_slice(&s);

    tracing::trace!(recovery_id = recovery_byte, "signed digest");

    Ok(Signature::new(r_bytes, s_bytes, recovery_byte))
}

/// [`sign`] for callers holding raw key bytes.
///
/// # Errors
///
/// [`CryptoError::InvalidPrivateKey`] when the scalar is zero or `>= n`.
pub fn sign_raw(
    digest: &[u8; DIGEST_LENGTH],
    private_key: &[u8; PRIVATE_KEY_LENGTH],
) -> Result<Signature> {
    let key = PrivateKey::from_bytes(private_key)?;
    sign(digest, &key)
}

/// Check a signature against a public key and digest.
///
/// Returns `Ok(false)` for anything that does not verify: wrong key, wrong
/// digest, tampered `r`/`s`, high-S. The recovery id plays no part in
/// verification.
///
/// # Errors
///
/// [`CryptoError::MalformedSignature`] when `r` or `s` is outside
/// `[1, n-1]`. That is a structural problem with the input, not a
/// verification outcome.
pub fn verify(
    digest: &[u8; DIGEST_LENGTH],
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool> {
    let k256_signature = signature.to_k256()?;
    Ok(public_key
        .verifying_key()
        .verify_prehash(digest, &k256_signature)
        .is_ok())
}

/// Verify using raw byte components straight off the wire.
///
/// Parses the 65-byte signature and a public key in any accepted encoding,
/// then defers to [`verify`].
pub fn verify_raw(
    digest: &[u8; DIGEST_LENGTH],
    signature_bytes: &[u8],
    public_key_bytes: &[u8],
) -> Result<bool> {
    let signature = Signature::from_slice(signature_bytes)?;
    let public_key = PublicKey::from_slice(public_key_bytes)?;
    verify(digest, &signature, &public_key)
}

/// Recover the signer's public key from a signature and digest.
///
/// # Errors
///
/// - [`CryptoError::RecoveryFailed`] if the recovery id is outside `0..=3`
///   or no valid curve point comes out of the recovery equation.
/// - [`CryptoError::MalformedSignature`] if `r` or `s` is outside `[1, n-1]`.
pub fn recover(digest: &[u8; DIGEST_LENGTH], signature: &Signature) -> Result<PublicKey> {
    if signature.recovery_id() > MAX_RECOVERY_ID {
        return Err(CryptoError::RecoveryFailed("recovery id out of range"));
    }
    let recovery_id = RecoveryId::from_byte(signature.recovery_id())
        .ok_or(CryptoError::RecoveryFailed("recovery id out of range"))?;
    let k256_signature = signature.to_k256()?;

    let verifying_key = VerifyingKey::recover_from_prehash(digest, &k256_signature, recovery_id)
        .map_err(|_| {
            tracing::debug!(
                recovery_id = signature.recovery_id(),
                "no valid point recovered from signature"
            );
            CryptoError::RecoveryFailed("no valid point recoverable")
        })?;

    Ok(PublicKey::from_verifying_key(verifying_key))
}

/// Index of the first entry in `items` that does not verify, if any.
///
/// Entries are checked in order; a malformed signature stops the scan with
/// an error. Sequential under the hood, there is no batched ECDSA check here.
pub fn first_invalid(
    items: &[([u8; DIGEST_LENGTH], Signature, PublicKey)],
) -> Result<Option<usize>> {
    for (index, (digest, signature, public_key)) in items.iter().enumerate() {
        if !verify(digest, signature, public_key)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// `true` when every entry verifies. Vacuously `true` for an empty slice.
pub fn verify_batch(items: &[([u8; DIGEST_LENGTH], Signature, PublicKey)]) -> Result<bool> {
    Ok(first_invalid(items)?.is_none())
}
