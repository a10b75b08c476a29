//! # Hashing Utilities
//!
//! The three hash primitives the network's address and signature formats are
//! built on. We support exactly these and refuse to grow the list without a
//! protocol change to back it:
//!
//! - **blake256** — BLAKE2b with a 32-byte output. The wide hash: transaction
//!   digests, the first stage of account-id derivation, anything that needs
//!   preimage resistance.
//!
//! - **blake256_with_key** — BLAKE2b-256 in its native keyed (MAC) mode.
//!   Same output size, same determinism, but bound to a secret key of
//!   1 to 64 bytes.
//!
//! - **ripemd160** — the narrow hash. Only used to squeeze a 32-byte public
//!   key hash down to a 20-byte account id.
//!
//! Everything here is a pure function over its arguments. No shared state,
//! so call it from as many threads as you like.

use blake2::digest::consts::U32;
use blake2::digest::{Digest, KeyInit, Mac};
use blake2::{Blake2b, Blake2bMac};
use ripemd::Ripemd160;

use crate::config::{ACCOUNT_ID_LENGTH, DIGEST_LENGTH, MAX_MAC_KEY_LENGTH};
use crate::error::{CryptoError, Result};

type Blake2b256 = Blake2b<U32>;
type Blake2b256Mac = Blake2bMac<U32>;

/// Compute the BLAKE2b-256 hash of the input data.
///
/// This is the workhorse hash of the protocol. Callers sign its output,
/// never the raw payload.
///
/// # Example
///
/// ```
/// use cckey_core::crypto::blake256;
///
/// let digest = blake256(b"CodeChain");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let result = Blake2b256::digest(data);
    let mut output = [0u8; DIGEST_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// Compute keyed BLAKE2b-256 over the input data.
///
/// BLAKE2b accepts keys of 1 to 64 bytes. An empty key would silently
/// degrade to the unkeyed hash, so it is rejected along with oversized keys.
///
/// # Errors
///
/// [`CryptoError::InvalidKeyLength`] when `key` is empty or longer than
/// 64 bytes.
pub fn blake256_with_key(data: &[u8], key: &[u8]) -> Result<[u8; DIGEST_LENGTH]> {
    if key.is_empty() || key.len() > MAX_MAC_KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: "1..=64",
            got: key.len(),
        });
    }

    let mut mac = <Blake2b256Mac as KeyInit>::new_from_slice(key).map_err(|_| {
        CryptoError::InvalidKeyLength {
            expected: "1..=64",
            got: key.len(),
        }
    })?;
    Mac::update(&mut mac, data);
    let result = Mac::finalize(mac).into_bytes();

    let mut output = [0u8; DIGEST_LENGTH];
    output.copy_from_slice(&result);
    Ok(output)
}

/// Hash several byte slices as if they were concatenated.
///
/// Saves building a temporary buffer when hashing composite payloads like
/// `(header || body)`.
pub fn blake256_multi(parts: &[&[u8]]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; DIGEST_LENGTH];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Compute the RIPEMD-160 hash of the input data.
///
/// 20 bytes out. Used for account-id compression and nothing else.
pub fn ripemd160(data: &[u8]) -> [u8; ACCOUNT_ID_LENGTH] {
    let result = Ripemd160::digest(data);
    let mut output = [0u8; ACCOUNT_ID_LENGTH];
    output.copy_from_slice(&result);
    output
}
