//! Error types for the cckey core.
//!
//! Every fallible operation in the hashing, key derivation and signature
//! engines returns a [`CryptoError`]. All variants are local and
//! deterministic: feeding the same input back in reproduces the same error,
//! so nothing here is worth retrying.
//!
//! A signature that simply does not match is *not* an error. `verify` reports
//! that as `Ok(false)`; callers are expected to branch on it.

use thiserror::Error;

/// Errors produced by the cryptographic core.
///
/// Messages never include key bytes. If you need to know which key failed,
/// track that at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The private key scalar is zero or not below the curve order.
    #[error("invalid private key: scalar must be in [1, n-1]")]
    InvalidPrivateKey,

    /// The MAC key handed to the keyed hash has an unsupported length.
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        /// Human-readable description of the accepted range.
        expected: &'static str,
        /// Length that was actually supplied.
        got: usize,
    },

    /// `r` or `s` lies outside `[1, n-1]`.
    #[error("malformed signature: r and s must be in [1, n-1]")]
    MalformedSignature,

    /// No valid public key could be recovered from the signature.
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(&'static str),

    /// Key or signature bytes (or their hex form) did not parse.
    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, CryptoError>;

impl From<hex::FromHexError> for CryptoError {
    fn from(err: hex::FromHexError) -> Self {
        CryptoError::DecodingError(err.to_string())
    }
}
