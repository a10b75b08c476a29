//! # Cryptographic Primitives
//!
//! The three engines everything else in the SDK leans on:
//!
//! - **hash** — BLAKE2b-256 (plain and keyed) and RIPEMD-160.
//! - **keys** — secp256k1 key generation, public key derivation, account ids.
//! - **signatures** — recoverable ECDSA: sign, verify, recover.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Curve arithmetic, RFC 6979 nonces and point recovery all come
//! from `k256`; the hashes come from RustCrypto. This module fixes the
//! algorithms, byte layouts and error semantics the network expects, and
//! nothing more. If you're tempted to optimize these functions, please
//! reconsider.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake256, blake256_multi, blake256_with_key, ripemd160};
pub use keys::{
    derive_account_id, derive_account_id_from_private, derive_public_key, derive_public_key_raw,
    generate_private_key, generate_private_key_with, AccountId, PrivateKey, PublicKey,
};
pub use signatures::{
    first_invalid, recover, sign, sign_raw, verify, verify_batch, verify_raw, Signature,
};
