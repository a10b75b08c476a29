// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # cckey — Key & Signature Core
//!
//! The cryptographic identity and transaction-authorization layer under the
//! CodeChain client SDK. It generates private keys, derives public keys and
//! 20-byte account ids, and produces, verifies and recovers the secp256k1
//! ECDSA signatures that authorize transactions.
//!
//! Everything around it (RPC transport, transaction encoding, wallet
//! storage) lives elsewhere and talks to this crate in bytes: a digest to
//! sign, a signature to check, a key to derive from.
//!
//! ## Architecture
//!
//! - **crypto** — the hashing, key derivation and signature engines.
//! - **identity** — a key pair bundled with its account id and network tag.
//! - **sdk** — the SDK entry object and its hex-string `util` helpers.
//! - **config** — protocol constants and SDK settings.
//! - **error** — the error taxonomy shared by all of the above.
//!
//! ## Design Philosophy
//!
//! 1. Fixed algorithms. BLAKE2b-256, RIPEMD-160 and secp256k1 are protocol
//!    constants, not type parameters.
//! 2. Deterministic signing. RFC 6979 nonces, always.
//! 3. "Signature doesn't match" is a `bool`, not an error.
//! 4. The network id is bookkeeping. It never reaches a hash or a signature.

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod sdk;

pub use error::{CryptoError, Result};
