//! # CLI Interface
//!
//! Defines the command-line argument structure for `cckey` using `clap`
//! derive. Every flag that carries key material or a digest can also be
//! supplied through a `CCKEY_*` environment variable, which keeps private
//! keys out of shell history. The one exception is `account-id`, whose two
//! mutually exclusive key flags are command-line only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// secp256k1 key and signature tool for the CodeChain SDK.
///
/// Generates keys, derives public keys and account ids, hashes payloads,
/// and signs, verifies and recovers recoverable ECDSA signatures.
#[derive(Parser, Debug)]
#[command(
    name = "cckey",
    about = "CodeChain key and signature tool",
    version,
    propagate_version = true
)]
pub struct CckeyCli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "CCKEY_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log line format (logs go to stderr).
    #[arg(
        long,
        global = true,
        env = "CCKEY_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Result format on stdout.
    #[arg(
        long,
        global = true,
        env = "CCKEY_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub output: OutputFormat,

    /// SDK config file (JSON with `server` and `networkId`).
    ///
    /// Supplies the default network id for `generate`.
    #[arg(long, short = 'c', global = true, env = "CCKEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// How command results are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Hash functions exposed by `cckey hash`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// BLAKE2b with a 32-byte output, optionally keyed.
    Blake256,
    /// RIPEMD-160.
    Ripemd160,
}

/// Top-level subcommands for the cckey binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh private key with its public key and account id.
    Generate(GenerateArgs),
    /// Derive the public key of a private key.
    Public(PublicArgs),
    /// Derive the 20-byte account id of a private or public key.
    AccountId(AccountIdArgs),
    /// Hash hex data or text.
    Hash(HashArgs),
    /// Sign a 32-byte digest.
    Sign(SignArgs),
    /// Verify a signature. Exits 0 on match, 1 on mismatch.
    Verify(VerifyArgs),
    /// Recover the signer's public key from a digest and signature.
    Recover(RecoverArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Network id to tag the identity with, as `0x11` or `17`.
    ///
    /// Recorded in the output only. It does not change the key or the
    /// account id. Defaults to the config file's network id, else `0x11`.
    #[arg(long, env = "CCKEY_NETWORK_ID", value_parser = parse_network_id)]
    pub network_id: Option<u8>,
}

/// Arguments for the `public` subcommand.
#[derive(Args, Debug)]
pub struct PublicArgs {
    /// Hex-encoded 32-byte private key.
    #[arg(long, env = "CCKEY_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Arguments for the `account-id` subcommand.
#[derive(Args, Debug)]
pub struct AccountIdArgs {
    /// Hex-encoded 32-byte private key. Flag only, exported `CCKEY_*`
    /// key variables are not consulted here.
    #[arg(long, conflicts_with = "public_key", required_unless_present = "public_key")]
    pub private_key: Option<String>,

    /// Hex-encoded public key (33, 64 or 65 bytes). Flag only.
    #[arg(long)]
    pub public_key: Option<String>,
}

/// Arguments for the `hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Hash function.
    #[arg(long, short = 'a', value_enum, default_value_t = HashAlgorithm::Blake256)]
    pub algorithm: HashAlgorithm,

    /// Hex-encoded MAC key (1 to 64 bytes). Only valid with blake256.
    #[arg(long, env = "CCKEY_HASH_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Treat the input as UTF-8 text instead of hex.
    #[arg(long)]
    pub text: bool,

    /// Input data, hex-encoded unless `--text` is given.
    pub data: String,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Hex-encoded 32-byte private key.
    #[arg(long, env = "CCKEY_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Hex-encoded 32-byte digest.
    #[arg(long, env = "CCKEY_DIGEST")]
    pub digest: String,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Hex-encoded 32-byte digest.
    #[arg(long, env = "CCKEY_DIGEST")]
    pub digest: String,

    /// Hex-encoded 65-byte signature.
    #[arg(long, env = "CCKEY_SIGNATURE")]
    pub signature: String,

    /// Hex-encoded public key (33, 64 or 65 bytes).
    #[arg(long, env = "CCKEY_PUBLIC_KEY")]
    pub public_key: String,
}

/// Arguments for the `recover` subcommand.
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// Hex-encoded 32-byte digest.
    #[arg(long, env = "CCKEY_DIGEST")]
    pub digest: String,

    /// Hex-encoded 65-byte signature.
    #[arg(long, env = "CCKEY_SIGNATURE")]
    pub signature: String,
}

/// Accepts `0x`-prefixed hex or plain decimal.
fn parse_network_id(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid network id {s:?}: {e}"))
}
