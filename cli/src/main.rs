// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # cckey
//!
//! Entry point for the `cckey` binary. Parses CLI arguments, initializes
//! logging, runs one command against `cckey-core` and prints the result.
//!
//! Subcommands:
//!
//! - `generate`   — new private key, public key and account id
//! - `public`     — public key of a private key
//! - `account-id` — account id of a private or public key
//! - `hash`       — BLAKE2b-256 (optionally keyed) or RIPEMD-160
//! - `sign`       — sign a 32-byte digest
//! - `verify`     — check a signature; exit code 1 on mismatch
//! - `recover`    — recover the signer's public key
//! - `version`    — print build version information
//!
//! Results go to stdout, logs to stderr. Any error exits with code 2.

mod cli;
mod logging;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use cckey_core::config::{
    NetworkId, SdkConfig, COMPRESS_HASH_FUNCTION, SIGNING_CURVE, WIDE_HASH_FUNCTION,
};
use cckey_core::crypto::{self, AccountId, PrivateKey, PublicKey, Signature};
use cckey_core::sdk::Sdk;

use cli::{CckeyCli, Commands, HashAlgorithm, OutputFormat};

/// Exit code for a well-formed signature that does not match.
const EXIT_MISMATCH: u8 = 1;

/// Exit code for any error (bad input, invalid key, failed recovery).
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = CckeyCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match run(cli.command, cli.output, cli.config.as_deref()) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(command: Commands, output: OutputFormat, config: Option<&Path>) -> Result<ExitCode> {
    match command {
        Commands::Generate(args) => emit(&generate(args, load_sdk_config(config)?)?, output),
        Commands::Public(args) => emit(&public(args)?, output),
        Commands::AccountId(args) => emit(&account_id(args)?, output),
        Commands::Hash(args) => emit(&hash(args)?, output),
        Commands::Sign(args) => emit(&sign(args)?, output),
        Commands::Verify(args) => {
            let report = verify(args)?;
            emit(&report, output)?;
            if !report.valid {
                return Ok(ExitCode::from(EXIT_MISMATCH));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Recover(args) => emit(&recover(args)?, output),
        Commands::Version => emit(&version(), output),
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A command result, printable as plain text or as a JSON document.
trait Report: Serialize {
    fn text(&self) -> String;
}

fn emit<R: Report>(report: &R, output: OutputFormat) -> Result<ExitCode> {
    let rendered = match output {
        OutputFormat::Text => report.text(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize result")?
        }
    };
    println!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReport {
    network_id: NetworkId,
    private_key: String,
    public_key: PublicKey,
    account_id: AccountId,
}

impl Report for GenerateReport {
    fn text(&self) -> String {
        format!(
            "network id  : {}\nprivate key : {}\npublic key  : {}\naccount id  : {}",
            self.network_id, self.private_key, self.public_key, self.account_id
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicReport {
    public_key: PublicKey,
    compressed: String,
}

impl Report for PublicReport {
    fn text(&self) -> String {
        self.public_key.to_hex()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountIdReport {
    account_id: AccountId,
}

impl Report for AccountIdReport {
    fn text(&self) -> String {
        self.account_id.to_hex()
    }
}

#[derive(Debug, Serialize)]
struct HashReport {
    algorithm: &'static str,
    keyed: bool,
    digest: String,
}

impl Report for HashReport {
    fn text(&self) -> String {
        self.digest.clone()
    }
}

#[derive(Debug, Serialize)]
struct SignReport {
    signature: Signature,
}

impl Report for SignReport {
    fn text(&self) -> String {
        self.signature.to_hex()
    }
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    valid: bool,
}

impl Report for VerifyReport {
    fn text(&self) -> String {
        self.valid.to_string()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecoverReport {
    public_key: PublicKey,
    account_id: AccountId,
}

impl Report for RecoverReport {
    fn text(&self) -> String {
        format!(
            "public key : {}\naccount id : {}",
            self.public_key, self.account_id
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionReport {
    version: &'static str,
    curve: &'static str,
    wide_hash: &'static str,
    compress_hash: &'static str,
}

impl Report for VersionReport {
    fn text(&self) -> String {
        format!(
            "cckey {}\ncurve     {}\nhashes    {} / {}",
            self.version, self.curve, self.wide_hash, self.compress_hash
        )
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn generate(args: cli::GenerateArgs, config: SdkConfig) -> Result<GenerateReport> {
    let config = match args.network_id {
        Some(id) => config.with_network_id(NetworkId(id)),
        None => config,
    };
    let sdk = Sdk::new(config);
    let identity = sdk.generate_identity();
    tracing::info!(account_id = %identity.account_id(), "generated identity");

    Ok(GenerateReport {
        network_id: identity.network_id(),
        private_key: identity.private_key().to_hex(),
        public_key: *identity.public_key(),
        account_id: *identity.account_id(),
    })
}

fn public(args: cli::PublicArgs) -> Result<PublicReport> {
    let private_key = parse_private_key(&args.private_key)?;
    let public_key = crypto::derive_public_key(&private_key);
    Ok(PublicReport {
        public_key,
        compressed: hex::encode(public_key.to_compressed()),
    })
}

fn account_id(args: cli::AccountIdArgs) -> Result<AccountIdReport> {
    let account_id = match (args.private_key, args.public_key) {
        (Some(private_key), _) => {
            crypto::derive_account_id_from_private(&parse_private_key(&private_key)?)
        }
        (None, Some(public_key)) => crypto::derive_account_id(&parse_public_key(&public_key)?),
        (None, None) => bail!("either --private-key or --public-key is required"),
    };
    Ok(AccountIdReport { account_id })
}

fn hash(args: cli::HashArgs) -> Result<HashReport> {
    let data = if args.text {
        args.data.into_bytes()
    } else {
        decode_hex(&args.data).context("invalid input data")?
    };

    let (algorithm, digest) = match (args.algorithm, args.key.as_deref()) {
        (HashAlgorithm::Blake256, None) => ("blake256", hex::encode(crypto::blake256(&data))),
        (HashAlgorithm::Blake256, Some(key)) => {
            let key = decode_hex(key).context("invalid MAC key")?;
            let digest = crypto::blake256_with_key(&data, &key).context("keyed hash failed")?;
            ("blake256", hex::encode(digest))
        }
        (HashAlgorithm::Ripemd160, None) => ("ripemd160", hex::encode(crypto::ripemd160(&data))),
        (HashAlgorithm::Ripemd160, Some(_)) => bail!("--key is only supported with blake256"),
    };

    Ok(HashReport {
        algorithm,
        keyed: args.key.is_some(),
        digest,
    })
}

fn sign(args: cli::SignArgs) -> Result<SignReport> {
    let private_key = parse_private_key(&args.private_key)?;
    let digest = parse_digest(&args.digest)?;
    let signature = crypto::sign(&digest, &private_key).context("signing failed")?;
    Ok(SignReport { signature })
}

fn verify(args: cli::VerifyArgs) -> Result<VerifyReport> {
    let digest = parse_digest(&args.digest)?;
    let signature = parse_signature(&args.signature)?;
    let public_key = parse_public_key(&args.public_key)?;
    let valid = crypto::verify(&digest, &signature, &public_key).context("verification failed")?;
    tracing::info!(valid, "signature checked");
    Ok(VerifyReport { valid })
}

fn recover(args: cli::RecoverArgs) -> Result<RecoverReport> {
    let digest = parse_digest(&args.digest)?;
    let signature = parse_signature(&args.signature)?;
    let public_key = crypto::recover(&digest, &signature).context("recovery failed")?;
    Ok(RecoverReport {
        public_key,
        account_id: public_key.account_id(),
    })
}

fn version() -> VersionReport {
    VersionReport {
        version: env!("CARGO_PKG_VERSION"),
        curve: SIGNING_CURVE,
        wide_hash: WIDE_HASH_FUNCTION,
        compress_hash: COMPRESS_HASH_FUNCTION,
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// SDK settings from `--config`, or the SDK defaults without one.
fn load_sdk_config(path: Option<&Path>) -> Result<SdkConfig> {
    let Some(path) = path else {
        return Ok(SdkConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = SdkConfig::from_json(&raw)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    Ok(hex::decode(s.strip_prefix("0x").unwrap_or(s))?)
}

fn parse_digest(s: &str) -> Result<[u8; 32]> {
    let bytes = decode_hex(s).context("invalid digest")?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("digest must be 32 bytes, got {len}"))
}

fn parse_private_key(s: &str) -> Result<PrivateKey> {
    PrivateKey::from_hex(s.trim()).context("invalid private key")
}

fn parse_public_key(s: &str) -> Result<PublicKey> {
    PublicKey::from_hex(s.trim()).context("invalid public key")
}

fn parse_signature(s: &str) -> Result<Signature> {
    Signature::from_hex(s.trim()).context("invalid signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cckey_core::CryptoError;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn digest_hex() -> String {
        hex::encode(crypto::blake256(b"cli payload"))
    }

    #[test]
    fn public_of_key_one_is_the_generator() {
        let report = public(cli::PublicArgs {
            private_key: KEY_ONE.into(),
        })
        .unwrap();
        assert!(report.public_key.to_hex().starts_with("79be667e"));
        assert_eq!(
            report.compressed,
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn account_id_agrees_for_private_and_public_input() {
        let public_key = crypto::derive_public_key(&PrivateKey::from_hex(KEY_ONE).unwrap());
        let from_private = account_id(cli::AccountIdArgs {
            private_key: Some(KEY_ONE.into()),
            public_key: None,
        })
        .unwrap();
        let from_public = account_id(cli::AccountIdArgs {
            private_key: None,
            public_key: Some(hex::encode(public_key.to_compressed())),
        })
        .unwrap();
        assert_eq!(from_private.account_id, from_public.account_id);
    }

    #[test]
    fn sign_verify_recover_round_trip() {
        let signature = sign(cli::SignArgs {
            private_key: KEY_ONE.into(),
            digest: digest_hex(),
        })
        .unwrap()
        .signature;
        let public_key = crypto::derive_public_key(&PrivateKey::from_hex(KEY_ONE).unwrap());

        let report = verify(cli::VerifyArgs {
            digest: digest_hex(),
            signature: signature.to_hex(),
            public_key: public_key.to_hex(),
        })
        .unwrap();
        assert!(report.valid);

        let recovered = recover(cli::RecoverArgs {
            digest: digest_hex(),
            signature: signature.to_hex(),
        })
        .unwrap();
        assert_eq!(recovered.public_key, public_key);
        assert_eq!(recovered.account_id, public_key.account_id());
    }

    #[test]
    fn verify_mismatch_is_not_an_error() {
        let signature = crypto::sign(
            &crypto::blake256(b"something else"),
            &PrivateKey::from_hex(KEY_ONE).unwrap(),
        )
        .unwrap();
        let public_key = crypto::derive_public_key(&PrivateKey::from_hex(KEY_ONE).unwrap());

        let report = verify(cli::VerifyArgs {
            digest: digest_hex(),
            signature: signature.to_hex(),
            public_key: public_key.to_hex(),
        })
        .unwrap();
        assert!(!report.valid);
    }

    #[test]
    fn zero_key_surfaces_the_core_error() {
        let err = sign(cli::SignArgs {
            private_key: "00".repeat(32),
            digest: digest_hex(),
        })
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CryptoError>(),
            Some(&CryptoError::InvalidPrivateKey)
        );
    }

    #[test]
    fn short_digest_is_rejected() {
        let err = sign(cli::SignArgs {
            private_key: KEY_ONE.into(),
            digest: "abcd".into(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("32 bytes"));
    }

    #[test]
    fn hash_text_and_hex_agree() {
        let text = hash(cli::HashArgs {
            algorithm: HashAlgorithm::Blake256,
            key: None,
            text: true,
            data: "abc".into(),
        })
        .unwrap();
        let hex_input = hash(cli::HashArgs {
            algorithm: HashAlgorithm::Blake256,
            key: None,
            text: false,
            data: "0x616263".into(),
        })
        .unwrap();
        assert_eq!(text.digest, hex_input.digest);
        assert_eq!(
            text.digest,
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }

    #[test]
    fn hash_ripemd160_rejects_a_key() {
        assert!(hash(cli::HashArgs {
            algorithm: HashAlgorithm::Ripemd160,
            key: Some("01".into()),
            text: true,
            data: "abc".into(),
        })
        .is_err());
    }

    #[test]
    fn keyed_hash_rejects_empty_key() {
        let err = hash(cli::HashArgs {
            algorithm: HashAlgorithm::Blake256,
            key: Some(String::new()),
            text: true,
            data: "abc".into(),
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CryptoError>(),
            Some(CryptoError::InvalidKeyLength { got: 0, .. })
        ));
    }

    #[test]
    fn config_file_supplies_the_network_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdk.json");
        std::fs::write(&path, r#"{"server": "http://rpc:8080", "networkId": 34}"#).unwrap();

        let config = load_sdk_config(Some(&path)).unwrap();
        assert_eq!(config.server, "http://rpc:8080");

        let report = generate(cli::GenerateArgs { network_id: None }, config.clone()).unwrap();
        assert_eq!(report.network_id, NetworkId(0x22));

        let report = generate(cli::GenerateArgs { network_id: Some(0x11) }, config).unwrap();
        assert_eq!(report.network_id, NetworkId(0x11));
    }

    #[test]
    fn missing_config_file_is_an_error_and_none_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sdk_config(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));

        assert_eq!(load_sdk_config(None).unwrap(), SdkConfig::default());
    }

    #[test]
    fn generate_tags_the_network_only() {
        let report = generate(
            cli::GenerateArgs {
                network_id: Some(0x22),
            },
            SdkConfig::default(),
        )
        .unwrap();
        assert_eq!(report.network_id, NetworkId(0x22));
        let private_key = PrivateKey::from_hex(&report.private_key).unwrap();
        assert_eq!(private_key.public_key(), report.public_key);
        assert_eq!(report.public_key.account_id(), report.account_id);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["accountId"], report.account_id.to_hex());
    }
}
