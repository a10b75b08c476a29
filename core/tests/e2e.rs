//! End-to-end tests for the cckey core.
//!
//! These exercise the whole identity pipeline the way the SDK uses it:
//! generate a key, derive its public key and account id, hash a payload,
//! sign the digest, then verify and recover. The for-all properties run
//! under proptest; the fixed vectors pin the byte-level formats.

use proptest::prelude::*;
use sha2::{Digest, Sha256};

use cckey_core::config::NetworkId;
use cckey_core::crypto::{
    blake256, derive_account_id, derive_account_id_from_private, derive_public_key,
    derive_public_key_raw, generate_private_key, recover, ripemd160, sign, sign_raw, verify,
    PrivateKey, PublicKey, Signature,
};
use cckey_core::identity::Identity;
use cckey_core::CryptoError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const GENERATOR: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
                         483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

fn key_one() -> PrivateKey {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    PrivateKey::from_bytes(&bytes).unwrap()
}

fn flip_bit(bytes: &mut [u8], bit: usize) {
    bytes[bit / 8] ^= 1 << (bit % 8);
}

fn valid_key() -> impl Strategy<Value = PrivateKey> {
    any::<[u8; 32]>().prop_filter_map("scalar out of range", |bytes| {
        PrivateKey::from_bytes(&bytes).ok()
    })
}

// ---------------------------------------------------------------------------
// Fixed vectors
// ---------------------------------------------------------------------------

#[test]
fn rfc6979_reference_vector() {
    // Private key 1 over sha256("Satoshi Nakamoto"): the widely published
    // secp256k1 RFC 6979 vector.
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(b"Satoshi Nakamoto"));
    let sig = sign(&digest, &key_one()).unwrap();

    assert_eq!(
        hex::encode(sig.r()),
        "934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8"
    );
    assert_eq!(
        hex::encode(sig.s()),
        "2442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5"
    );

    let generator = PublicKey::from_hex(GENERATOR).unwrap();
    assert!(verify(&digest, &sig, &generator).unwrap());
    assert_eq!(recover(&digest, &sig).unwrap(), generator);
}

#[test]
fn account_id_of_generator_follows_pipeline() {
    let public = derive_public_key(&key_one());
    assert_eq!(public.to_hex(), GENERATOR);

    let raw = hex::decode(GENERATOR).unwrap();
    let expected = ripemd160(&blake256(&raw));
    assert_eq!(derive_account_id(&public).as_bytes(), &expected);
    assert_eq!(derive_account_id_from_private(&key_one()).as_bytes(), &expected);
}

#[test]
fn zero_key_fails_everywhere() {
    let digest = blake256(b"payload");
    assert_eq!(
        derive_public_key_raw(&[0u8; 32]).unwrap_err(),
        CryptoError::InvalidPrivateKey
    );
    assert_eq!(
        sign_raw(&digest, &[0u8; 32]).unwrap_err(),
        CryptoError::InvalidPrivateKey
    );
}

#[test]
fn full_lifecycle() {
    // Identity creation.
    let identity = Identity::generate(NetworkId::default(), &mut rand::rngs::OsRng);
    let account_id = *identity.account_id();

    // A transaction collaborator hands over a payload; we sign its digest.
    let payload = b"{\"type\":\"pay\",\"amount\":100,\"seq\":0}";
    let digest = blake256(payload);
    let signature = identity.sign(&digest).unwrap();

    // Over the wire and back.
    let wire = signature.to_bytes();
    let received = Signature::from_bytes(&wire);

    // Receiver recovers the key and checks it maps to the sender's account.
    let recovered = recover(&digest, &received).unwrap();
    assert_eq!(derive_account_id(&recovered), account_id);
    assert!(verify(&digest, &received, &recovered).unwrap());
}

#[test]
fn ten_thousand_generated_keys_are_in_range() {
    for _ in 0..10_000 {
        let key = generate_private_key();
        assert_ne!(key.to_bytes(), [0u8; 32]);
        // Re-parsing enforces [1, n-1].
        assert!(PrivateKey::from_bytes(&key.to_bytes()).is_ok());
    }
}

#[test]
fn concurrent_signing_needs_no_locks() {
    let key = generate_private_key();
    let public = key.public_key();
    let handles: Vec<_> = (0u8..8)
        .map(|i| {
            let key = key.clone();
            std::thread::spawn(move || {
                let digest = blake256(&[i]);
                (digest, sign(&digest, &key).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (digest, sig) = handle.join().unwrap();
        assert!(verify(&digest, &sig, &public).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn public_key_derivation_is_deterministic(key in valid_key()) {
        prop_assert_eq!(derive_public_key(&key), derive_public_key(&key));
    }

    #[test]
    fn recover_inverts_sign(key in valid_key(), digest in any::<[u8; 32]>()) {
        let sig = sign(&digest, &key).unwrap();
        prop_assert_eq!(recover(&digest, &sig).unwrap(), derive_public_key(&key));
    }

    #[test]
    fn signatures_verify_under_their_key(key in valid_key(), digest in any::<[u8; 32]>()) {
        let sig = sign(&digest, &key).unwrap();
        prop_assert!(verify(&digest, &sig, &derive_public_key(&key)).unwrap());
    }

    #[test]
    fn account_id_is_deterministic_and_20_bytes(key in valid_key()) {
        let public = derive_public_key(&key);
        let a = derive_account_id(&public);
        prop_assert_eq!(a, derive_account_id(&public));
        prop_assert_eq!(a.as_bytes().len(), 20);
    }

    #[test]
    fn digest_bit_flip_breaks_verification(
        key in valid_key(),
        digest in any::<[u8; 32]>(),
        bit in 0usize..256,
    ) {
        let sig = sign(&digest, &key).unwrap();
        let mut tampered = digest;
        flip_bit(&mut tampered, bit);
        prop_assert!(!verify(&tampered, &sig, &key.public_key()).unwrap());
    }

    #[test]
    fn r_or_s_bit_flip_breaks_verification(
        key in valid_key(),
        digest in any::<[u8; 32]>(),
        bit in 0usize..512,
    ) {
        let sig = sign(&digest, &key).unwrap();
        let mut wire = sig.to_bytes();
        flip_bit(&mut wire[..64], bit);
        let tampered = Signature::from_bytes(&wire);
        // Either it no longer verifies, or r/s left [1, n-1] altogether.
        match verify(&digest, &tampered, &key.public_key()) {
            Ok(valid) => prop_assert!(!valid),
            Err(err) => prop_assert_eq!(err, CryptoError::MalformedSignature),
        }
    }

    #[test]
    fn public_key_bit_flip_breaks_verification(
        key in valid_key(),
        digest in any::<[u8; 32]>(),
        bit in 0usize..512,
    ) {
        let sig = sign(&digest, &key).unwrap();
        let mut raw = key.public_key().to_bytes();
        flip_bit(&mut raw, bit);
        // Most flips leave the curve entirely; the rest land on another key.
        if let Ok(other) = PublicKey::from_bytes(&raw) {
            prop_assert!(!verify(&digest, &sig, &other).unwrap());
        }
    }
}
