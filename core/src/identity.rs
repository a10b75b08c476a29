//! # Identity
//!
//! An [`Identity`] is a private key bundled with everything derived from it,
//! plus the network it is meant for:
//!
//! 1. **Private key** — signs things, proves ownership.
//! 2. **Public key** — `k * G`, what verifiers check against.
//! 3. **Account id** — the 20-byte handle the network uses in place of the
//!    full public key.
//! 4. **Network id** — which chain the surrounding SDK will use this on.
//!
//! The network id is carried, not used. Two identities with the same key on
//! different networks have the same public key and the same account id;
//! anything that needs to tell them apart must do so above this crate.

use rand_core::{CryptoRng, RngCore};

use crate::config::{NetworkId, DIGEST_LENGTH};
use crate::crypto::keys::{
    derive_account_id, derive_public_key, generate_private_key_with, AccountId, PrivateKey,
    PublicKey,
};
use crate::crypto::signatures::{sign, Signature};
use crate::error::Result;

/// A key pair, its account id, and the network it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    network_id: NetworkId,
    private_key: PrivateKey,
    public_key: PublicKey,
    account_id: AccountId,
}

impl Identity {
    /// Generate a new identity from the given CSPRNG.
    pub fn generate<R>(network_id: NetworkId, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        Self::from_private_key(network_id, generate_private_key_with(rng))
    }

    /// Wrap an existing private key and derive the rest.
    pub fn from_private_key(network_id: NetworkId, private_key: PrivateKey) -> Self {
        let public_key = derive_public_key(&private_key);
        let account_id = derive_account_id(&public_key);
        tracing::debug!(
            network_id = %network_id,
            account_id = %account_id,
            "identity derived"
        );
        Self {
            network_id,
            private_key,
            public_key,
            account_id,
        }
    }

    /// The network this identity was created for.
    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    /// The private key. Don't pass it around more than necessary.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Sign a digest with this identity's key.
    pub fn sign(&self, digest: &[u8; DIGEST_LENGTH]) -> Result<Signature> {
        sign(digest, &self.private_key)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("network_id", &self.network_id)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{blake256, recover, verify};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn derived_fields_are_consistent() {
        let id = Identity::generate(NetworkId(0x11), &mut StdRng::seed_from_u64(1));
        assert_eq!(id.public_key(), &id.private_key().public_key());
        assert_eq!(id.account_id(), &id.public_key().account_id());
        assert_eq!(id.network_id(), NetworkId(0x11));
    }

    #[test]
    fn network_id_does_not_touch_crypto() {
        let solo = Identity::generate(NetworkId(0x11), &mut StdRng::seed_from_u64(9));
        let other = Identity::generate(NetworkId(0x42), &mut StdRng::seed_from_u64(9));
        assert_eq!(solo.public_key(), other.public_key());
        assert_eq!(solo.account_id(), other.account_id());

        let digest = blake256(b"same payload");
        assert_eq!(solo.sign(&digest).unwrap(), other.sign(&digest).unwrap());
        assert_ne!(solo, other);
    }

    #[test]
    fn identity_signatures_verify_and_recover() {
        let id = Identity::generate(NetworkId::default(), &mut rand::rngs::OsRng);
        let digest = blake256(b"payload");
        let sig = id.sign(&digest).unwrap();
        assert!(verify(&digest, &sig, id.public_key()).unwrap());
        assert_eq!(&recover(&digest, &sig).unwrap(), id.public_key());
    }

    #[test]
    fn debug_hides_private_key() {
        let id = Identity::generate(NetworkId::default(), &mut StdRng::seed_from_u64(3));
        let debug = format!("{id:?}");
        assert!(!debug.contains(&id.private_key().to_hex()));
    }
}
