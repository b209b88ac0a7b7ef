//! Cryptographic primitives for the star ledger.
//!
//! Blake3 for block hashes, Ed25519 for claimant identities. The ownership
//! challenge only sees the [`SignatureVerifier`] capability, never a key type.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::BlockHash;

/// Blake3 digest of some bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3({})", hex::encode(&self.0[..8]))
    }
}

impl From<Blake3Hash> for BlockHash {
    fn from(digest: Blake3Hash) -> Self {
        BlockHash(digest.0)
    }
}

/// An Ed25519 public key. Its hex form is a claimant's identity string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse an identity string.
    pub fn from_hex(identity: &str) -> Result<Self, CoreError> {
        let mut key = [0u8; 32];
        hex::decode_to_slice(identity, &mut key).map_err(|_| CoreError::InvalidPublicKey)?;
        Ok(Self(key))
    }

    /// Check `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let key = VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        key.verify(message, &Signature::from_bytes(&signature.0))
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", hex::encode(&self.0[..8]))
    }
}

/// An Ed25519 signature, carried as hex on the claim path.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(signature: &str) -> Result<Self, CoreError> {
        let mut bytes = [0u8; 64];
        hex::decode_to_slice(signature, &mut bytes).map_err(|_| CoreError::InvalidSignature)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}..)", hex::encode(&self.0[..8]))
    }
}

/// A claimant's signing key.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Deterministic keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The identity string stars are registered under.
    pub fn identity(&self) -> String {
        self.public_key().to_hex()
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keypair").field(&self.public_key()).finish()
    }
}

/// Signature verification capability.
///
/// `identity` and `signature` are opaque strings; their format belongs to the
/// implementation. Anything that cannot be parsed simply fails verification.
pub trait SignatureVerifier: Send + Sync {
    /// Check that `signature` is a valid signature over `message` by the key
    /// behind `identity`.
    fn verify(&self, message: &str, identity: &str, signature: &str) -> bool;
}

/// Ed25519 verifier: identities are hex public keys, signatures are hex
/// signatures over the UTF-8 message bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, identity: &str, signature: &str) -> bool {
        let Ok(public_key) = Ed25519PublicKey::from_hex(identity) else {
            return false;
        };
        let Ok(signature) = Ed25519Signature::from_hex(signature) else {
            return false;
        };
        public_key.verify(message.as_bytes(), &signature).is_ok()
    }
}
