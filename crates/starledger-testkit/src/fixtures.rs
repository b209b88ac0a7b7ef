//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use starledger::{Block, Ed25519Verifier, Keypair, Ledger, LedgerConfig, ManualClock, StarRecord};

/// Fixed starting time for fixture clocks (2023-11-14T22:13:20Z).
pub const T0: u64 = 1_700_000_000;

/// A claimant with a deterministic Ed25519 keypair.
#[derive(Debug, Clone)]
pub struct TestIdentity {
    pub keypair: Keypair,
}

impl TestIdentity {
    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// Create the `index`-th deterministic identity.
    pub fn from_index(index: u8) -> Self {
        let mut seed = [0u8; 32];
        seed[0] = index;
        seed[31] = 0x5a;
        Self::with_seed(seed)
    }

    /// The identity string claims are registered under.
    pub fn id(&self) -> String {
        self.keypair.identity()
    }

    /// Sign a challenge message, hex-encoded.
    pub fn sign(&self, message: &str) -> String {
        self.keypair.sign(message.as_bytes()).to_hex()
    }
}

/// Create multiple distinct identities for multi-party tests.
pub fn identities(count: u8) -> Vec<TestIdentity> {
    (1..=count).map(TestIdentity::from_index).collect()
}

/// A ledger on a manual clock starting at [`T0`].
pub struct TestLedger {
    pub ledger: Ledger<Arc<ManualClock>, Ed25519Verifier>,
    pub clock: Arc<ManualClock>,
}

impl TestLedger {
    /// Create with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create with the given configuration.
    ///
    /// # Panics
    ///
    /// If the configuration is invalid.
    pub fn with_config(config: LedgerConfig) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let ledger = Ledger::with_parts(config, Arc::clone(&clock), Ed25519Verifier)
            .expect("fixture ledger configuration must be valid");
        Self { ledger, clock }
    }

    /// Request a challenge, sign it, and submit `star` in one go.
    pub fn claim(&self, identity: &TestIdentity, star: StarRecord) -> starledger::Result<Block> {
        let id = identity.id();
        let message = self.ledger.request_challenge(&id)?;
        let signature = identity.sign(&message);
        self.ledger.submit_claim(&id, &message, &signature, star)
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid star whose right ascension encodes `n`, so stars stay distinct.
pub fn sample_star(n: u32) -> StarRecord {
    StarRecord::new(
        format!("{}h {}m 1.0s", n % 24, n % 60),
        "-26° 29' 24.9",
        "Found star using https://www.google.com/sky/",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_claim() {
        let fixture = TestLedger::new();
        let alice = TestIdentity::from_index(1);

        let block = fixture.claim(&alice, sample_star(3)).unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(block.timestamp, T0);
        assert_eq!(block.owner(), Some(alice.id()));
    }

    #[test]
    fn test_identities_are_distinct() {
        let ids: Vec<_> = identities(3).iter().map(TestIdentity::id).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn test_identities_are_deterministic() {
        assert_eq!(TestIdentity::from_index(4).id(), TestIdentity::from_index(4).id());
    }
}
