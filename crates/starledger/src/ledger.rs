//! The Ledger: composition root for the star registry.
//!
//! Wires a [`Clock`], a [`Chain`] and an [`OwnershipChallenge`] together.
//! Appends are serialized behind the chain's write lock; reads share the
//! read lock and always see whole, committed blocks.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use starledger_core::{
    Block, BlockHash, Chain, Claim, Clock, Ed25519Verifier, OwnershipChallenge, SignatureVerifier,
    StarRecord, SystemClock, ValidationError,
};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

/// The star ledger.
///
/// Generic over its time source and signature scheme so both can be swapped
/// out; [`Ledger::new`] uses wall-clock time and Ed25519.
pub struct Ledger<C: Clock = SystemClock, V: SignatureVerifier = Ed25519Verifier> {
    /// The chain, guarded for single-writer access.
    chain: RwLock<Chain>,
    /// Challenge issuer built from the configuration.
    challenge: OwnershipChallenge,
    clock: C,
    verifier: V,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger on the system clock with Ed25519 identities and the
    /// default configuration. The genesis block is created immediately.
    pub fn new() -> Result<Self> {
        Self::with_parts(LedgerConfig::default(), SystemClock, Ed25519Verifier)
    }
}

impl<C: Clock, V: SignatureVerifier> Ledger<C, V> {
    /// Create a ledger from explicit parts. The genesis block is created
    /// immediately.
    pub fn with_parts(config: LedgerConfig, clock: C, verifier: V) -> Result<Self> {
        config.validate()?;
        let ledger = Self {
            chain: RwLock::new(Chain::new()),
            challenge: config.challenge(),
            clock,
            verifier,
            config,
        };
        ledger.initialize()?;
        Ok(ledger)
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Create the genesis block if the chain is empty.
    ///
    /// Returns whether a block was created.
    pub fn initialize(&self) -> Result<bool> {
        let mut chain = self.write();
        if !chain.is_empty() {
            return Ok(false);
        }

        let now = self.clock.now()?;
        chain.initialize(now)?;
        if let Some(genesis) = chain.tip() {
            info!(hash = %genesis.hash, timestamp = genesis.timestamp, "created genesis block");
        }
        Ok(true)
    }

    /// Height of the tip block.
    pub fn height(&self) -> u64 {
        self.read().height().unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Claim Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue the message `identity` has to sign to register a star.
    pub fn request_challenge(&self, identity: &str) -> Result<String> {
        let now = self.clock.now()?;
        let message = self.challenge.make_message(identity, now);
        debug!(identity, issued_at = now, "issued ownership challenge");
        Ok(message)
    }

    /// Register `star` to `identity`, given a signed challenge.
    ///
    /// The challenge and star are checked before the chain is locked; on any
    /// failure the chain is left exactly as it was.
    pub fn submit_claim(
        &self,
        identity: &str,
        message: &str,
        signature: &str,
        star: StarRecord,
    ) -> Result<Block> {
        let now = self.clock.now()?;
        let pending = self
            .challenge
            .submit(identity, message, signature, star, now, &self.verifier)
            .map_err(|e| {
                warn!(identity, error = %e, "rejected star claim");
                LedgerError::Claim(e)
            })?;

        let mut chain = self.write();
        let timestamp = self.clock.now()?;
        let block = chain.append(pending, timestamp).map_err(|e| {
            warn!(identity, error = %e, "append rejected, chain unchanged");
            LedgerError::Chain(e)
        })?;

        info!(
            height = block.height,
            hash = %block.hash,
            owner = identity,
            "admitted star claim"
        );
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a block by hash.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<Block> {
        self.read().get_by_hash(hash).cloned()
    }

    /// Get a block by height.
    pub fn block_by_height(&self, height: u64) -> Option<Block> {
        self.read().get_by_height(height).cloned()
    }

    /// All claims owned by `identity`, in chain order.
    pub fn stars_by_owner(&self, identity: &str) -> Vec<Claim> {
        self.read().stars_by_owner(identity)
    }

    /// All blocks holding claims owned by `identity`, in chain order.
    pub fn blocks_by_owner(&self, identity: &str) -> Vec<Block> {
        self.read()
            .blocks_by_owner(identity)
            .into_iter()
            .cloned()
            .collect()
    }

    /// A consistent copy of every committed block.
    pub fn snapshot(&self) -> Vec<Block> {
        self.read().blocks().to_vec()
    }

    /// Validate the entire chain.
    pub fn validate_chain(&self) -> Vec<ValidationError> {
        let errors = self.read().validate_chain();
        if !errors.is_empty() {
            warn!(count = errors.len(), "chain validation found problems");
        }
        errors
    }

    /// Validate the entire chain, one human-readable line per problem.
    pub fn validation_report(&self) -> Vec<String> {
        self.validate_chain()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    // Appends validate before they push, so a panic while the lock was held
    // cannot have left a partial block behind; the guard is safe to reclaim.

    fn read(&self) -> RwLockReadGuard<'_, Chain> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Chain> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock, V: SignatureVerifier> std::fmt::Debug for Ledger<C, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("height", &self.height())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
