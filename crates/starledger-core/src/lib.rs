//! # Star Ledger Core
//!
//! Pure primitives for the star ledger: blocks, the hash-linked chain, and
//! the ownership challenge that gates star claims.
//!
//! This crate contains no I/O, no locking and no logging. Time and signature
//! verification come in through the [`Clock`] and [`SignatureVerifier`]
//! capabilities so callers decide where they come from.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable ledger entry, identified by its content hash
//! - [`PendingBlock`] - A block-in-progress that has not been finalized yet
//! - [`Chain`] - The ordered, append-only sequence of committed blocks
//! - [`OwnershipChallenge`] - Issues and checks time-boxed signing challenges
//! - [`Payload`] - Tagged block content: the genesis marker or a star [`Claim`]
//!
//! ## Canonicalization
//!
//! Block hashes are Blake3 over deterministic CBOR. See [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod chain;
pub mod challenge;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod types;

pub use block::{Block, PendingBlock, BLOCK_VERSION, MAX_PAYLOAD_BYTES};
pub use canonical::canonical_block_bytes;
pub use chain::{validate_blocks, Chain};
pub use challenge::{OwnershipChallenge, DEFAULT_CHALLENGE_WINDOW_SECS, PROTOCOL_TAG};
pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Ed25519Verifier, Keypair, SignatureVerifier};
pub use error::{ChainError, ClaimError, ClockError, CoreError, ValidationError};
pub use payload::{Claim, Payload, StarRecord, StarRules};
pub use types::BlockHash;
