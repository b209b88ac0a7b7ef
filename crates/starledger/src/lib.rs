//! # Star Ledger
//!
//! An append-only, hash-linked chain of blocks recording star ownership.
//! A star is only admitted after its claimant signs a time-boxed ownership
//! challenge.
//!
//! ## Key Concepts
//!
//! - **Block**: Immutable once committed. Its hash covers every other field.
//! - **Chain**: Append-only. Every append re-validates the whole chain and
//!   commits nothing if any check fails.
//! - **Challenge**: `<identity>:<unix seconds>:starRegistry`, valid for five
//!   minutes, signed out-of-band by the claimant.
//!
//! ## Usage
//!
//! ```rust
//! use starledger::{Keypair, Ledger, StarRecord};
//!
//! let ledger = Ledger::new().unwrap();
//! let keypair = Keypair::generate();
//! let identity = keypair.identity();
//!
//! let message = ledger.request_challenge(&identity).unwrap();
//! let signature = keypair.sign(message.as_bytes()).to_hex();
//!
//! let star = StarRecord::new("16h 29m 1.0s", "-26° 29' 24.9", "Found it!");
//! let block = ledger
//!     .submit_claim(&identity, &message, &signature, star)
//!     .unwrap();
//!
//! assert_eq!(block.height, 1);
//! assert_eq!(ledger.stars_by_owner(&identity).len(), 1);
//! assert!(ledger.validate_chain().is_empty());
//! ```
//!
//! ## Re-exports
//!
//! - `starledger::core` - Core primitives (Block, Chain, OwnershipChallenge, etc.)

pub mod config;
pub mod error;
pub mod ledger;

pub use starledger_core as core;

pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use ledger::Ledger;

pub use starledger_core::{
    Block, BlockHash, ChainError, Claim, ClaimError, Clock, Ed25519Verifier, Keypair, ManualClock,
    Payload, SignatureVerifier, StarRecord, SystemClock, ValidationError,
};
