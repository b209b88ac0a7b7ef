//! Block: one immutable ledger entry.
//!
//! A block is finalized exactly once: every field is set, then the content
//! hash is taken over all of them. [`PendingBlock`] is consumed by
//! finalization, so the same block-in-progress cannot be finalized twice.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_block_bytes, canonical_fields_bytes};
use crate::crypto::Blake3Hash;
use crate::error::CoreError;
use crate::payload::{Claim, Payload};
use crate::types::BlockHash;

/// The current block schema version.
pub const BLOCK_VERSION: u8 = 0;

/// Maximum encoded payload size a block can be hashed with.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// A finalized block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Schema version (currently 0).
    pub version: u8,

    /// Position in the chain; 0 for genesis.
    pub height: u64,

    /// Unix seconds, assigned at finalization.
    pub timestamp: u64,

    /// Hash of the preceding block (None for genesis).
    pub previous_hash: Option<BlockHash>,

    /// Encoded [`Payload`].
    pub payload: Bytes,

    /// Blake3 over the canonical encoding of every field above.
    pub hash: BlockHash,
}

impl Block {
    /// Build a block from its parts and compute its hash.
    pub fn finalize(
        payload: impl Into<Bytes>,
        height: u64,
        previous_hash: Option<BlockHash>,
        timestamp: u64,
    ) -> Result<Self, CoreError> {
        let payload = payload.into();
        let bytes = canonical_fields_bytes(
            BLOCK_VERSION,
            height,
            timestamp,
            previous_hash.as_ref(),
            &payload,
        )?;

        Ok(Self {
            version: BLOCK_VERSION,
            height,
            timestamp,
            previous_hash,
            payload,
            hash: Blake3Hash::hash(&bytes).into(),
        })
    }

    /// Recompute the content hash from the current field values.
    pub fn compute_hash(&self) -> Result<BlockHash, CoreError> {
        let bytes = canonical_block_bytes(self)?;
        Ok(Blake3Hash::hash(&bytes).into())
    }

    /// Check the stored hash against the current field values.
    ///
    /// `Ok(false)` is a mismatch; `Err` means the hash could not be
    /// recomputed at all.
    pub fn validate(&self) -> Result<bool, CoreError> {
        Ok(self.compute_hash()? == self.hash)
    }

    /// The ownership claim stored in this block.
    ///
    /// `None` for the genesis block and for payloads that do not decode.
    pub fn decode_payload(&self) -> Option<Claim> {
        Payload::decode(&self.payload)?.into_claim()
    }

    /// Decode the full tagged payload.
    pub fn payload(&self) -> Option<Payload> {
        Payload::decode(&self.payload)
    }

    /// Check if this is the first block of a chain.
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash.is_none()
    }

    /// Owner of the claim in this block, if it carries one.
    pub fn owner(&self) -> Option<String> {
        self.decode_payload().map(|claim| claim.owner)
    }
}

/// A block-in-progress: content is fixed, linkage is not assigned yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBlock {
    payload: Bytes,
}

impl PendingBlock {
    /// A block carrying the genesis marker.
    pub fn genesis() -> Result<Self, CoreError> {
        Self::from_payload(&Payload::Genesis)
    }

    /// A block carrying an ownership claim.
    pub fn claim(claim: Claim) -> Result<Self, CoreError> {
        Self::from_payload(&Payload::Claim(claim))
    }

    /// A block carrying the given payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, CoreError> {
        Ok(Self {
            payload: payload.encode()?.into(),
        })
    }

    /// A block carrying raw, already-encoded bytes.
    pub fn from_bytes(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The encoded payload.
    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Assign linkage and timestamp, then hash.
    pub fn finalize(
        self,
        height: u64,
        previous_hash: Option<BlockHash>,
        timestamp: u64,
    ) -> Result<Block, CoreError> {
        Block::finalize(self.payload, height, previous_hash, timestamp)
    }
}
