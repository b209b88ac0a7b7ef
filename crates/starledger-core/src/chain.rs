//! Chain: the ordered, append-only sequence of committed blocks.
//!
//! Every block links to its predecessor by hash. [`Chain::append`] is the
//! only admission path, and it commits a block only if the whole chain,
//! extended by that block, still validates.

use std::iter;

use crate::block::{Block, PendingBlock};
use crate::error::{ChainError, ValidationError};
use crate::payload::Claim;
use crate::types::BlockHash;

/// An in-memory chain of blocks, index 0 being genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an empty chain. Call [`Chain::initialize`] to add genesis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an externally supplied sequence of blocks.
    ///
    /// Nothing is checked here; run [`Chain::validate_chain`] to audit it.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Append the genesis block if the chain is empty.
    ///
    /// Returns `true` if genesis was created, `false` if the chain was
    /// already initialized.
    pub fn initialize(&mut self, now: u64) -> Result<bool, ChainError> {
        if !self.blocks.is_empty() {
            return Ok(false);
        }
        self.append(PendingBlock::genesis()?, now)?;
        Ok(true)
    }

    /// Height of the tip, `None` while the chain is empty.
    pub fn height(&self) -> Option<u64> {
        self.blocks.last().map(|block| block.height)
    }

    /// Number of committed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no block has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The most recent block.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// All committed blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Finalize `pending` on top of the current tip and commit it.
    ///
    /// The candidate is validated together with every committed block before
    /// it is pushed, so a rejected append leaves the chain untouched.
    pub fn append(&mut self, pending: PendingBlock, now: u64) -> Result<Block, ChainError> {
        let height = self.blocks.len() as u64;
        let previous_hash = self.tip().map(|tip| tip.hash);
        let candidate = pending.finalize(height, previous_hash, now)?;

        let errors = validate_blocks(self.blocks.iter().chain(iter::once(&candidate)));
        if !errors.is_empty() {
            return Err(ChainError::ValidationFailed(errors));
        }

        self.blocks.push(candidate.clone());
        Ok(candidate)
    }

    /// Check every block and every link, collecting all problems found.
    ///
    /// An empty result means the chain is fully consistent.
    pub fn validate_chain(&self) -> Vec<ValidationError> {
        validate_blocks(self.blocks.iter())
    }

    /// First block with the given hash.
    pub fn get_by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|block| block.hash == *hash)
    }

    /// First block whose height field equals `height`.
    pub fn get_by_height(&self, height: u64) -> Option<&Block> {
        self.blocks.iter().find(|block| block.height == height)
    }

    /// Claims owned by `address`, in chain order.
    pub fn stars_by_owner(&self, address: &str) -> Vec<Claim> {
        self.blocks
            .iter()
            .filter_map(Block::decode_payload)
            .filter(|claim| claim.owner == address)
            .collect()
    }

    /// Blocks holding claims owned by `address`, in chain order.
    pub fn blocks_by_owner(&self, address: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|block| block.owner().as_deref() == Some(address))
            .collect()
    }
}

/// Validate a sequence of blocks as a chain.
///
/// For each block, in order:
/// - its hash is recomputed (`Unverifiable` if that is impossible,
///   `HashMismatch` if it differs from the stored one)
/// - its height must equal its index
/// - its `previous_hash` must equal the preceding block's hash, and be
///   absent on the first block
///
/// Never short-circuits.
pub fn validate_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut previous: Option<&Block> = None;

    for (index, block) in blocks.into_iter().enumerate() {
        match block.validate() {
            Ok(true) => {}
            Ok(false) => errors.push(ValidationError::HashMismatch {
                height: block.height,
            }),
            Err(source) => errors.push(ValidationError::Unverifiable {
                height: block.height,
                source,
            }),
        }

        let expected_height = index as u64;
        if block.height != expected_height {
            errors.push(ValidationError::HeightMismatch {
                index,
                expected: expected_height,
                found: block.height,
            });
        }

        let expected_previous = previous.map(|prev| prev.hash);
        if block.previous_hash != expected_previous {
            errors.push(ValidationError::PreviousHashMismatch {
                height: block.height,
                expected: expected_previous,
                found: block.previous_hash,
            });
        }

        previous = Some(block);
    }

    errors
}
