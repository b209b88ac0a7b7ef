//! Error types for the star ledger core.

use thiserror::Error;

use crate::types::BlockHash;

/// Core errors from encoding and hashing blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("unsupported block version: {0}")]
    UnsupportedVersion(u8),

    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// An inconsistency found while validating a chain.
///
/// These are reported, never raised: validation collects every one of them
/// so the whole picture is visible at once. `Display` gives the
/// human-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block at height {height} could not be verified: {source}")]
    Unverifiable { height: u64, source: CoreError },

    #[error("hash mismatch at height {height}")]
    HashMismatch { height: u64 },

    #[error("previous-hash mismatch at height {height}: expected {expected:?}, found {found:?}")]
    PreviousHashMismatch {
        height: u64,
        expected: Option<BlockHash>,
        found: Option<BlockHash>,
    },

    #[error("height mismatch at index {index}: expected {expected}, found {found}")]
    HeightMismatch { index: usize, expected: u64, found: u64 },
}

impl ValidationError {
    /// The block height the problem was reported against.
    pub fn height(&self) -> u64 {
        match self {
            ValidationError::Unverifiable { height, .. }
            | ValidationError::HashMismatch { height }
            | ValidationError::PreviousHashMismatch { height, .. } => *height,
            ValidationError::HeightMismatch { found, .. } => *found,
        }
    }
}

/// Errors from appending to a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The candidate broke an invariant once provisionally appended.
    /// Nothing was committed.
    #[error("append rejected: {}", join_errors(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// The candidate could not be finalized at all.
    #[error("block could not be finalized: {0}")]
    Block(#[from] CoreError),
}

/// Why a star claim was refused.
///
/// None of these are retryable as-is: the claimant must request a fresh
/// challenge and submit again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("malformed challenge message")]
    MalformedMessage,

    #[error("challenge message was issued to a different identity")]
    IdentityMismatch,

    #[error("challenge expired: {elapsed}s elapsed, window is {window}s")]
    Expired { elapsed: i64, window: u64 },

    #[error("signature does not match message and identity")]
    InvalidSignature,

    #[error("invalid star: {0}")]
    InvalidStar(String),

    #[error("claim payload could not be encoded: {0}")]
    Encoding(#[from] CoreError),
}

/// Errors from a [`Clock`](crate::clock::Clock).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("system time is before the unix epoch: {0}")]
    BeforeEpoch(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
