//! Error types for the Ledger.

use starledger_core::{ChainError, ClaimError, ClockError};
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The claim was refused before reaching the chain.
    #[error("claim rejected: {0}")]
    Claim(#[from] ClaimError),

    /// The chain refused the block.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// The time source failed.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
