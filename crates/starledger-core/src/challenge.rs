//! Ownership challenge: a time-boxed, identity-bound message the claimant
//! signs out-of-band before a star claim is admitted.
//!
//! Messages look like `<identity>:<unix seconds>:<tag>`. Nothing is stored
//! between issuing and checking a challenge; validity is re-derived from the
//! timestamp embedded in the message every time a claim is submitted.

use crate::block::PendingBlock;
use crate::crypto::SignatureVerifier;
use crate::error::ClaimError;
use crate::payload::{Claim, StarRecord, StarRules};

/// How long a challenge stays valid after issue, in seconds.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 300;

/// Protocol tag closing every challenge message.
pub const PROTOCOL_TAG: &str = "starRegistry";

/// Separator between message segments.
pub const MESSAGE_DELIMITER: char = ':';

/// Issues and checks ownership challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipChallenge {
    window_secs: u64,
    tag: String,
    rules: StarRules,
}

impl Default for OwnershipChallenge {
    fn default() -> Self {
        Self::new(DEFAULT_CHALLENGE_WINDOW_SECS, PROTOCOL_TAG)
    }
}

impl OwnershipChallenge {
    /// Create a challenge issuer with the given window and tag.
    pub fn new(window_secs: u64, tag: impl Into<String>) -> Self {
        Self {
            window_secs,
            tag: tag.into(),
            rules: StarRules::default(),
        }
    }

    /// Replace the star admission rules.
    pub fn with_rules(mut self, rules: StarRules) -> Self {
        self.rules = rules;
        self
    }

    /// The validity window in seconds.
    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// The protocol tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Build the message `identity` must sign.
    pub fn make_message(&self, identity: &str, now: u64) -> String {
        format!(
            "{identity}{d}{now}{d}{tag}",
            d = MESSAGE_DELIMITER,
            tag = self.tag
        )
    }

    /// Split a message into its identity and timestamp segments.
    ///
    /// The tag and timestamp are the last two segments; everything before
    /// them is the identity, which may itself contain the delimiter.
    pub fn parse_message<'m>(&self, message: &'m str) -> Result<(&'m str, u64), ClaimError> {
        let mut parts = message.rsplitn(3, MESSAGE_DELIMITER);
        let (Some(tag), Some(timestamp), Some(identity)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ClaimError::MalformedMessage);
        };

        if identity.is_empty()
            || tag != self.tag
            || timestamp.is_empty()
            || !timestamp.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ClaimError::MalformedMessage);
        }
        let timestamp = timestamp
            .parse::<u64>()
            .map_err(|_| ClaimError::MalformedMessage)?;
        Ok((identity, timestamp))
    }

    /// Check a signed challenge without building anything.
    ///
    /// Order of checks: message shape, identity binding, expiry, signature.
    /// A timestamp from the future is accepted; only elapsed time is bounded.
    pub fn verify(
        &self,
        identity: &str,
        message: &str,
        signature: &str,
        now: u64,
        verifier: &dyn SignatureVerifier,
    ) -> Result<(), ClaimError> {
        let (bound_identity, issued_at) = self.parse_message(message)?;
        if bound_identity != identity {
            return Err(ClaimError::IdentityMismatch);
        }

        let issued_at = i64::try_from(issued_at).map_err(|_| ClaimError::MalformedMessage)?;
        let elapsed = i64::try_from(now).unwrap_or(i64::MAX).saturating_sub(issued_at);
        if elapsed > i64::try_from(self.window_secs).unwrap_or(i64::MAX) {
            return Err(ClaimError::Expired {
                elapsed,
                window: self.window_secs,
            });
        }

        if !verifier.verify(message, identity, signature) {
            return Err(ClaimError::InvalidSignature);
        }
        Ok(())
    }

    /// Check a signed challenge and the star, then build the block that
    /// records the claim. The caller hands it to the chain.
    pub fn submit(
        &self,
        identity: &str,
        message: &str,
        signature: &str,
        star: StarRecord,
        now: u64,
        verifier: &dyn SignatureVerifier,
    ) -> Result<PendingBlock, ClaimError> {
        self.verify(identity, message, signature, now, verifier)?;
        star.check(&self.rules)?;

        Ok(PendingBlock::claim(Claim {
            owner: identity.to_owned(),
            star,
        })?)
    }
}
