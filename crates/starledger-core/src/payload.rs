//! Block payloads: the genesis marker and star ownership claims.
//!
//! Payloads are stored in blocks as CBOR bytes. Decoding is explicit and
//! fallible: anything that does not decode to a known variant is treated as
//! carrying no ownership data.

use serde::{Deserialize, Serialize};

use crate::error::{ClaimError, CoreError};

/// Default upper bound on the decoded story length, in bytes.
pub const DEFAULT_MAX_STORY_BYTES: usize = 500;

/// Default upper bound on the decoded story length, in words.
pub const DEFAULT_MAX_STORY_WORDS: usize = 250;

/// The content of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Sentinel content of the first block.
    Genesis,
    /// A star registered to an owner.
    Claim(Claim),
}

impl Payload {
    /// Encode to CBOR bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from CBOR bytes, `None` if the bytes are not a payload.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        ciborium::from_reader(bytes).ok()
    }

    /// The claim carried by this payload, if any.
    pub fn into_claim(self) -> Option<Claim> {
        match self {
            Payload::Claim(claim) => Some(claim),
            Payload::Genesis => None,
        }
    }
}

/// An ownership claim: `owner` registered `star`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Identity of the claimant.
    pub owner: String,
    /// The star being registered.
    pub star: StarRecord,
}

/// Coordinates and story of a registered star.
///
/// The story is kept hex-encoded so arbitrary text survives any transport
/// the ledger is exposed over; [`StarRecord::story_text`] decodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Right ascension, e.g. `16h 29m 1.0s`.
    pub ra: String,
    /// Declination, e.g. `-26° 29' 24.9`.
    pub dec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,
    /// Hex-encoded UTF-8 story.
    pub story: String,
}

impl StarRecord {
    /// Create a record from coordinates and a plain-text story.
    pub fn new(ra: impl Into<String>, dec: impl Into<String>, story: &str) -> Self {
        Self {
            ra: ra.into(),
            dec: dec.into(),
            magnitude: None,
            constellation: None,
            story: hex::encode(story.as_bytes()),
        }
    }

    /// Set the magnitude.
    pub fn with_magnitude(mut self, magnitude: impl Into<String>) -> Self {
        self.magnitude = Some(magnitude.into());
        self
    }

    /// Set the constellation.
    pub fn with_constellation(mut self, constellation: impl Into<String>) -> Self {
        self.constellation = Some(constellation.into());
        self
    }

    /// The decoded story, `None` if the stored story is not hex-encoded UTF-8.
    pub fn story_text(&self) -> Option<String> {
        let bytes = hex::decode(&self.story).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Check the record against the admission rules.
    pub fn check(&self, rules: &StarRules) -> Result<(), ClaimError> {
        if self.ra.trim().is_empty() {
            return Err(ClaimError::InvalidStar("right ascension is required".into()));
        }
        if self.dec.trim().is_empty() {
            return Err(ClaimError::InvalidStar("declination is required".into()));
        }

        let story = self
            .story_text()
            .ok_or_else(|| ClaimError::InvalidStar("story is not hex-encoded utf-8".into()))?;
        if story.len() > rules.max_story_bytes {
            return Err(ClaimError::InvalidStar(format!(
                "story is {} bytes, limit is {}",
                story.len(),
                rules.max_story_bytes
            )));
        }
        let words = story.split_whitespace().count();
        if words > rules.max_story_words {
            return Err(ClaimError::InvalidStar(format!(
                "story is {} words, limit is {}",
                words, rules.max_story_words
            )));
        }
        Ok(())
    }
}

/// Limits a star record must respect to be admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRules {
    pub max_story_bytes: usize,
    pub max_story_words: usize,
}

impl Default for StarRules {
    fn default() -> Self {
        Self {
            max_story_bytes: DEFAULT_MAX_STORY_BYTES,
            max_story_words: DEFAULT_MAX_STORY_WORDS,
        }
    }
}
