//! Ledger configuration.

use serde::{Deserialize, Serialize};
use starledger_core::challenge::MESSAGE_DELIMITER;
use starledger_core::payload::{DEFAULT_MAX_STORY_BYTES, DEFAULT_MAX_STORY_WORDS};
use starledger_core::{OwnershipChallenge, StarRules, DEFAULT_CHALLENGE_WINDOW_SECS, PROTOCOL_TAG};

use crate::error::{LedgerError, Result};

/// Configuration for the Ledger.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use starledger::LedgerConfig;
///
/// let config = LedgerConfig::from_json(r#"{ "challenge_window_secs": 60 }"#).unwrap();
/// assert_eq!(config.challenge_window_secs, 60);
/// assert_eq!(config.protocol_tag, "starRegistry");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Seconds a challenge message stays valid after issue.
    pub challenge_window_secs: u64,
    /// Tag closing every challenge message.
    pub protocol_tag: String,
    /// Maximum decoded story length in bytes.
    pub max_story_bytes: usize,
    /// Maximum decoded story length in words.
    pub max_story_words: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
            protocol_tag: PROTOCOL_TAG.to_owned(),
            max_story_bytes: DEFAULT_MAX_STORY_BYTES,
            max_story_words: DEFAULT_MAX_STORY_WORDS,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce parseable challenges.
    pub fn validate(&self) -> Result<()> {
        if self.protocol_tag.is_empty() {
            return Err(LedgerError::Config("protocol_tag must not be empty".into()));
        }
        if self.protocol_tag.contains(MESSAGE_DELIMITER) {
            return Err(LedgerError::Config(format!(
                "protocol_tag must not contain '{MESSAGE_DELIMITER}'"
            )));
        }
        Ok(())
    }

    /// Build the challenge issuer this configuration describes.
    pub fn challenge(&self) -> OwnershipChallenge {
        OwnershipChallenge::new(self.challenge_window_secs, self.protocol_tag.clone()).with_rules(
            StarRules {
                max_story_bytes: self.max_story_bytes,
                max_story_words: self.max_story_words,
            },
        )
    }
}
