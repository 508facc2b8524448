//! Runtime options for the key manager and for identity generation.
//!
//! Both structures are read from JSON, with every field optional:
//!
//! ```json
//! { "entropy_retries": 3, "max_asym_plaintext": 65536 }
//! { "algorithm": "ed25519", "secret": "00...01" }
//! ```
use keystone_crypto::{encryption::MAX_ASYM_PLAINTEXT_LEN, entropy::DEFAULT_ENTROPY_RETRIES};
use serde::{Deserialize, Serialize};

use crate::error::{KeyError, KeyResult};

/// Upper bound on entropy retries; past this a broken source is not coming back.
pub const MAX_ENTROPY_RETRIES: u8 = 16;
/// The only signature scheme this key manager implements.
pub const ED25519_ALGORITHM: &str = "ed25519";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyManagerConfig {
    /// Extra attempts after a failed entropy read.
    pub entropy_retries: u8,
    /// Ceiling on asymmetric plaintexts, at most `MAX_ASYM_PLAINTEXT_LEN`.
    pub max_asym_plaintext: usize,
}

impl Default for KeyManagerConfig {
    fn default() -> Self {
        KeyManagerConfig {
            entropy_retries: DEFAULT_ENTROPY_RETRIES,
            max_asym_plaintext: MAX_ASYM_PLAINTEXT_LEN,
        }
    }
}

impl KeyManagerConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(options: &str) -> KeyResult<Self> {
        let config: KeyManagerConfig = serde_json::from_str(options)
            .map_err(|e| KeyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KeyResult<()> {
        if self.entropy_retries > MAX_ENTROPY_RETRIES {
            return Err(KeyError::InvalidConfig(format!(
                "entropy_retries must be at most {MAX_ENTROPY_RETRIES}, got {}",
                self.entropy_retries
            )));
        }
        if self.max_asym_plaintext == 0 || self.max_asym_plaintext > MAX_ASYM_PLAINTEXT_LEN {
            return Err(KeyError::InvalidConfig(format!(
                "max_asym_plaintext must be within 1..={MAX_ASYM_PLAINTEXT_LEN}, got {}",
                self.max_asym_plaintext
            )));
        }
        Ok(())
    }
}

/// Options accepted when creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityOptions {
    /// Key algorithm, `"ed25519"` unless stated.
    pub algorithm: String,
    /// Hex-encoded seed to derive from instead of fresh entropy.
    pub secret: Option<String>,
}

impl Default for IdentityOptions {
    fn default() -> Self {
        IdentityOptions {
            algorithm: ED25519_ALGORITHM.to_string(),
            secret: None,
        }
    }
}

impl IdentityOptions {
    pub fn from_json(options: &str) -> KeyResult<Self> {
        let options: IdentityOptions = serde_json::from_str(options)
            .map_err(|e| KeyError::InvalidConfig(e.to_string()))?;
        if !options.algorithm.eq_ignore_ascii_case(ED25519_ALGORITHM) {
            return Err(KeyError::UnsupportedAlgorithm(options.algorithm));
        }
        Ok(options)
    }
}
