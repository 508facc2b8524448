use std::fmt;

use keystone_crypto::{entropy, error::CryptoError};
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::KeyResult;

/// Length of every seed handled by the key manager.
pub const SEED_LENGTH: usize = 32;

/// High-entropy material from which a key pair is derived.
///
/// The bytes are wiped when the seed is dropped and never appear in debug output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    /// Copies a seed out of a caller buffer, which must be exactly `SEED_LENGTH` bytes.
    pub fn from_slice(bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != SEED_LENGTH {
            return Err(CryptoError::InvalidSeedLength { expected: SEED_LENGTH, actual: bytes.len() }.into());
        }
        // copied straight into the wiped type, no intermediate array
        let mut seed = Seed([0u8; SEED_LENGTH]);
        seed.0.copy_from_slice(bytes);
        Ok(seed)
    }

    /// Parses a hex seed; upper and lower case are both accepted.
    pub fn from_hex(encoded: &str) -> KeyResult<Self> {
        let bytes = Zeroizing::new(hex::decode(encoded.trim())?);
        Seed::from_slice(&bytes)
    }

    /// Uppercase hex rendering, the same form `from_hex` reads back.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }
}

impl From<[u8; SEED_LENGTH]> for Seed {
    fn from(bytes: [u8; SEED_LENGTH]) -> Self {
        Seed(bytes)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// Draws a fresh seed from the OS entropy source.
pub fn generate_seed() -> KeyResult<Seed> {
    generate_seed_with_retries(entropy::DEFAULT_ENTROPY_RETRIES)
}

/// [`generate_seed`] with an explicit retry budget for the entropy read.
#[instrument(level = "debug")]
pub fn generate_seed_with_retries(retries: u8) -> KeyResult<Seed> {
    let mut seed = Seed([0u8; SEED_LENGTH]);
    entropy::fill(&mut seed.0, retries)?;
    Ok(seed)
}
