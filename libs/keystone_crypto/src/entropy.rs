//! Access to the operating system's secure random source.
//!
//! Every random byte used by this workspace (seeds, nonces, ephemeral
//! exchange keys) is read through [`fill`], so an unreadable entropy pool
//! surfaces as [`CryptoError::EntropyUnavailable`] instead of a panic.

use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Retries applied after the first failed read when no budget is given.
pub const DEFAULT_ENTROPY_RETRIES: u8 = 3;

/// Fills `buffer` from the OS CSPRNG.
///
/// # Arguments
///
/// * `buffer` - The destination, overwritten entirely on success.
/// * `retries` - How many additional reads to attempt after a failure.
///
/// # Returns
///
/// * `Ok(())` once the buffer holds fresh randomness.
/// * `Err(CryptoError::EntropyUnavailable)` once every attempt failed.
pub fn fill(buffer: &mut [u8], retries: u8) -> CryptoResult<()> {
    fill_from(&mut OsRng, buffer, retries)
}

/// [`fill`] reading from `rng`; at most `retries + 1` reads are made.
pub fn fill_from(rng: &mut impl RngCore, buffer: &mut [u8], retries: u8) -> CryptoResult<()> {
    let mut last_error = String::new();
    for attempt in 0..=retries {
        match rng.try_fill_bytes(buffer) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!("Entropy read {} of {} failed: {}", attempt + 1, retries as u16 + 1, e);
                last_error = e.to_string();
            }
        }
    }
    Err(CryptoError::EntropyUnavailable(last_error))
}

/// Returns `N` random bytes using the default retry budget.
pub fn random_array<const N: usize>() -> CryptoResult<[u8; N]> {
    let mut bytes = [0u8; N];
    fill(&mut bytes, DEFAULT_ENTROPY_RETRIES)?;
    Ok(bytes)
}

/// Like [`random_array`], for secret material that must be wiped after use.
pub fn random_secret<const N: usize>(retries: u8) -> CryptoResult<Zeroizing<[u8; N]>> {
    let mut bytes = Zeroizing::new([0u8; N]);
    fill(&mut bytes[..], retries)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    /// Fails its first `failures` reads, then yields `0xA5` bytes.
    struct FlakyRng {
        failures: usize,
        attempts: usize,
    }

    impl FlakyRng {
        fn new(failures: usize) -> Self {
            FlakyRng { failures, attempts: 0 }
        }
    }

    impl RngCore for FlakyRng {
        fn next_u32(&mut self) -> u32 {
            0xA5A5_A5A5
        }

        fn next_u64(&mut self) -> u64 {
            0xA5A5_A5A5_A5A5_A5A5
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xA5);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.attempts += 1;
            if self.attempts <= self.failures {
                let code = NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap();
                return Err(rand_core::Error::from(code));
            }
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_recovers_within_retry_budget() {
        let mut rng = FlakyRng::new(2);
        let mut buffer = [0u8; 8];
        fill_from(&mut rng, &mut buffer, 2).unwrap();
        assert_eq!(rng.attempts, 3);
        assert_eq!(buffer, [0xA5; 8]);
    }

    #[test]
    fn test_exhausted_retries_are_reported() {
        let mut rng = FlakyRng::new(usize::MAX);
        let mut buffer = [0u8; 8];
        let result = fill_from(&mut rng, &mut buffer, 3);
        assert!(matches!(result, Err(CryptoError::EntropyUnavailable(_))));
        assert_eq!(rng.attempts, 4);

        let mut rng = FlakyRng::new(1);
        assert!(matches!(fill_from(&mut rng, &mut buffer, 0), Err(CryptoError::EntropyUnavailable(_))));
        assert_eq!(rng.attempts, 1);
    }

    #[test]
    fn test_fill_overwrites_buffer() {
        let mut buffer = [0u8; 64];
        fill(&mut buffer, 0).unwrap();
        // 64 zero bytes from a CSPRNG is not a realistic outcome
        assert!(buffer.iter().any(|b| *b != 0));
    }

    #[test]
    fn test_random_arrays_differ() {
        let a = random_array::<32>().unwrap();
        let b = random_array::<32>().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_secret_length() {
        let secret = random_secret::<16>(DEFAULT_ENTROPY_RETRIES).unwrap();
        assert_eq!(secret.len(), 16);
    }

    #[test]
    fn test_empty_buffer() {
        let mut buffer = [0u8; 0];
        assert!(fill(&mut buffer, 0).is_ok());
    }
}
