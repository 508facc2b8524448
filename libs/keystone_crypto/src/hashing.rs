//! Hashing traits and a default SHA3-256 implementation.
//!
//! The `Hashable` trait abstracts how a type contributes bytes to a hash
//! function. The `HashFunction` trait exposes a minimal update/finalize API
//! so that key derivation, account identifiers and transaction hashes all
//! share one digest.

use sha3::{Digest, Sha3_256};

use crate::{error::{CryptoError, CryptoResult}, types::StdByteArray};


/// A trait for objects that can be hashed using a hash function.
///
/// Implementors should call `hasher.update(...)` for each field to include
/// and then return `hasher.digest()`.
pub trait Hashable {
    /// Computes the hash of the object using the provided hash function.
    ///
    /// # Arguments
    ///
    /// * `hasher` - A mutable instance of a type implementing the `HashFunction` trait.
    ///
    /// # Returns
    ///
    /// * `Ok(StdByteArray)` containing the hash of the object.
    /// * `Err(CryptoError::EmptyDigest)` if nothing was fed to the hasher.
    fn hash(&self, hasher: &mut impl HashFunction) -> CryptoResult<StdByteArray>;
}

/// A trait for hash functions that support updating with data and producing a digest.
pub trait HashFunction {
    /// Updates the hash function with the given data.
    fn update(&mut self, data: impl AsRef<[u8]>);

    /// Finalizes the hash computation, resets the hasher and returns the digest.
    ///
    /// # Returns
    ///
    /// * `Ok(StdByteArray)` containing the hash digest.
    /// * `Err(CryptoError::EmptyDigest)` if no data was added before finalizing.
    fn digest(&mut self) -> CryptoResult<StdByteArray>;
}

/// A struct implementing the SHA3-256 hash function.
///
/// This wrapper tracks whether any data was provided before finalizing. Calling
/// `digest` without prior `update` returns `CryptoError::EmptyDigest`.
#[derive(Clone)]
pub struct DefaultHash {
    /// The internal SHA3-256 hasher.
    hasher: Sha3_256,
    /// The number of parameters added to the hasher.
    n_parameters: usize,
}

impl Default for DefaultHash {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultHash{
    /// Creates a new instance of the SHA3-256 hash function.
    pub fn new() -> Self {
        DefaultHash {
            hasher: Sha3_256::new(),
            n_parameters: 0,
        }
    }
}

impl HashFunction for DefaultHash {
    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.hasher.update(data);
        self.n_parameters += 1;
    }

    fn digest(&mut self) -> CryptoResult<StdByteArray> {
        if self.n_parameters == 0 {
            return Err(CryptoError::EmptyDigest);
        }
        self.n_parameters = 0;
        Ok(self.hasher.finalize_reset().into())
    }
}

/// Hashes `parts` behind a domain tag, so that equal bytes hashed for
/// different purposes never produce the same digest.
pub fn tagged_hash(tag: &[u8], parts: &[&[u8]]) -> CryptoResult<StdByteArray> {
    let mut hasher = DefaultHash::new();
    hasher.update(tag);
    for part in parts {
        hasher.update(part);
    }
    hasher.digest()
}


mod implementations{
    use crate::{error::CryptoResult, hashing::Hashable, types::StdByteArray};

    impl Hashable for [u8] {
        fn hash(&self, hasher: &mut impl super::HashFunction) -> CryptoResult<StdByteArray> {
            hasher.update(self);
            hasher.digest()
        }
    }
}
