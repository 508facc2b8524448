//! Error type shared by every primitive in this crate.
use thiserror::Error;

pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected}, got {actual} bytes")]
    InvalidKeyLength { expected: &'static str, actual: usize },

    #[error("Invalid seed length: expected {expected}, got {actual} bytes")]
    InvalidSeedLength { expected: usize, actual: usize },

    #[error("Invalid public key length: expected 32 or 33 bytes, got {actual}")]
    InvalidPublicKeyLength { actual: usize },

    #[error("Public key is not a usable ed25519 point")]
    InvalidPublicKey,

    #[error("System entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Malformed ciphertext: {actual} bytes, at least {minimum} required")]
    MalformedCiphertext { actual: usize, minimum: usize },

    #[error("Ciphertext authentication failed")]
    AuthenticationFailed,

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Plaintext too large: {actual} bytes, limit is {maximum}")]
    PlaintextTooLarge { actual: usize, maximum: usize },

    #[error("No data has been added to the hasher")]
    EmptyDigest,
}
