use keystone_crypto::error::CryptoError;
use thiserror::Error;

pub type KeyResult<T> = std::result::Result<T, KeyError>;

/// Failure of a key-management operation.
///
/// A signature that does not verify is not an error; verification always
/// returns a plain `bool`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Cryptography Error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Message starts with a prefix reserved for transaction signing")]
    ReservedMessagePrefix,

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for KeyError {
    fn from(e: hex::FromHexError) -> Self {
        KeyError::InvalidHex(e.to_string())
    }
}
