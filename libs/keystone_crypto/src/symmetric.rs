//! AES-GCM encryption under a caller-supplied shared key.
//!
//! # Ciphertext layout
//!
//! | Field      | Size (bytes) |
//! |------------|--------------|
//! | Nonce      | 12           |
//! | Ciphertext | len(message) |
//! | GCM tag    | 16           |
//!
//! The nonce is drawn fresh for every call, so the output is self-contained
//! and encrypting the same message twice yields different bytes.

use aes_gcm::{aead::Aead, Aes128Gcm, Aes256Gcm, KeyInit, Nonce};

use crate::{
    entropy,
    error::{CryptoError, CryptoResult},
    types::{NONCE_LENGTH, TAG_LENGTH},
};

/// AES-128 key length.
pub const AES_128_KEY_LENGTH: usize = 16;
/// AES-256 key length.
pub const AES_256_KEY_LENGTH: usize = 32;
/// Shortest well-formed ciphertext (empty message).
pub const MIN_SYMMETRIC_CIPHERTEXT_LENGTH: usize = NONCE_LENGTH + TAG_LENGTH;

enum AesCipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl AesCipher {
    fn from_key(key: &[u8]) -> CryptoResult<Self> {
        let invalid = || CryptoError::InvalidKeyLength { expected: "16 or 32", actual: key.len() };
        match key.len() {
            AES_128_KEY_LENGTH => Aes128Gcm::new_from_slice(key).map(AesCipher::Aes128).map_err(|_| invalid()),
            AES_256_KEY_LENGTH => Aes256Gcm::new_from_slice(key).map(AesCipher::Aes256).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    fn encrypt(&self, nonce: &[u8; NONCE_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            AesCipher::Aes128(c) => c.encrypt(nonce, plaintext),
            AesCipher::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn decrypt(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            AesCipher::Aes128(c) => c.decrypt(nonce, ciphertext),
            AesCipher::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}

/// Largest plaintext GCM accepts under one nonce: 2^32 - 2 blocks of 16 bytes.
pub const GCM_MAX_PLAINTEXT_LEN: u64 = (1 << 36) - 32;

/// [`GCM_MAX_PLAINTEXT_LEN`] saturated to the platform's `usize`.
fn gcm_max_plaintext_len() -> usize {
    usize::try_from(GCM_MAX_PLAINTEXT_LEN).unwrap_or(usize::MAX)
}

/// Encrypts `plaintext` under a 16 or 32 byte AES key.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` holding `nonce || ciphertext || tag`.
/// * `Err(CryptoError::InvalidKeyLength)` for any other key size.
/// * `Err(CryptoError::EntropyUnavailable)` if no nonce could be drawn.
pub fn encrypt_symmetric(key: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = AesCipher::from_key(key)?;
    let nonce = entropy::random_array::<NONCE_LENGTH>()?;

    // only fails for messages beyond the GCM block counter
    let ciphertext_with_tag = cipher.encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::PlaintextTooLarge { actual: plaintext.len(), maximum: gcm_max_plaintext_len() })?;

    let mut full_payload = Vec::with_capacity(NONCE_LENGTH + ciphertext_with_tag.len());
    full_payload.extend_from_slice(&nonce);
    full_payload.extend_from_slice(&ciphertext_with_tag);
    Ok(full_payload)
}

/// Decrypts a payload produced by [`encrypt_symmetric`].
///
/// # Returns
///
/// * `Ok(Vec<u8>)` with the original plaintext.
/// * `Err(CryptoError::InvalidKeyLength)` for a key that is not 16 or 32 bytes.
/// * `Err(CryptoError::MalformedCiphertext)` if the payload cannot hold a nonce and tag.
/// * `Err(CryptoError::AuthenticationFailed)` for a wrong key or any altered byte.
pub fn decrypt_symmetric(key: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = AesCipher::from_key(key)?;
    if ciphertext.len() < MIN_SYMMETRIC_CIPHERTEXT_LENGTH {
        return Err(CryptoError::MalformedCiphertext {
            actual: ciphertext.len(),
            minimum: MIN_SYMMETRIC_CIPHERTEXT_LENGTH,
        });
    }

    let (nonce, ciphertext_with_tag) = ciphertext.split_at(NONCE_LENGTH);
    cipher.decrypt(nonce, ciphertext_with_tag)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
