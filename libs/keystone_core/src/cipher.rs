//! Symmetric and public-key encryption of caller data.
//!
//! Thin instrumented layer over `keystone_crypto::{symmetric, encryption}`;
//! the wire layouts live there.
use keystone_crypto::{encryption, symmetric};
use tracing::instrument;

use crate::error::KeyResult;

pub use keystone_crypto::encryption::{MAX_ASYM_PLAINTEXT_LEN, MIN_ASYM_CIPHERTEXT_LENGTH};
pub use keystone_crypto::symmetric::{AES_128_KEY_LENGTH, AES_256_KEY_LENGTH, MIN_SYMMETRIC_CIPHERTEXT_LENGTH};

/// AES-GCM encryption under a 16 or 32 byte key.
#[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
pub fn encrypt_symmetric(key: &[u8], plaintext: &[u8]) -> KeyResult<Vec<u8>> {
    let ciphertext = symmetric::encrypt_symmetric(key, plaintext).inspect_err(|e| {
        tracing::warn!("Symmetric encryption refused: {}", e);
    })?;
    tracing::debug!("Encrypted {} bytes", plaintext.len());
    Ok(ciphertext)
}

/// Reverses [`encrypt_symmetric`]; any altered byte is `AuthenticationFailed`.
#[instrument(skip_all, fields(ciphertext_len = ciphertext.len()))]
pub fn decrypt_symmetric(key: &[u8], ciphertext: &[u8]) -> KeyResult<Vec<u8>> {
    let plaintext = symmetric::decrypt_symmetric(key, ciphertext).inspect_err(|e| {
        tracing::warn!("Symmetric decryption failed: {}", e);
    })?;
    Ok(plaintext)
}

/// Seals `plaintext` to the holder of `public_key`.
pub fn encrypt_asym(public_key: &[u8], plaintext: &[u8]) -> KeyResult<Vec<u8>> {
    encrypt_asym_bounded(public_key, plaintext, MAX_ASYM_PLAINTEXT_LEN)
}

/// [`encrypt_asym`] refusing plaintexts longer than `max_plaintext`.
#[instrument(skip_all, fields(plaintext_len = plaintext.len(), max_plaintext = max_plaintext))]
pub fn encrypt_asym_bounded(public_key: &[u8], plaintext: &[u8], max_plaintext: usize) -> KeyResult<Vec<u8>> {
    let ciphertext = encryption::encrypt_asym_bounded(public_key, plaintext, max_plaintext).inspect_err(|e| {
        tracing::warn!("Asymmetric encryption refused: {}", e);
    })?;
    tracing::debug!("Sealed {} bytes", plaintext.len());
    Ok(ciphertext)
}

/// Opens a sealed box with the recipient's private key.
#[instrument(skip_all, fields(ciphertext_len = ciphertext.len()))]
pub fn decrypt_asym(private_key: &[u8], ciphertext: &[u8]) -> KeyResult<Vec<u8>> {
    let plaintext = encryption::decrypt_asym(private_key, ciphertext).inspect_err(|e| {
        tracing::warn!("Asymmetric decryption failed: {}", e);
    })?;
    Ok(plaintext)
}
