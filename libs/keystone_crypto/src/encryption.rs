//! Public-key encryption to an ed25519 identity ("sealed box").
//!
//! The sender generates an ephemeral X25519 secret and performs a key
//! exchange with the Montgomery form of the recipient's ed25519 key. The
//! shared secret is expanded with HKDF-SHA3-256 into a ChaCha20-Poly1305
//! key. The recipient repeats the exchange with the X25519 scalar derived
//! from its ed25519 private key.
//!
//! # Ciphertext layout
//!
//! | Field            | Size (bytes) |
//! |------------------|--------------|
//! | Ephemeral public | 32           |
//! | Nonce            | 12           |
//! | Ciphertext       | len(message) |
//! | Poly1305 tag     | 16           |

use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce, aead::Aead};
use hkdf::Hkdf;
use sha3::Sha3_256;
use x25519_dalek::{PublicKey, SharedSecret, StaticSecret};
use zeroize::Zeroizing;

use crate::{
    entropy,
    error::{CryptoError, CryptoResult},
    signing::{DefaultSigner, DefaultVerifier},
    types::{NONCE_LENGTH, STANDARD_ARRAY_LENGTH, StdByteArray, TAG_LENGTH},
};

/// HKDF info prefix binding derived keys to this scheme and version.
const SEALED_BOX_INFO: &[u8] = b"keystone/sealed-box/v1";

/// Largest plaintext accepted by [`encrypt_asym`] (1 MiB).
pub const MAX_ASYM_PLAINTEXT_LEN: usize = 1 << 20;
/// Shortest well-formed sealed box (empty message).
pub const MIN_ASYM_CIPHERTEXT_LENGTH: usize = STANDARD_ARRAY_LENGTH + NONCE_LENGTH + TAG_LENGTH;

type X25519PublicKey = StdByteArray;

fn derive_cipher(
    shared_secret: SharedSecret,
    ephemeral_public: &X25519PublicKey,
    recipient_public: &X25519PublicKey,
) -> CryptoResult<ChaCha20Poly1305> {
    // an all-zero exchange means a low-order point was supplied
    if !shared_secret.was_contributory() {
        return Err(CryptoError::DecryptionFailed);
    }
    let hk = Hkdf::<Sha3_256>::new(None, shared_secret.as_bytes());

    let mut info = Vec::with_capacity(SEALED_BOX_INFO.len() + 2 * STANDARD_ARRAY_LENGTH);
    info.extend_from_slice(SEALED_BOX_INFO);
    info.extend_from_slice(ephemeral_public);
    info.extend_from_slice(recipient_public);

    let mut key_bytes = Zeroizing::new([0u8; STANDARD_ARRAY_LENGTH]);
    hk.expand(&info, key_bytes.as_mut_slice())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    Ok(ChaCha20Poly1305::new(Key::from_slice(key_bytes.as_slice())))
}

/// Encrypts `plaintext` to the holder of the private key behind `public_key`.
///
/// # Arguments
///
/// * `public_key` - Raw (32) or tagged (33) ed25519 public key of the recipient.
/// * `plaintext` - At most [`MAX_ASYM_PLAINTEXT_LEN`] bytes.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` holding `ephemeral_public || nonce || ciphertext || tag`.
/// * `Err(CryptoError::InvalidPublicKeyLength | InvalidPublicKey)` for an unusable key.
/// * `Err(CryptoError::PlaintextTooLarge)` above the size ceiling.
pub fn encrypt_asym(public_key: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    encrypt_asym_bounded(public_key, plaintext, MAX_ASYM_PLAINTEXT_LEN)
}

/// [`encrypt_asym`] with a caller-chosen plaintext ceiling.
pub fn encrypt_asym_bounded(public_key: &[u8], plaintext: &[u8], max_plaintext: usize) -> CryptoResult<Vec<u8>> {
    if plaintext.len() > max_plaintext {
        return Err(CryptoError::PlaintextTooLarge { actual: plaintext.len(), maximum: max_plaintext });
    }
    let verifier = DefaultVerifier::from_slice(public_key)?;
    let recipient_public = verifier.verifying_key().to_montgomery().to_bytes();

    let ephemeral_bytes = entropy::random_secret::<STANDARD_ARRAY_LENGTH>(entropy::DEFAULT_ENTROPY_RETRIES)?;
    let ephemeral_secret = StaticSecret::from(*ephemeral_bytes);
    let ephemeral_public = PublicKey::from(&ephemeral_secret).to_bytes();

    let shared_secret = ephemeral_secret.diffie_hellman(&PublicKey::from(recipient_public));
    let cipher = derive_cipher(shared_secret, &ephemeral_public, &recipient_public)
        .map_err(|_| CryptoError::InvalidPublicKey)?;

    let nonce = entropy::random_array::<NONCE_LENGTH>()?;
    let ciphertext_with_tag = cipher.encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::PlaintextTooLarge { actual: plaintext.len(), maximum: max_plaintext })?;

    let mut full_payload = Vec::with_capacity(MIN_ASYM_CIPHERTEXT_LENGTH + plaintext.len());
    full_payload.extend_from_slice(&ephemeral_public);
    full_payload.extend_from_slice(&nonce);
    full_payload.extend_from_slice(&ciphertext_with_tag);
    Ok(full_payload)
}

/// Opens a sealed box with the recipient's 32-byte ed25519 private key.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` with the original plaintext.
/// * `Err(CryptoError::InvalidKeyLength)` for a private key that is not 32 bytes.
/// * `Err(CryptoError::MalformedCiphertext)` if the payload is shorter than its fixed header.
/// * `Err(CryptoError::DecryptionFailed)` for a wrong key or a corrupted payload.
pub fn decrypt_asym(private_key: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let signer = DefaultSigner::from_slice(private_key)?;
    if ciphertext.len() < MIN_ASYM_CIPHERTEXT_LENGTH {
        return Err(CryptoError::MalformedCiphertext {
            actual: ciphertext.len(),
            minimum: MIN_ASYM_CIPHERTEXT_LENGTH,
        });
    }

    let (ephemeral_public, rest) = ciphertext.split_at(STANDARD_ARRAY_LENGTH);
    let (nonce, ciphertext_with_tag) = rest.split_at(NONCE_LENGTH);
    let mut ephemeral = [0u8; STANDARD_ARRAY_LENGTH];
    ephemeral.copy_from_slice(ephemeral_public);

    let recipient_secret = StaticSecret::from(*signer.to_scalar_bytes());
    let recipient_public = PublicKey::from(&recipient_secret).to_bytes();
    let shared_secret = recipient_secret.diffie_hellman(&PublicKey::from(ephemeral));
    let cipher = derive_cipher(shared_secret, &ephemeral, &recipient_public)?;

    cipher.decrypt(Nonce::from_slice(nonce), ciphertext_with_tag)
        .map_err(|_| CryptoError::DecryptionFailed)
}
