//! Common type aliases and protocol constants used across cryptographic components.

/// Standard byte array length used for hashes and keys (32 bytes).
pub const STANDARD_ARRAY_LENGTH: usize = 32;
/// Fixed-size 32-byte array (hashes, seeds, private and public keys).
pub type StdByteArray = [u8; STANDARD_ARRAY_LENGTH];

/// Length of an ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;
pub type SignatureBytes = [u8; SIGNATURE_LENGTH];

/// Type byte prepended to an ed25519 public key in its tagged form.
pub const ED25519_KEY_TAG: u8 = 0xED;
/// Length of a tagged public key (`tag || key`).
pub const TAGGED_PUBLIC_KEY_LENGTH: usize = STANDARD_ARRAY_LENGTH + 1;
pub type TaggedPublicKey = [u8; TAGGED_PUBLIC_KEY_LENGTH];

/// AEAD nonce length shared by the AES-GCM and ChaCha20-Poly1305 ciphers.
pub const NONCE_LENGTH: usize = 12;
/// AEAD authentication tag length.
pub const TAG_LENGTH: usize = 16;
