//! Cryptographic primitives used by the Keystone key manager.
//!
//! This crate provides small, focused building blocks:
//! - Access to the OS entropy source with bounded retries
//! - Hashing traits and a SHA3-256 default hasher
//! - Signing/verification (ed25519) abstractions and defaults
//! - AES-GCM symmetric encryption
//! - Sealed-box public-key encryption to ed25519 identities
//! - Fixed-size byte array types and protocol constants
//!
//! Apart from reading system entropy, none of the public APIs in this crate
//! perform I/O, and none of them keep state between calls.

/// Secure random bytes from the operating system.
pub mod entropy;
/// The error type shared by all primitives.
pub mod error;
/// Reusable hashing traits and a default SHA3-256 hasher.
pub mod hashing;
/// Signature traits and default ed25519 signer/verifier.
pub mod signing;
/// AES-GCM encryption under a shared key.
pub mod symmetric;
/// Common type aliases and constants used by this crate.
pub mod types;

pub mod encryption;

pub use error::{CryptoError, CryptoResult};
