//! Stateless key management: seeds, ed25519 key pairs, addresses,
//! message and transaction signatures, and data encryption.
//!
//! Every operation is a pure function of its inputs apart from drawing
//! entropy, and [`api::KeyManager`] groups them behind one call boundary.
pub mod address;
pub mod api;
pub mod cipher;
pub mod config;
pub mod error;
pub mod keys;
pub mod signature;
pub mod transaction;

pub use address::{AccountId, Address, format_address};
pub use api::{GeneratedAccount, KeyManager};
pub use config::{IdentityOptions, KeyManagerConfig};
pub use error::{KeyError, KeyResult};
pub use keys::{Identity, KeyPair, PrivateKey, PublicKey, Seed, derive_keypair, generate_identity, generate_seed};
pub use signature::{Signature, sign, verify};
