//! Seeds, key pairs and identities.
pub mod keypair;
pub mod seed;

pub use keypair::{Identity, KeyPair, PrivateKey, PublicKey, derive_keypair, generate_identity, generate_identity_with_retries};
pub use seed::{SEED_LENGTH, Seed, generate_seed, generate_seed_with_retries};
