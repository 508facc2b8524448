//! ed25519 key pairs and their deterministic derivation from seeds.
use std::fmt;

use keystone_crypto::{
    error::CryptoResult,
    hashing::tagged_hash,
    signing::{DefaultSigner, DefaultVerifier, SigFunction, SigVerFunction, Signable, public_key_from_slice, tag_public_key},
    types::{STANDARD_ARRAY_LENGTH, SignatureBytes, StdByteArray, TaggedPublicKey},
};
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::seed::{Seed, generate_seed_with_retries};
use crate::{address::{Address, format_address}, error::KeyResult};

/// Domain tag for turning a seed into an ed25519 private key.
const SEED_DERIVATION_TAG: &[u8] = b"keystone/seed/ed25519";

/// A 32-byte ed25519 private key, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(StdByteArray);

impl PrivateKey {
    pub fn as_bytes(&self) -> &StdByteArray {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A 32-byte ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(StdByteArray);

impl PublicKey {
    /// Parses a raw (32) or tagged (33) public key and checks it is a curve point.
    pub fn from_slice(bytes: &[u8]) -> KeyResult<Self> {
        let raw = public_key_from_slice(bytes)?;
        DefaultVerifier::new(raw)?;
        Ok(PublicKey(raw))
    }

    pub fn as_bytes(&self) -> &StdByteArray {
        &self.0
    }

    /// The 33-byte `0xED || key` form.
    pub fn tagged(&self) -> TaggedPublicKey {
        tag_public_key(&self.0)
    }

    /// Uppercase hex of the tagged form.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.tagged())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A private key together with its public key.
///
/// The public half is always computed from the private half, never supplied.
#[derive(Clone)]
pub struct KeyPair {
    signer: DefaultSigner,
    public_key: PublicKey,
}

impl KeyPair {
    fn from_signer(signer: DefaultSigner) -> Self {
        let public_key = PublicKey(signer.verifier().to_bytes());
        KeyPair { signer, public_key }
    }

    /// Rebuilds a key pair from a bare 32-byte private key.
    pub fn from_private_key(private_key: &[u8]) -> KeyResult<Self> {
        Ok(KeyPair::from_signer(DefaultSigner::from_slice(private_key)?))
    }

    pub fn private_key(&self) -> PrivateKey {
        PrivateKey(*self.signer.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// All renderings of this key pair's address.
    pub fn address(&self) -> KeyResult<Address> {
        format_address(&self.public_key.tagged())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key && self.private_key() == other.private_key()
    }
}

impl Eq for KeyPair {}

impl SigFunction<32, 32, 64> for KeyPair {
    fn sign(&self, data: &impl Signable<64>) -> SignatureBytes {
        self.signer.sign(data)
    }

    fn to_bytes(&self) -> Zeroizing<StdByteArray> {
        self.signer.to_bytes()
    }

    fn get_verifying_function(&self) -> impl SigVerFunction<32, 64> {
        self.signer.verifier()
    }

    /// A key pair derived from a freshly generated seed.
    fn generate_random() -> CryptoResult<Self> {
        let seed = keystone_crypto::entropy::random_secret::<STANDARD_ARRAY_LENGTH>(
            keystone_crypto::entropy::DEFAULT_ENTROPY_RETRIES,
        )?;
        keypair_from_seed_bytes(&seed)
    }
}

fn keypair_from_seed_bytes(seed: &StdByteArray) -> CryptoResult<KeyPair> {
    let private_key = Zeroizing::new(tagged_hash(SEED_DERIVATION_TAG, &[seed.as_slice()])?);
    Ok(KeyPair::from_signer(DefaultSigner::new(&private_key)))
}

/// Derives the key pair belonging to `seed`.
///
/// The private key is `SHA3-256("keystone/seed/ed25519" || seed)`, so the same
/// seed always yields byte-identical keys.
///
/// # Returns
///
/// * `Ok(KeyPair)` for a 32-byte seed.
/// * `Err(CryptoError::InvalidSeedLength)` for any other length.
#[instrument(skip_all)]
pub fn derive_keypair(seed: &[u8]) -> KeyResult<KeyPair> {
    let seed = Seed::from_slice(seed)?;
    let keypair = keypair_from_seed_bytes(seed.as_bytes())?;
    tracing::debug!("Derived key pair {:?}", keypair.public_key());
    Ok(keypair)
}

/// A freshly generated seed and the key pair derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    seed: Seed,
    keypair: KeyPair,
}

impl Identity {
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    pub fn into_parts(self) -> (Seed, KeyPair) {
        (self.seed, self.keypair)
    }
}

/// Generates a seed and derives its key pair in one step.
pub fn generate_identity() -> KeyResult<Identity> {
    generate_identity_with_retries(keystone_crypto::entropy::DEFAULT_ENTROPY_RETRIES)
}

/// [`generate_identity`] with an explicit retry budget for the entropy read.
pub fn generate_identity_with_retries(retries: u8) -> KeyResult<Identity> {
    let seed = generate_seed_with_retries(retries)?;
    let keypair = derive_keypair(seed.as_bytes())?;
    Ok(Identity { seed, keypair })
}
