use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::{
    entropy,
    error::{CryptoError, CryptoResult},
    types::{ED25519_KEY_TAG, SIGNATURE_LENGTH, STANDARD_ARRAY_LENGTH, SignatureBytes, StdByteArray, TAGGED_PUBLIC_KEY_LENGTH, TaggedPublicKey},
};


/// A trait for an object that can be signed and verified.
pub trait Signable<const S: usize>{
    /// The exact bytes covered by the signature, including any domain prefix.
    fn get_signing_bytes(&self) -> impl AsRef<[u8]>;
}

/// A trait for signing and verifying signatures.
///
/// # Generics
///
/// * `K` - The size of the private key in bytes.
/// * `P` - The size of the public key in bytes.
/// * `S` - The size of the signature in bytes.
pub trait SigFunction<const K: usize, const P: usize, const S: usize>: Sized{
    /// Signs the given data with the private key held by this function.
    ///
    /// # Arguments
    ///
    /// * `data` - The data to be signed.
    ///
    /// # Returns
    ///
    /// * `[u8; S]` containing the signature.
    fn sign(&self, data: &impl Signable<S>) -> [u8; S];

    /// Retreive the byte representation of the signing function
    /// This often will be a private key
    ///
    /// # Returns
    ///
    /// [u8; _] containing the byte representation of the signing function,
    /// wiped when dropped
    fn to_bytes(&self) -> Zeroizing<[u8; K]>;

    /// Get the function that will verify the signature
    ///
    /// # Returns
    ///
    /// * An object that implements the `SigVerFunction` trait.
    fn get_verifying_function(&self) -> impl SigVerFunction<P, S>;

    /// Builds a signing function around fresh OS entropy.
    fn generate_random() -> CryptoResult<Self>;
}

/// A trait for verifying signatures.
///
/// # Generics
///
/// * `K` - The size of the public key in bytes.
/// * `S` - The size of the signature in bytes.
pub trait SigVerFunction<const K: usize, const S: usize>: Sized{
    /// Verifies the given signature using the provided public key.
    ///
    /// # Arguments
    ///
    /// * `signature` - The signature to be verified.
    /// * `target` - The signed object.
    ///
    /// # Returns
    ///
    /// * `true` if the signature is valid, `false` otherwise.
    fn verify(&self, signature: &[u8; S], target: &impl Signable<S>) -> bool;

    fn to_bytes(&self) -> [u8; K];

    fn from_bytes(bytes: &[u8; K]) -> CryptoResult<Self>;
}

/// Raw bytes signed without any domain prefix.
pub struct PlainMessage<'a>(pub &'a [u8]);

impl Signable<SIGNATURE_LENGTH> for PlainMessage<'_> {
    fn get_signing_bytes(&self) -> impl AsRef<[u8]> {
        self.0
    }
}

/// Default signer is the ed25519 signing function
#[derive(Clone)]
pub struct DefaultSigner{
    private_key: SigningKey
}

/// Default verifier is the ed25519 verifying function
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultVerifier{
    public_key: VerifyingKey
}

impl DefaultVerifier{
    /// Parses a raw 32-byte ed25519 public key.
    pub fn new(public_key: StdByteArray) -> CryptoResult<Self>{
        let public_key = VerifyingKey::from_bytes(&public_key)
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(DefaultVerifier{ public_key })
    }

    /// Parses either the raw 32-byte or the tagged 33-byte form.
    pub fn from_slice(public_key: &[u8]) -> CryptoResult<Self>{
        DefaultVerifier::new(public_key_from_slice(public_key)?)
    }

    /// The 33-byte `0xED || key` rendering.
    pub fn to_tagged_bytes(&self) -> TaggedPublicKey{
        tag_public_key(&self.public_key.to_bytes())
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey{
        &self.public_key
    }
}

impl DefaultSigner{
    /// Borrows the key bytes so no unwiped copy is left with the caller.
    pub fn new(private_key: &StdByteArray) -> Self{
        DefaultSigner{
            private_key: SigningKey::from_bytes(private_key)
        }
    }

    /// Parses a 32-byte private key, rejecting any other length.
    pub fn from_slice(private_key: &[u8]) -> CryptoResult<Self>{
        let bytes: &StdByteArray = private_key.try_into().map_err(|_| {
            CryptoError::InvalidKeyLength { expected: "32", actual: private_key.len() }
        })?;
        Ok(DefaultSigner::new(bytes))
    }

    /// The ed25519 verifying key, without the trait indirection.
    pub fn verifier(&self) -> DefaultVerifier{
        DefaultVerifier{ public_key: self.private_key.verifying_key() }
    }

    /// Bytes of the X25519 scalar matching this ed25519 key, used to open sealed boxes.
    pub(crate) fn to_scalar_bytes(&self) -> Zeroizing<StdByteArray>{
        Zeroizing::new(self.private_key.to_scalar_bytes())
    }
}

impl SigFunction<32, 32, 64> for DefaultSigner{
    fn sign(&self, data: &impl Signable<64>) -> [u8; 64]{
        self.private_key.sign(data.get_signing_bytes().as_ref()).to_bytes()
    }

    fn to_bytes(&self) -> Zeroizing<StdByteArray>{
        Zeroizing::new(self.private_key.to_bytes())
    }

    fn get_verifying_function(&self) -> impl SigVerFunction<32, 64>{
        self.verifier()
    }

    fn generate_random() -> CryptoResult<Self> {
        let secret = entropy::random_secret::<STANDARD_ARRAY_LENGTH>(entropy::DEFAULT_ENTROPY_RETRIES)?;
        Ok(DefaultSigner::new(&secret))
    }
}

impl SigVerFunction<32, 64> for DefaultVerifier{
    fn verify(&self, signature: &[u8; 64], target: &impl Signable<64>) -> bool{
        let signature = ed25519::Signature::from_bytes(signature);

        self.public_key.verify_strict(target.get_signing_bytes().as_ref(), &signature).is_ok()
    }

    fn to_bytes(&self) -> StdByteArray{
        self.public_key.to_bytes()
    }

    fn from_bytes(bytes: &StdByteArray) -> CryptoResult<Self>{
        DefaultVerifier::new(*bytes)
    }
}

/// Prepends the ed25519 type byte to a raw public key.
pub fn tag_public_key(public_key: &StdByteArray) -> TaggedPublicKey {
    let mut tagged = [0u8; TAGGED_PUBLIC_KEY_LENGTH];
    tagged[0] = ED25519_KEY_TAG;
    tagged[1..].copy_from_slice(public_key);
    tagged
}

/// Accepts a raw (32) or tagged (33) public key and returns the raw bytes.
///
/// Only the length and the tag byte are checked here; curve validity is
/// checked when the key is parsed by [`DefaultVerifier::new`].
pub fn public_key_from_slice(public_key: &[u8]) -> CryptoResult<StdByteArray> {
    match public_key.len() {
        STANDARD_ARRAY_LENGTH => {
            let mut raw = [0u8; STANDARD_ARRAY_LENGTH];
            raw.copy_from_slice(public_key);
            Ok(raw)
        }
        TAGGED_PUBLIC_KEY_LENGTH if public_key[0] == ED25519_KEY_TAG => {
            let mut raw = [0u8; STANDARD_ARRAY_LENGTH];
            raw.copy_from_slice(&public_key[1..]);
            Ok(raw)
        }
        TAGGED_PUBLIC_KEY_LENGTH => Err(CryptoError::InvalidPublicKey),
        actual => Err(CryptoError::InvalidPublicKeyLength { actual }),
    }
}

/// Signs `target` with a private key given as bytes.
pub fn sign_with_key(private_key: &[u8], target: &impl Signable<SIGNATURE_LENGTH>) -> CryptoResult<SignatureBytes> {
    let signer = DefaultSigner::from_slice(private_key)?;
    Ok(signer.sign(target))
}

/// Verifies `signature` over `target` for a public key given as bytes.
///
/// Any malformed input (key length, key encoding, signature length) is a
/// plain `false`, indistinguishable from a wrong key.
pub fn verify_with_key(public_key: &[u8], target: &impl Signable<SIGNATURE_LENGTH>, signature: &[u8]) -> bool {
    let Ok(signature) = <&SignatureBytes>::try_from(signature) else {
        return false;
    };
    match DefaultVerifier::from_slice(public_key) {
        Ok(verifier) => verifier.verify(signature, target),
        Err(_) => false,
    }
}
