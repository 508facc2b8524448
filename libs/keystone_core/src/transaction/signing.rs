use keystone_crypto::{
    hashing::tagged_hash,
    signing::{SigFunction, Signable, verify_with_key},
    types::{SIGNATURE_LENGTH, StdByteArray},
};
use tracing::instrument;

use super::canonical::{CanonicalTransaction, SigningMode};
use crate::{
    address::AccountId,
    error::KeyResult,
    keys::{KeyPair, PublicKey},
    signature::Signature,
};

/// Prefix of the bytes signed by a single signer.
pub const TX_SIGN_PREFIX: &[u8; 4] = b"STX\0";
/// Prefix of the bytes signed by one signer of a multi-signed transaction.
pub const MULTI_SIGN_PREFIX: &[u8; 4] = b"SMT\0";
/// Prefix of the bytes hashed into a transaction identifier.
pub const TX_HASH_PREFIX: &[u8; 4] = b"TXN\0";

/// SHA3-256 identifier of a signed transaction.
pub type TransactionHash = StdByteArray;

/// The domain-separated bytes a signer actually commits to.
struct TransactionSigningData(Vec<u8>);

impl TransactionSigningData {
    fn single(canonical: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(TX_SIGN_PREFIX.len() + canonical.len());
        bytes.extend_from_slice(TX_SIGN_PREFIX);
        bytes.extend_from_slice(canonical);
        TransactionSigningData(bytes)
    }

    fn multi(canonical: &[u8], signer: &AccountId) -> Self {
        let signer = signer.as_bytes();
        let mut bytes = Vec::with_capacity(MULTI_SIGN_PREFIX.len() + canonical.len() + signer.len());
        bytes.extend_from_slice(MULTI_SIGN_PREFIX);
        bytes.extend_from_slice(canonical);
        bytes.extend_from_slice(signer);
        TransactionSigningData(bytes)
    }
}

impl Signable<SIGNATURE_LENGTH> for TransactionSigningData {
    fn get_signing_bytes(&self) -> impl AsRef<[u8]> {
        &self.0
    }
}

/// A signature together with the transaction identifier and the
/// submittable signed blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub signature: Signature,
    pub hash: TransactionHash,
    /// Canonical JSON with `TxnSignature` set.
    pub blob: Vec<u8>,
}

impl SignedTransaction {
    pub fn hash_hex(&self) -> String {
        hex::encode_upper(self.hash)
    }

    pub fn signature_hex(&self) -> String {
        hex::encode_upper(self.signature)
    }
}

fn hash_canonical(canonical: &[u8]) -> KeyResult<TransactionHash> {
    Ok(tagged_hash(TX_HASH_PREFIX, &[canonical])?)
}

fn sign_single(keypair: &KeyPair, payload: &[u8]) -> KeyResult<(Signature, CanonicalTransaction, Vec<u8>)> {
    let transaction = CanonicalTransaction::new(payload, SigningMode::Single, &keypair.public_key())?;
    let canonical = transaction.to_bytes()?;
    let signature = keypair.sign(&TransactionSigningData::single(&canonical));
    Ok((signature, transaction, canonical))
}

/// Signs a JSON transaction as its only signer.
///
/// The payload's `SigningPubKey` is replaced by this key's tagged hex, and
/// `TxnSignature`, `Signers` and `hash` are ignored.
///
/// # Returns
///
/// * `Err(KeyError::MalformedTransaction)` if the payload is not a JSON object.
/// * `Err(CryptoError::InvalidKeyLength)` for a private key that is not 32 bytes.
#[instrument(skip_all, fields(payload_len = payload.len()))]
pub fn sign_transaction(private_key: &[u8], payload: &[u8]) -> KeyResult<Signature> {
    let keypair = KeyPair::from_private_key(private_key)?;
    let (signature, _, _) = sign_single(&keypair, payload).inspect_err(|e| {
        tracing::warn!("Refused to sign transaction: {}", e);
    })?;
    Ok(signature)
}

/// [`sign_transaction`], also returning the transaction hash and the signed blob.
#[instrument(skip_all, fields(payload_len = payload.len()))]
pub fn sign_transaction_with_hash(private_key: &[u8], payload: &[u8]) -> KeyResult<SignedTransaction> {
    let keypair = KeyPair::from_private_key(private_key)?;
    let (signature, transaction, canonical) = sign_single(&keypair, payload).inspect_err(|e| {
        tracing::warn!("Refused to sign transaction: {}", e);
    })?;
    let hash = hash_canonical(&canonical)?;
    let blob = transaction.to_signed_bytes(&signature)?;
    tracing::debug!("Signed transaction {}", hex::encode_upper(hash));
    Ok(SignedTransaction { signature, hash, blob })
}

/// Signs a JSON transaction as one of several signers.
///
/// `SigningPubKey` is forced empty and the signer's account id is appended
/// after the canonical bytes, so the signature is bound to this signer and
/// never verifies as a single-signer signature.
#[instrument(skip_all, fields(payload_len = payload.len()))]
pub fn sign_multi_transaction(private_key: &[u8], payload: &[u8]) -> KeyResult<Signature> {
    let keypair = KeyPair::from_private_key(private_key)?;
    let transaction = CanonicalTransaction::new(payload, SigningMode::Multi, &keypair.public_key())
        .inspect_err(|e| tracing::warn!("Refused to multi-sign transaction: {}", e))?;
    let account_id = AccountId::from_public_key(&keypair.public_key())?;
    let canonical = transaction.to_bytes()?;
    Ok(keypair.sign(&TransactionSigningData::multi(&canonical, &account_id)))
}

/// Identifier of the transaction `public_key` would sign for `payload`.
pub fn transaction_hash(public_key: &[u8], payload: &[u8]) -> KeyResult<TransactionHash> {
    let signer = PublicKey::from_slice(public_key)?;
    let canonical = CanonicalTransaction::new(payload, SigningMode::Single, &signer)?.to_bytes()?;
    hash_canonical(&canonical)
}

/// Checks a single-signer transaction signature. Never errors.
pub fn verify_transaction(public_key: &[u8], payload: &[u8], signature: &[u8]) -> bool {
    let Ok(signer) = PublicKey::from_slice(public_key) else {
        return false;
    };
    let Ok(canonical) = CanonicalTransaction::new(payload, SigningMode::Single, &signer).and_then(|tx| tx.to_bytes())
    else {
        return false;
    };
    verify_with_key(signer.as_bytes(), &TransactionSigningData::single(&canonical), signature)
}

/// Checks one signer's signature on a multi-signed transaction. Never errors.
pub fn verify_multi_transaction(public_key: &[u8], payload: &[u8], signature: &[u8]) -> bool {
    let Ok(signer) = PublicKey::from_slice(public_key) else {
        return false;
    };
    let Ok(account_id) = AccountId::from_public_key(&signer) else {
        return false;
    };
    let Ok(canonical) = CanonicalTransaction::new(payload, SigningMode::Multi, &signer).and_then(|tx| tx.to_bytes())
    else {
        return false;
    };
    verify_with_key(signer.as_bytes(), &TransactionSigningData::multi(&canonical, &account_id), signature)
}
