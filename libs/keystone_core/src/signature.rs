//! Signatures over arbitrary byte messages.
use keystone_crypto::{
    signing::{PlainMessage, sign_with_key, verify_with_key},
    types::SignatureBytes,
};
use tracing::instrument;

use crate::{
    error::{KeyError, KeyResult},
    transaction::{MULTI_SIGN_PREFIX, TX_SIGN_PREFIX},
};

/// A 64-byte ed25519 signature.
pub type Signature = SignatureBytes;

/// Leading bytes owned by transaction signing. A plain message starting
/// with one of them could be replayed as a transaction signature.
const RESERVED_PREFIXES: [&[u8]; 2] = [TX_SIGN_PREFIX.as_slice(), MULTI_SIGN_PREFIX.as_slice()];

fn has_reserved_prefix(message: &[u8]) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| message.starts_with(prefix))
}

/// Signs `message` as-is, with no domain prefix.
///
/// # Returns
///
/// * `Ok(Signature)` for a 32-byte private key.
/// * `Err(KeyError::ReservedMessagePrefix)` if `message` starts with `STX\0` or `SMT\0`.
/// * `Err(CryptoError::InvalidKeyLength)` for any other private key length.
#[instrument(skip_all, fields(message_len = message.len()))]
pub fn sign(private_key: &[u8], message: &[u8]) -> KeyResult<Signature> {
    if has_reserved_prefix(message) {
        tracing::warn!("Refused to sign message carrying a transaction prefix");
        return Err(KeyError::ReservedMessagePrefix);
    }
    let signature = sign_with_key(private_key, &PlainMessage(message)).inspect_err(|e| {
        tracing::warn!("Refused to sign message: {}", e);
    })?;
    Ok(signature)
}

/// Checks `signature` over `message` for `public_key`.
///
/// Malformed keys or signatures, a different signer and an altered
/// message all give `false`; nothing here returns an error. Messages with a
/// transaction prefix never verify here.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    if has_reserved_prefix(message) {
        return false;
    }
    verify_with_key(public_key, &PlainMessage(message), signature)
}
