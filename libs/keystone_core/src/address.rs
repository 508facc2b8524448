//! Address renderings of a public key.
//!
//! The encoding is a frozen protocol: an account identifier is the first
//! 20 bytes of `SHA3-256(0xED || public_key)`, and the public key is shown
//! in its tagged 33-byte form. Changing either would orphan every address
//! ever derived.
use std::fmt;

use keystone_crypto::{
    hashing::{DefaultHash, Hashable},
    types::TaggedPublicKey,
};
use tracing::instrument;

use crate::{error::{KeyError, KeyResult}, keys::PublicKey};

/// Length of an account identifier.
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Compact binary identifier of an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    pub fn from_public_key(public_key: &PublicKey) -> KeyResult<Self> {
        let digest = public_key.tagged().as_slice().hash(&mut DefaultHash::new())?;
        let mut id = [0u8; ACCOUNT_ID_LENGTH];
        id.copy_from_slice(&digest[..ACCOUNT_ID_LENGTH]);
        Ok(AccountId(id))
    }

    pub fn from_hex(encoded: &str) -> KeyResult<Self> {
        let bytes = hex::decode(encoded.trim())?;
        let id = bytes.as_slice().try_into().map_err(|_| {
            KeyError::InvalidHex(format!("expected {ACCOUNT_ID_LENGTH} bytes, got {}", bytes.len()))
        })?;
        Ok(AccountId(id))
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

/// The three renderings of one public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    account_id: AccountId,
    public_key: TaggedPublicKey,
    public_key_hex: String,
}

impl Address {
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// The tagged public key, `0xED || key`.
    pub fn public_key(&self) -> &TaggedPublicKey {
        &self.public_key
    }

    /// Uppercase hex of [`Address::public_key`].
    pub fn public_key_hex(&self) -> &str {
        &self.public_key_hex
    }
}

/// Formats a raw (32) or tagged (33) ed25519 public key as an [`Address`].
///
/// # Returns
///
/// * `Ok(Address)` for a well-formed key.
/// * `Err(CryptoError::InvalidPublicKeyLength)` for any other length.
/// * `Err(CryptoError::InvalidPublicKey)` for a wrong tag or a non-curve point.
#[instrument(skip_all)]
pub fn format_address(public_key: &[u8]) -> KeyResult<Address> {
    let public_key = PublicKey::from_slice(public_key).inspect_err(|e| {
        tracing::warn!("Rejected public key for address formatting: {}", e);
    })?;
    let account_id = AccountId::from_public_key(&public_key)?;
    Ok(Address {
        account_id,
        public_key: public_key.tagged(),
        public_key_hex: public_key.to_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{derive_keypair, generate_identity};
    use keystone_crypto::error::CryptoError;

    fn seed_one() -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed[31] = 1;
        seed
    }

    #[test]
    fn test_known_address_vector() {
        let keypair = derive_keypair(&seed_one()).unwrap();
        let address = keypair.address().unwrap();
        assert_eq!(
            address.account_id().as_bytes(),
            &[
                0xfe, 0x55, 0xf1, 0x45, 0xe0, 0x84, 0x24, 0x1d, 0x6a, 0x22,
                0x8a, 0x11, 0x05, 0xd4, 0xd1, 0xc1, 0xd4, 0xde, 0xd0, 0x66,
            ]
        );
        assert_eq!(address.account_id().to_string(), "FE55F145E084241D6A228A1105D4D1C1D4DED066");
        assert_eq!(address.public_key()[0], 0xED);
        assert_eq!(&address.public_key()[1..], keypair.public_key().as_bytes());
        assert_eq!(
            address.public_key_hex(),
            "EDAB24B8F2F3A19BB91F360DA0E356864790BDC2C61589D49796CF385FC1F0C23B"
        );
    }

    #[test]
    fn test_format_is_stable() {
        let public_key = generate_identity().unwrap().keypair().public_key();
        let first = format_address(public_key.as_bytes()).unwrap();
        let second = format_address(public_key.as_bytes()).unwrap();
        assert_eq!(first, second);
        // raw and tagged input produce the same address
        assert_eq!(first, format_address(&public_key.tagged()).unwrap());
    }

    #[test]
    fn test_distinct_keys_distinct_accounts() {
        let a = generate_identity().unwrap().keypair().address().unwrap();
        let b = generate_identity().unwrap().keypair().address().unwrap();
        assert_ne!(a.account_id(), b.account_id());
    }

    #[test]
    fn test_malformed_public_keys() {
        assert_eq!(
            format_address(&[0u8; 31]),
            Err(KeyError::Crypto(CryptoError::InvalidPublicKeyLength { actual: 31 }))
        );
        assert_eq!(
            format_address(&[]),
            Err(KeyError::Crypto(CryptoError::InvalidPublicKeyLength { actual: 0 }))
        );
        let mut wrong_tag = derive_keypair(&seed_one()).unwrap().public_key().tagged();
        wrong_tag[0] = 0x03;
        assert_eq!(format_address(&wrong_tag), Err(KeyError::Crypto(CryptoError::InvalidPublicKey)));
    }

    #[test]
    fn test_account_id_hex_round_trip() {
        let address = derive_keypair(&seed_one()).unwrap().address().unwrap();
        let id = address.account_id();
        assert_eq!(&AccountId::from_hex(&id.to_hex()).unwrap(), id);
        assert_eq!(&AccountId::from_hex(&id.to_hex().to_lowercase()).unwrap(), id);
        assert!(matches!(AccountId::from_hex("FE55"), Err(KeyError::InvalidHex(_))));
    }
}
