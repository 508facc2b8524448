//! The call boundary of the key-management core.
//!
//! [`KeyManager`] exposes one method per exported operation. Every fallible
//! method returns [`KeyResult`]; verification methods return a plain `bool`
//! and never fail.
use serde_json::json;
use tracing::instrument;
use zeroize::Zeroizing;

use crate::{
    address::{self, Address},
    cipher,
    config::{IdentityOptions, KeyManagerConfig},
    error::KeyResult,
    keys::{Identity, PrivateKey, PublicKey, Seed, derive_keypair, generate_identity_with_retries, generate_seed_with_retries},
    signature::{self, Signature},
    transaction::{self, SignedTransaction},
};

/// Stateless facade over the key-management operations.
///
/// Holds nothing but its configuration, so it can be cloned freely and
/// shared across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyManager {
    config: KeyManagerConfig,
}

/// A freshly derived account, including its secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAccount {
    pub address: Address,
    pub private_key: PrivateKey,
    pub seed: Seed,
}

impl GeneratedAccount {
    /// JSON document with `address`, `publicKey`, `publicKeyHex`, `privateKey`
    /// and `seed`, all uppercase hex. `publicKey` is the untagged key.
    pub fn to_json(&self) -> Zeroizing<String> {
        let document = json!({
            "address": self.address.account_id().to_hex(),
            "publicKey": hex::encode_upper(&self.address.public_key()[1..]),
            "publicKeyHex": self.address.public_key_hex(),
            "privateKey": self.private_key.to_hex(),
            "seed": self.seed.to_hex(),
        });
        Zeroizing::new(document.to_string())
    }
}

impl KeyManager {
    pub fn new(config: KeyManagerConfig) -> KeyResult<Self> {
        config.validate()?;
        Ok(KeyManager { config })
    }

    pub fn from_json(options: &str) -> KeyResult<Self> {
        Ok(KeyManager { config: KeyManagerConfig::from_json(options)? })
    }

    pub fn config(&self) -> &KeyManagerConfig {
        &self.config
    }

    pub fn sign_common_data(&self, private_key: &[u8], message: &[u8]) -> KeyResult<Signature> {
        signature::sign(private_key, message)
    }

    pub fn verify_common_data(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        signature::verify(public_key, message, signature)
    }

    pub fn sign_for_common_transaction(&self, private_key: &[u8], payload: &[u8]) -> KeyResult<Signature> {
        transaction::sign_transaction(private_key, payload)
    }

    /// Signs and also returns the transaction hash and the signed blob.
    pub fn sign_for_common_transaction_ex(&self, private_key: &[u8], payload: &[u8]) -> KeyResult<SignedTransaction> {
        transaction::sign_transaction_with_hash(private_key, payload)
    }

    pub fn sign_for_multisigner_transaction(&self, private_key: &[u8], payload: &[u8]) -> KeyResult<Signature> {
        transaction::sign_multi_transaction(private_key, payload)
    }

    pub fn verify_common_transaction(&self, public_key: &[u8], payload: &[u8], signature: &[u8]) -> bool {
        transaction::verify_transaction(public_key, payload, signature)
    }

    pub fn verify_multisigner_transaction(&self, public_key: &[u8], payload: &[u8], signature: &[u8]) -> bool {
        transaction::verify_multi_transaction(public_key, payload, signature)
    }

    pub fn encrypt_data_aes(&self, key: &[u8], plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        cipher::encrypt_symmetric(key, plaintext)
    }

    pub fn decrypt_data_aes(&self, key: &[u8], ciphertext: &[u8]) -> KeyResult<Vec<u8>> {
        cipher::decrypt_symmetric(key, ciphertext)
    }

    /// Seals `plaintext` to `public_key`, refusing anything above the
    /// configured `max_asym_plaintext`.
    pub fn encrypt_data_asym(&self, public_key: &[u8], plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        cipher::encrypt_asym_bounded(public_key, plaintext, self.config.max_asym_plaintext)
    }

    pub fn decrypt_data_asym(&self, private_key: &[u8], ciphertext: &[u8]) -> KeyResult<Vec<u8>> {
        cipher::decrypt_asym(private_key, ciphertext)
    }

    pub fn format_address(&self, public_key: &[u8]) -> KeyResult<Address> {
        address::format_address(public_key)
    }

    pub fn generate_identity(&self) -> KeyResult<Identity> {
        generate_identity_with_retries(self.config.entropy_retries)
    }

    /// A fresh seed and its public key, for validator setup.
    #[instrument(skip_all)]
    pub fn create_validation_identity(&self) -> KeyResult<(Seed, PublicKey)> {
        let (seed, keypair) = self.generate_identity()?.into_parts();
        tracing::debug!("Created validation identity {:?}", keypair.public_key());
        Ok((seed, keypair.public_key()))
    }

    /// Derives an account from `seed`, or from a freshly generated seed when `None`.
    #[instrument(skip_all, fields(seeded = seed.is_some()))]
    pub fn valid_address(&self, seed: Option<&[u8]>) -> KeyResult<GeneratedAccount> {
        let seed = match seed {
            Some(bytes) => Seed::from_slice(bytes)?,
            None => generate_seed_with_retries(self.config.entropy_retries)?,
        };
        self.account_from_seed(seed)
    }

    /// Creates an account from a JSON options document such as
    /// `{"algorithm": "ed25519", "secret": "<hex seed>"}`.
    #[instrument(skip_all)]
    pub fn generate_account(&self, options: &str) -> KeyResult<GeneratedAccount> {
        let options = IdentityOptions::from_json(options).inspect_err(|e| {
            tracing::warn!("Rejected account options: {}", e);
        })?;
        let seed = match options.secret.as_deref() {
            Some(secret) => Seed::from_hex(secret)?,
            None => generate_seed_with_retries(self.config.entropy_retries)?,
        };
        self.account_from_seed(seed)
    }

    fn account_from_seed(&self, seed: Seed) -> KeyResult<GeneratedAccount> {
        let keypair = derive_keypair(seed.as_bytes())?;
        let address = keypair.address()?;
        tracing::debug!("Generated account {}", address.account_id());
        Ok(GeneratedAccount {
            address,
            private_key: keypair.private_key(),
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;
    use keystone_crypto::error::CryptoError;
    use serde_json::Value;
    use tracing_subscriber::{Registry, filter::LevelFilter, fmt, prelude::*};

    // always setup tracing first
    #[ctor::ctor]
    fn setup() {
        let console_layer = fmt::layer()
            .with_ansi(true)
            .with_level(true)
            .with_filter(LevelFilter::ERROR);

        let _ = Registry::default().with(console_layer).try_init();
    }

    const SEED_ONE_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn seed_one() -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed[31] = 1;
        seed
    }

    #[test]
    fn test_manager_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<KeyManager>();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = KeyManagerConfig { entropy_retries: 3, max_asym_plaintext: 0 };
        assert!(matches!(KeyManager::new(config), Err(KeyError::InvalidConfig(_))));
        assert!(KeyManager::from_json(r#"{"entropy_retries": 200}"#).is_err());
        assert_eq!(KeyManager::from_json("{}").unwrap(), KeyManager::default());
    }

    #[test]
    fn test_valid_address_from_seed() {
        let manager = KeyManager::default();
        let account = manager.valid_address(Some(&seed_one())).unwrap();
        assert_eq!(account.address.account_id().to_hex(), "FE55F145E084241D6A228A1105D4D1C1D4DED066");
        assert_eq!(
            account.private_key.to_hex(),
            "B4347DD41356B569FFBB6BEF7B69F0862441BBF832E4412ADA4FFBE51DF2C7E0"
        );
        assert_eq!(account.seed.to_hex(), SEED_ONE_HEX);

        let document: Value = serde_json::from_str(&account.to_json()).unwrap();
        assert_eq!(document["address"], "FE55F145E084241D6A228A1105D4D1C1D4DED066");
        assert_eq!(document["publicKey"], "AB24B8F2F3A19BB91F360DA0E356864790BDC2C61589D49796CF385FC1F0C23B");
        assert_eq!(
            document["publicKeyHex"],
            "EDAB24B8F2F3A19BB91F360DA0E356864790BDC2C61589D49796CF385FC1F0C23B"
        );
        assert_eq!(document["seed"], SEED_ONE_HEX);
    }

    #[test]
    fn test_valid_address_generates_seed() {
        let manager = KeyManager::default();
        let account = manager.valid_address(None).unwrap();
        let again = manager.valid_address(Some(account.seed.as_bytes())).unwrap();
        assert_eq!(account, again);
        assert!(matches!(
            manager.valid_address(Some(&[1u8; 31])),
            Err(KeyError::Crypto(CryptoError::InvalidSeedLength { actual: 31, .. }))
        ));
    }

    #[test]
    fn test_generate_account_options() {
        let manager = KeyManager::default();
        let options = format!(r#"{{"algorithm": "ed25519", "secret": "{SEED_ONE_HEX}"}}"#);
        let account = manager.generate_account(&options).unwrap();
        assert_eq!(account, manager.valid_address(Some(&seed_one())).unwrap());

        assert!(manager.generate_account("{}").is_ok());
        assert_eq!(
            manager.generate_account(r#"{"algorithm": "sm2"}"#),
            Err(KeyError::UnsupportedAlgorithm("sm2".to_string()))
        );
        assert!(matches!(
            manager.generate_account(r#"{"secret": "xyz"}"#),
            Err(KeyError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_validation_identity_matches_seed() {
        let manager = KeyManager::default();
        let (seed, public_key) = manager.create_validation_identity().unwrap();
        assert_eq!(derive_keypair(seed.as_bytes()).unwrap().public_key(), public_key);
        assert_eq!(
            manager.format_address(public_key.as_bytes()).unwrap(),
            manager.valid_address(Some(seed.as_bytes())).unwrap().address
        );
    }

    #[test]
    fn test_common_data_signing() {
        let manager = KeyManager::default();
        let identity = manager.generate_identity().unwrap();
        let keypair = identity.keypair();
        let signature = manager.sign_common_data(keypair.private_key().as_bytes(), b"data").unwrap();
        assert!(manager.verify_common_data(keypair.public_key().as_bytes(), b"data", &signature));
        assert!(!manager.verify_common_data(keypair.public_key().as_bytes(), b"date", &signature));

        let other = manager.generate_identity().unwrap();
        assert!(!manager.verify_common_data(other.keypair().public_key().as_bytes(), b"data", &signature));
    }

    #[test]
    fn test_transaction_hash_recomputes() {
        let manager = KeyManager::default();
        let keypair = derive_keypair(&seed_one()).unwrap();
        let payload = br#"{"TransactionType":"Payment","Amount":"5","Fee":"1"}"#;
        let signed = manager.sign_for_common_transaction_ex(keypair.private_key().as_bytes(), payload).unwrap();

        let hash = transaction::transaction_hash(keypair.public_key().as_bytes(), payload).unwrap();
        assert_eq!(signed.hash, hash);
        assert_eq!(
            signed.signature,
            manager.sign_for_common_transaction(keypair.private_key().as_bytes(), payload).unwrap()
        );
        assert!(manager.verify_common_transaction(keypair.public_key().as_bytes(), payload, &signed.signature));

        let multi = manager.sign_for_multisigner_transaction(keypair.private_key().as_bytes(), payload).unwrap();
        assert!(manager.verify_multisigner_transaction(keypair.public_key().as_bytes(), payload, &multi));
        assert!(!manager.verify_common_transaction(keypair.public_key().as_bytes(), payload, &multi));
    }

    #[test]
    fn test_aes_through_manager() {
        let manager = KeyManager::default();
        let key = [5u8; 16];
        let ciphertext = manager.encrypt_data_aes(&key, b"ledger snapshot").unwrap();
        assert_eq!(manager.decrypt_data_aes(&key, &ciphertext).unwrap(), b"ledger snapshot");
        assert!(matches!(
            manager.decrypt_data_aes(&key, &ciphertext[..20]),
            Err(KeyError::Crypto(CryptoError::MalformedCiphertext { actual: 20, minimum: 28 }))
        ));
    }

    #[test]
    fn test_asym_respects_configured_ceiling() {
        let manager = KeyManager::from_json(r#"{"max_asym_plaintext": 32}"#).unwrap();
        let keypair = manager.generate_identity().unwrap().keypair().clone();
        let sealed = manager.encrypt_data_asym(keypair.public_key().as_bytes(), &[7u8; 32]).unwrap();
        assert_eq!(manager.decrypt_data_asym(keypair.private_key().as_bytes(), &sealed).unwrap(), vec![7u8; 32]);
        assert_eq!(
            manager.encrypt_data_asym(keypair.public_key().as_bytes(), &[7u8; 33]),
            Err(KeyError::Crypto(CryptoError::PlaintextTooLarge { actual: 33, maximum: 32 }))
        );
    }

    #[test]
    fn test_no_output_on_bad_input() {
        let manager = KeyManager::default();
        assert!(manager.sign_common_data(&[], b"m").is_err());
        assert!(manager.sign_for_common_transaction(&[1u8; 32], b"not json").is_err());
        assert!(manager.encrypt_data_asym(&[1u8; 10], b"m").is_err());
        assert!(manager.format_address(&[0u8; 34]).is_err());
    }

    #[test]
    fn test_common_data_cannot_sign_transactions() {
        let manager = KeyManager::default();
        let keypair = derive_keypair(&seed_one()).unwrap();
        let payload = br#"{"TransactionType":"Payment","Amount":"5","Fee":"1"}"#;
        let canonical = format!(
            r#"{{"Amount":"5","Fee":"1","SigningPubKey":"{}","TransactionType":"Payment"}}"#,
            keypair.public_key().to_hex()
        );
        let mut message = transaction::TX_SIGN_PREFIX.to_vec();
        message.extend_from_slice(canonical.as_bytes());

        assert_eq!(
            manager.sign_common_data(keypair.private_key().as_bytes(), &message),
            Err(KeyError::ReservedMessagePrefix)
        );
        let signature = manager.sign_for_common_transaction(keypair.private_key().as_bytes(), payload).unwrap();
        assert!(manager.verify_common_transaction(keypair.public_key().as_bytes(), payload, &signature));
        assert!(!manager.verify_common_data(keypair.public_key().as_bytes(), &message, &signature));
    }
}
