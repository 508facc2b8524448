//! Canonical byte form of a JSON transaction.
//!
//! A transaction is canonicalized by:
//! 1. parsing it as a JSON object,
//! 2. dropping the fields that carry signatures or derived hashes,
//! 3. setting `SigningPubKey` to the signer's tagged key in hex (single
//!    signer) or to the empty string (multi-signer),
//! 4. writing it back compactly with keys sorted at every level.
//!
//! Two payloads with the same logical content therefore produce the same
//! bytes regardless of key order or whitespace. Numbers are re-rendered
//! by `serde_json`, so `1.0` and `1` remain distinct values.
use serde_json::{Map, Value};

use crate::{error::{KeyError, KeyResult}, keys::PublicKey, signature::Signature};

pub const SIGNING_PUB_KEY_FIELD: &str = "SigningPubKey";
pub const TXN_SIGNATURE_FIELD: &str = "TxnSignature";
pub const SIGNERS_FIELD: &str = "Signers";
pub const HASH_FIELD: &str = "hash";

/// Fields never covered by a signature.
const EXCLUDED_FIELDS: [&str; 3] = [TXN_SIGNATURE_FIELD, SIGNERS_FIELD, HASH_FIELD];

/// Which signing scheme the transaction is being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// One signer; its key is embedded in the payload.
    Single,
    /// One of several signers; the embedded key is left empty.
    Multi,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTransaction {
    fields: Map<String, Value>,
}

impl CanonicalTransaction {
    /// Parses `payload` and applies the canonical field rules for `mode`.
    ///
    /// # Returns
    ///
    /// * `Err(KeyError::MalformedTransaction)` if the payload is not a UTF-8 JSON object.
    pub fn new(payload: &[u8], mode: SigningMode, signer: &PublicKey) -> KeyResult<Self> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| KeyError::MalformedTransaction(e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(KeyError::MalformedTransaction("transaction must be a JSON object".to_string()));
        };

        for field in EXCLUDED_FIELDS {
            fields.remove(field);
        }
        let signing_pub_key = match mode {
            SigningMode::Single => signer.to_hex(),
            SigningMode::Multi => String::new(),
        };
        fields.insert(SIGNING_PUB_KEY_FIELD.to_string(), Value::String(signing_pub_key));

        Ok(CanonicalTransaction { fields })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The canonical bytes that are hashed and signed.
    pub fn to_bytes(&self) -> KeyResult<Vec<u8>> {
        encode(self.fields.clone())
    }

    /// Canonical bytes with `TxnSignature` attached, ready for submission.
    pub fn to_signed_bytes(&self, signature: &Signature) -> KeyResult<Vec<u8>> {
        let mut fields = self.fields.clone();
        fields.insert(TXN_SIGNATURE_FIELD.to_string(), Value::String(hex::encode_upper(signature)));
        encode(fields)
    }
}

fn encode(fields: Map<String, Value>) -> KeyResult<Vec<u8>> {
    serde_json::to_vec(&sorted(Value::Object(fields)))
        .map_err(|e| KeyError::MalformedTransaction(e.to_string()))
}

/// Rebuilds every object with its keys in byte order.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::derive_keypair;

    fn signer() -> PublicKey {
        derive_keypair(&[9u8; 32]).unwrap().public_key()
    }

    fn canonical(payload: &str, mode: SigningMode) -> String {
        let bytes = CanonicalTransaction::new(payload.as_bytes(), mode, &signer()).unwrap().to_bytes().unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_key_order_and_whitespace_ignored() {
        let a = canonical(r#"{"b": 1, "a": {"y": [3, {"d": 1, "c": 2}], "x": "s"}}"#, SigningMode::Single);
        let b = canonical("{\"a\":{\"x\":\"s\",\"y\":[3,{\"c\":2,\"d\":1}]},\n \"b\":1}", SigningMode::Single);
        assert_eq!(a, b);
        assert!(a.starts_with(r#"{"SigningPubKey":"ED"#));
        assert!(a.ends_with(r#""a":{"x":"s","y":[3,{"c":2,"d":1}]},"b":1}"#));
    }

    #[test]
    fn test_signature_fields_dropped() {
        let plain = canonical(r#"{"Amount": "10"}"#, SigningMode::Single);
        let decorated = canonical(
            r#"{"Amount": "10", "TxnSignature": "AB", "hash": "CD", "Signers": []}"#,
            SigningMode::Single,
        );
        assert_eq!(plain, decorated);
    }

    #[test]
    fn test_signing_pub_key_per_mode() {
        let single = CanonicalTransaction::new(br#"{"SigningPubKey": "00"}"#, SigningMode::Single, &signer()).unwrap();
        assert_eq!(single.get(SIGNING_PUB_KEY_FIELD), Some(&Value::String(signer().to_hex())));

        let multi = CanonicalTransaction::new(br#"{"SigningPubKey": "00"}"#, SigningMode::Multi, &signer()).unwrap();
        assert_eq!(multi.get(SIGNING_PUB_KEY_FIELD), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_non_object_payloads_rejected() {
        let payloads: [&[u8]; 6] = [b"[1, 2]", b"\"tx\"", b"42", b"null", b"{not json", b"\xff\xfe"];
        for payload in payloads {
            assert!(matches!(
                CanonicalTransaction::new(payload, SigningMode::Single, &signer()),
                Err(KeyError::MalformedTransaction(_))
            ));
        }
    }

    #[test]
    fn test_signed_bytes_carry_signature() {
        let tx = CanonicalTransaction::new(br#"{"Fee": "10"}"#, SigningMode::Single, &signer()).unwrap();
        let signed: Value = serde_json::from_slice(&tx.to_signed_bytes(&[0xAB; 64]).unwrap()).unwrap();
        assert_eq!(signed[TXN_SIGNATURE_FIELD], Value::String("AB".repeat(64)));
        assert_eq!(signed["Fee"], Value::String("10".to_string()));
    }
}
