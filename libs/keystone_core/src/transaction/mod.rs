//! Signing of JSON ledger transactions.
//!
//! Transactions are signed over a canonical rendering of their JSON, behind
//! a prefix that differs between single-signer and multi-signer use so a
//! signature made for one scheme is never valid in the other.
pub mod canonical;
pub mod signing;

pub use canonical::{CanonicalTransaction, SigningMode};
pub use signing::{
    MULTI_SIGN_PREFIX, SignedTransaction, TX_HASH_PREFIX, TX_SIGN_PREFIX, TransactionHash, sign_multi_transaction,
    sign_transaction, sign_transaction_with_hash, transaction_hash, verify_multi_transaction, verify_transaction,
};
