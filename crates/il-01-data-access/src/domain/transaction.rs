//! # Transaction
//!
//! A signed, optionally encrypted ledger entry.
//!
//! ## Persisted Shape
//!
//! ```json
//! { "data": {..}, "signature": { "method": "ecdsa", "value": "0x.." } }
//! { "encryptedData": "..", "encryptionMethod": "ecies-aes256-gcm",
//!   "keys": { "0xaddr": ".." }, "hash": "0x..", "signature": {..} }
//! ```
//!
//! Absent fields are omitted. A transaction is never mutated once built; its
//! identity is [`Transaction::content_hash`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_crypto::hashing::{canonical_keccak256, normalize_keccak256_hash, Hash};
use shared_crypto::{CryptoError, Secp256k1KeyPair, Secp256k1Signature};
use shared_types::{Signature, SignatureMethod, SignatureParameters, Timestamp};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::errors::SigningError;

/// Unsigned body of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionContent {
    /// Clear payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Hex of `nonce || ciphertext` of the payload under the channel key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<String>,

    /// Set on the first transaction of an encrypted channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,

    /// Channel key wrapped for each recipient, keyed by identity value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<BTreeMap<String, String>>,

    /// Hash of the clear payload (encrypted transactions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl TransactionContent {
    /// Content carrying a clear payload.
    pub fn clear(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted_data.is_some()
    }

    /// Keccak-256 of the canonical content, the message that gets signed.
    pub fn signing_hash(&self) -> Result<Hash, CryptoError> {
        canonical_keccak256(self)
    }
}

/// A signed transaction as stored inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(flatten)]
    pub content: TransactionContent,
    pub signature: Signature,
}

impl Transaction {
    /// Sign `content` with the given parameters.
    ///
    /// # Errors
    ///
    /// `SigningError::InvalidPrivateKey` if the key material does not parse.
    pub fn create(
        content: TransactionContent,
        signature_params: &SignatureParameters,
    ) -> Result<Self, SigningError> {
        let signature = match signature_params.method {
            SignatureMethod::Ecdsa => {
                let keypair = Secp256k1KeyPair::from_hex(&signature_params.private_key)
                    .map_err(|_| SigningError::InvalidPrivateKey)?;
                let prehash = content
                    .signing_hash()
                    .map_err(|e| SigningError::Serialization(e.to_string()))?;
                let sig = keypair
                    .sign_prehash(&prehash)
                    .map_err(|e| SigningError::Failed(e.to_string()))?;
                Signature::new(SignatureMethod::Ecdsa, sig.to_hex())
            }
        };

        Ok(Self { content, signature })
    }

    /// Build from already-signed parts (no verification).
    pub fn from_parts(content: TransactionContent, signature: Signature) -> Self {
        Self { content, signature }
    }

    /// `0x`-prefixed Keccak-256 of the canonical serialized transaction.
    ///
    /// Every block auto-registers this hash as a topic of the transaction.
    pub fn content_hash(&self) -> Result<String, CryptoError> {
        normalize_keccak256_hash(self)
    }

    /// Address of the key that produced the signature.
    pub fn recover_signer(&self) -> Result<String, CryptoError> {
        match self.signature.method {
            SignatureMethod::Ecdsa => {
                let sig = Secp256k1Signature::from_hex(&self.signature.value)?;
                sig.recover_address(&self.content.signing_hash()?)
            }
        }
    }
}

/// A transaction together with the time its block was appended to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedTransaction {
    pub transaction: Arc<Transaction>,
    pub timestamp: Timestamp,
}
