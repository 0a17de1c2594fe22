//! # Transactions Factory
//!
//! Builds the unsigned content of clear and encrypted transactions.
//!
//! ## Encrypted Channel Layout
//!
//! | Field | First transaction | Later transactions |
//! |-------|-------------------|--------------------|
//! | `encryptedData` | hex(AES-256-GCM(channel key, payload)) | same |
//! | `hash` | parsed hash of payload | same |
//! | `encryptionMethod` | `ecies-aes256-gcm` | absent |
//! | `keys` | recipient address → hex(ECIES(channel key)) | absent |

use il_01_data_access::TransactionContent;
use serde_json::Value;
use shared_crypto::ecdsa::address_from_public_key_hex;
use shared_crypto::symmetric::{self, SecretKey};
use shared_crypto::{canonical_json, ecies, normalize_value_hash};
use shared_types::{
    ChannelKey, ChannelKeyMethod, EncryptionParameters, CHANNEL_ENCRYPTION_METHOD,
};
use std::collections::BTreeMap;

use super::errors::EncryptionError;

pub struct TransactionsFactory;

impl TransactionsFactory {
    pub fn create_clear_transaction(payload: Value) -> TransactionContent {
        TransactionContent::clear(payload)
    }

    /// First transaction of a new encrypted channel.
    ///
    /// Returns the content and the freshly generated channel key.
    pub fn create_encrypted_transaction_in_new_channel(
        payload: &Value,
        recipients: &[EncryptionParameters],
    ) -> Result<(TransactionContent, ChannelKey), EncryptionError> {
        if recipients.is_empty() {
            return Err(EncryptionError::NoRecipients);
        }

        let secret = SecretKey::generate();
        let channel_key = ChannelKey::new(ChannelKeyMethod::Aes256Gcm, *secret.as_bytes());

        let mut keys = BTreeMap::new();
        for recipient in recipients {
            let address = address_from_public_key_hex(&recipient.key)
                .map_err(|_| EncryptionError::InvalidRecipientKey(recipient.key.clone()))?;
            let wrapped = ecies::encrypt(&recipient.key, channel_key.as_bytes())
                .map_err(|e| EncryptionError::Crypto(e.to_string()))?;
            keys.insert(address, hex::encode(wrapped));
        }

        let mut content = Self::create_encrypted_transaction(payload, &channel_key)?;
        content.encryption_method = Some(CHANNEL_ENCRYPTION_METHOD.to_string());
        content.keys = Some(keys);

        Ok((content, channel_key))
    }

    /// Transaction for an existing encrypted channel.
    pub fn create_encrypted_transaction(
        payload: &Value,
        channel_key: &ChannelKey,
    ) -> Result<TransactionContent, EncryptionError> {
        let plaintext =
            canonical_json(payload).map_err(|e| EncryptionError::Serialization(e.to_string()))?;
        let secret = SecretKey::from_bytes(*channel_key.as_bytes());
        let sealed = symmetric::encrypt(&secret, plaintext.as_bytes())
            .map_err(|e| EncryptionError::Crypto(e.to_string()))?;

        Ok(TransactionContent {
            encrypted_data: Some(hex::encode(sealed)),
            hash: Some(normalize_value_hash(payload)),
            ..TransactionContent::default()
        })
    }
}
