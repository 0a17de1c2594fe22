//! # Transactions Parser
//!
//! Decodes one persisted transaction given what is already known about its
//! channel.
//!
//! | Transaction | Channel `Unknown` | Channel `Clear` | Channel `Encrypted` |
//! |-------------|-------------------|-----------------|---------------------|
//! | `data` | clear | clear | error |
//! | `encryptedData` | unwrap key, decrypt | error | decrypt with known key |
//! | neither | error | error | error |

use il_01_data_access::Transaction;
use shared_crypto::symmetric::{self, SecretKey};
use shared_types::{ChannelKey, ChannelKeyMethod, ChannelType, Identity, CHANNEL_ENCRYPTION_METHOD};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::entities::{ParseResult, ParsedTransaction};
use super::errors::ParseError;
use crate::ports::DecryptionProvider;

#[derive(Clone, Default)]
pub struct TransactionsParser {
    decryption_provider: Option<Arc<dyn DecryptionProvider>>,
}

impl TransactionsParser {
    pub fn new(decryption_provider: Option<Arc<dyn DecryptionProvider>>) -> Self {
        Self {
            decryption_provider,
        }
    }

    /// Decode `transaction` in a channel of type `channel_type`.
    ///
    /// `channel_key` must be the key carried forward from the channel's first
    /// transaction when the channel is known to be encrypted.
    pub async fn parse_persisted_transaction(
        &self,
        transaction: &Arc<Transaction>,
        channel_type: ChannelType,
        channel_key: Option<&ChannelKey>,
    ) -> Result<ParseResult, ParseError> {
        let content = &transaction.content;

        if let Some(data) = &content.data {
            if channel_type == ChannelType::Encrypted {
                return Err(ParseError::ClearInEncryptedChannel);
            }
            if content.encrypted_data.is_some()
                || content.encryption_method.is_some()
                || content.keys.is_some()
                || content.hash.is_some()
            {
                return Err(ParseError::ClearWithEncryptionProperties);
            }
            return Ok(ParseResult {
                transaction: ParsedTransaction::Clear {
                    transaction: Arc::clone(transaction),
                    data: data.clone(),
                },
                channel_key: None,
                encryption_method: None,
            });
        }

        let Some(encrypted_data) = &content.encrypted_data else {
            return Err(ParseError::MissingData);
        };
        if channel_type == ChannelType::Clear {
            return Err(ParseError::EncryptedInClearChannel);
        }
        let Some(declared_hash) = &content.hash else {
            return Err(ParseError::MissingHash);
        };

        let (key, derived_key, encryption_method) = match channel_key {
            Some(known) => {
                if content.keys.is_some() || content.encryption_method.is_some() {
                    return Err(ParseError::ChannelKeyPropertiesAlreadyGiven);
                }
                (known.clone(), None, None)
            }
            None => {
                let (Some(keys), Some(method)) = (&content.keys, &content.encryption_method) else {
                    return Err(ParseError::MissingChannelKeyProperties);
                };
                if method != CHANNEL_ENCRYPTION_METHOD {
                    return Err(ParseError::UnsupportedEncryptionMethod(method.clone()));
                }
                let derived = self.decrypt_channel_key(keys).await?;
                (derived.clone(), Some(derived), Some(method.clone()))
            }
        };

        let sealed = hex::decode(encrypted_data.trim_start_matches("0x"))
            .map_err(|e| ParseError::DataDecryption(e.to_string()))?;
        let secret = SecretKey::from_bytes(*key.as_bytes());
        let decrypted = symmetric::decrypt(&secret, &sealed)
            .map_err(|e| ParseError::DataDecryption(e.to_string()))?;

        Ok(ParseResult {
            transaction: ParsedTransaction::Encrypted {
                transaction: Arc::clone(transaction),
                decrypted,
                declared_hash: declared_hash.clone(),
            },
            channel_key: derived_key,
            encryption_method,
        })
    }

    /// Unwrap the channel key through the first recipient the provider holds.
    async fn decrypt_channel_key(
        &self,
        keys: &BTreeMap<String, String>,
    ) -> Result<ChannelKey, ParseError> {
        let provider = self
            .decryption_provider
            .as_ref()
            .ok_or(ParseError::NoDecryptionProvider)?;

        for (address, wrapped) in keys {
            let identity = Identity::ethereum_address(address);
            if !provider.is_identity_registered(&identity).await {
                continue;
            }
            let wrapped = hex::decode(wrapped.trim_start_matches("0x"))
                .map_err(|e| ParseError::ChannelKeyDecryption(e.to_string()))?;
            let raw = provider
                .decrypt(&wrapped, &identity)
                .await
                .map_err(|e| ParseError::ChannelKeyDecryption(e.to_string()))?;
            return ChannelKey::from_slice(ChannelKeyMethod::Aes256Gcm, &raw)
                .map_err(|e| ParseError::ChannelKeyDecryption(e.to_string()));
        }

        Err(ParseError::ChannelKeyDecryption(
            "no registered identity among the recipients".to_string(),
        ))
    }
}
