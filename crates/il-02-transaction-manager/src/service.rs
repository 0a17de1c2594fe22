//! # Transaction Manager Service
//!
//! Channel-level persistence on top of the data-access log.
//!
//! ```text
//! persist_transaction(payload, channel_id, topics, recipients, signer)
//!     │ channel_id == hash(payload)?
//!     ├─ yes → new channel (clear, or encrypted for recipients)
//!     └─ no  → get_channel_type_and_key(history of channel_id)
//!                 → clear tx / encrypted tx under the recovered key
//!     ↓
//! DataAccessApi::persist_transaction(content, signer, [channel_id, topics..])
//! ```

use async_trait::async_trait;
use il_01_data_access::{DataAccessApi, TransactionContent};
use serde_json::Value;
use shared_crypto::normalize_value_hash;
use shared_types::{
    ChannelType, EncryptionParameters, SignatureParameters, CHANNEL_ENCRYPTION_METHOD,
};
use std::sync::Arc;

use crate::domain::{
    ChannelParser, ChannelTransactions, PersistTransactionResult, TransactionManagerError,
    TransactionsFactory, TransactionsParser,
};
use crate::ports::{DecryptionProvider, TransactionManagerApi};

/// Transaction manager over any data-access implementation.
///
/// The data-access layer must be initialized before use.
pub struct TransactionManager<D: DataAccessApi> {
    data_access: Arc<D>,
    channel_parser: ChannelParser,
}

impl<D: DataAccessApi> TransactionManager<D> {
    pub fn new(data_access: Arc<D>, decryption_provider: Option<Arc<dyn DecryptionProvider>>) -> Self {
        Self {
            data_access,
            channel_parser: ChannelParser::new(TransactionsParser::new(decryption_provider)),
        }
    }

    pub fn data_access(&self) -> &Arc<D> {
        &self.data_access
    }

    /// Content to append to the existing channel `channel_id`.
    async fn content_for_existing_channel(
        &self,
        payload: &Value,
        channel_id: &str,
        recipients: &[EncryptionParameters],
    ) -> Result<(TransactionContent, Option<String>), TransactionManagerError> {
        let history = self
            .data_access
            .get_transactions_by_topic(channel_id)
            .await?
            .confirmed_transactions();
        let channel = self
            .channel_parser
            .get_channel_type_and_key(channel_id, &history)
            .await;

        match channel.channel_type {
            ChannelType::Unknown => Err(TransactionManagerError::ChannelNotFound {
                channel_id: channel_id.to_string(),
            }),
            _ if !recipients.is_empty() => Err(TransactionManagerError::StakeholderChangeRejected {
                channel_id: channel_id.to_string(),
            }),
            ChannelType::Clear => Ok((
                TransactionsFactory::create_clear_transaction(payload.clone()),
                None,
            )),
            ChannelType::Encrypted => {
                let key = channel.channel_key.ok_or_else(|| {
                    TransactionManagerError::ChannelKeyUnavailable {
                        channel_id: channel_id.to_string(),
                    }
                })?;
                let content = TransactionsFactory::create_encrypted_transaction(payload, &key)?;
                Ok((content, Some(CHANNEL_ENCRYPTION_METHOD.to_string())))
            }
        }
    }
}

/// Channel ids are parsed hashes: compared and indexed in lower case.
fn normalize_channel_id(channel_id: &str) -> String {
    channel_id.to_ascii_lowercase()
}

#[async_trait]
impl<D: DataAccessApi + 'static> TransactionManagerApi for TransactionManager<D> {
    async fn persist_transaction(
        &self,
        payload: Value,
        channel_id: &str,
        topics: &[String],
        recipients: &[EncryptionParameters],
        signature_params: &SignatureParameters,
    ) -> Result<PersistTransactionResult, TransactionManagerError> {
        let channel_id = normalize_channel_id(channel_id);
        let channel_id = channel_id.as_str();
        let new_channel = normalize_value_hash(&payload) == channel_id;

        let (content, encryption_method) = if !new_channel {
            self.content_for_existing_channel(&payload, channel_id, recipients)
                .await?
        } else if recipients.is_empty() {
            (TransactionsFactory::create_clear_transaction(payload), None)
        } else {
            let (content, _) =
                TransactionsFactory::create_encrypted_transaction_in_new_channel(&payload, recipients)?;
            let method = content.encryption_method.clone();
            (content, method)
        };

        let mut channel_topics = Vec::with_capacity(topics.len() + 1);
        channel_topics.push(channel_id.to_string());
        channel_topics.extend(topics.iter().filter(|t| *t != channel_id).cloned());

        let persisted = self
            .data_access
            .persist_transaction(content, signature_params, &channel_topics)
            .await?;

        tracing::info!(
            channel_id = %channel_id,
            new_channel,
            encrypted = encryption_method.is_some(),
            location = %persisted.location,
            "Channel transaction persisted"
        );

        Ok(PersistTransactionResult {
            channel_id: channel_id.to_string(),
            location: persisted.location,
            storage_meta: persisted.storage_meta,
            encryption_method,
            topics: channel_topics,
        })
    }

    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
    ) -> Result<ChannelTransactions, TransactionManagerError> {
        let channel_id = normalize_channel_id(channel_id);
        let channel_id = channel_id.as_str();
        let found = self.data_access.get_transactions_by_topic(channel_id).await?;
        let channel = self
            .channel_parser
            .decrypt_and_clean_channel(channel_id, &found.confirmed_transactions())
            .await;

        tracing::debug!(
            channel_id = %channel_id,
            valid = channel.valid().count(),
            ignored = channel.ignored().count(),
            "Channel reconstructed"
        );

        Ok(ChannelTransactions {
            channel,
            locations: found.locations,
            storage_metas: found.storage_metas,
        })
    }
}
