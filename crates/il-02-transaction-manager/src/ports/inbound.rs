//! # Inbound Ports (Driving Ports)

use async_trait::async_trait;
use serde_json::Value;
use shared_types::{EncryptionParameters, SignatureParameters};

use crate::domain::{ChannelTransactions, PersistTransactionResult, TransactionManagerError};

/// Primary transaction manager API (Driving Port).
#[async_trait]
pub trait TransactionManagerApi: Send + Sync {
    /// Persist `payload` into channel `channel_id`.
    ///
    /// A channel whose id equals the parsed hash of `payload` is created:
    /// clear, or encrypted for `recipients` when any are given. Any other id
    /// must name an existing channel, and `recipients` must then be empty.
    async fn persist_transaction(
        &self,
        payload: Value,
        channel_id: &str,
        topics: &[String],
        recipients: &[EncryptionParameters],
        signature_params: &SignatureParameters,
    ) -> Result<PersistTransactionResult, TransactionManagerError>;

    /// Replay channel `channel_id` into its clean, decrypted history.
    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
    ) -> Result<ChannelTransactions, TransactionManagerError>;
}
