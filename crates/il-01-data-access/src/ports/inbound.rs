//! # Inbound Ports (Driving Ports)
//!
//! The data-access API: initialize, persist, retrieve by topic.

use async_trait::async_trait;
use shared_types::SignatureParameters;

use crate::domain::{DataAccessError, PersistResult, TopicTransactions, TransactionContent};

/// Primary data-access API (Driving Port).
///
/// Lifecycle: `initialize()` exactly once, then any number of concurrent
/// `persist_transaction` / `get_transactions_by_topic` calls.
#[async_trait]
pub trait DataAccessApi: Send + Sync {
    /// Rebuild the topic index from every block in storage.
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` on a second call
    /// - `CorruptedStorage` if a stored entry is not a well-formed block
    /// - `Storage` if the backend fails
    async fn initialize(&self) -> Result<(), DataAccessError>;

    /// Sign `content`, wrap it in a new block indexed under `topics`, append
    /// it to storage and update the index.
    async fn persist_transaction(
        &self,
        content: TransactionContent,
        signature_params: &SignatureParameters,
        topics: &[String],
    ) -> Result<PersistResult, DataAccessError>;

    /// All transactions registered under `topic`, in storage order.
    async fn get_transactions_by_topic(
        &self,
        topic: &str,
    ) -> Result<TopicTransactions, DataAccessError>;
}
