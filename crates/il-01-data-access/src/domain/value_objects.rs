//! # Value Objects
//!
//! Configuration and operation results of the data-access service.

use shared_types::{Location, StorageMeta};
use std::env;
use std::sync::Arc;

use super::transaction::{ConfirmedTransaction, Transaction};

/// Block format version written in every header.
pub const CURRENT_VERSION: &str = "0.1.0";

/// Default number of blocks read from storage concurrently.
pub const DEFAULT_READ_CONCURRENCY: usize = 8;

/// Data-access service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAccessConfig {
    /// Maximum concurrent storage reads during initialization and retrieval.
    /// Results are always consumed in location order.
    pub read_concurrency: usize,
}

impl Default for DataAccessConfig {
    fn default() -> Self {
        Self {
            read_concurrency: DEFAULT_READ_CONCURRENCY,
        }
    }
}

impl DataAccessConfig {
    /// Create configuration from environment variables.
    ///
    /// - `IL_READ_CONCURRENCY`: concurrent block reads (default: 8, minimum 1)
    pub fn from_env() -> Self {
        let read_concurrency = env::var("IL_READ_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_READ_CONCURRENCY);

        Self { read_concurrency }.normalized()
    }

    /// Clamp values into their usable range.
    pub fn normalized(mut self) -> Self {
        self.read_concurrency = self.read_concurrency.max(1);
        self
    }
}

/// Outcome of persisting one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistResult {
    pub location: Location,
    pub storage_meta: StorageMeta,
    /// Every topic the new block indexes, including the content hash.
    pub topics: Vec<String>,
}

/// Transactions registered under a topic, with where each came from.
///
/// The three vectors are parallel: entry `i` of `locations` and
/// `storage_metas` describes `transactions[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicTransactions {
    pub transactions: Vec<Arc<Transaction>>,
    pub locations: Vec<Location>,
    pub storage_metas: Vec<StorageMeta>,
}

impl TopicTransactions {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub(crate) fn push(&mut self, transaction: Arc<Transaction>, location: &str, meta: &StorageMeta) {
        self.transactions.push(transaction);
        self.locations.push(location.to_string());
        self.storage_metas.push(meta.clone());
    }

    /// Pair each transaction with the append timestamp of its block.
    pub fn confirmed_transactions(&self) -> Vec<ConfirmedTransaction> {
        self.transactions
            .iter()
            .zip(&self.storage_metas)
            .map(|(transaction, meta)| ConfirmedTransaction {
                transaction: Arc::clone(transaction),
                timestamp: meta.timestamp,
            })
            .collect()
    }
}
