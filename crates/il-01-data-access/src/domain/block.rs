//! # Block
//!
//! An append-only container of transactions plus a topic index.
//!
//! ## Invariants
//!
//! - Position `p` in `transactions` is the `p`-th transaction ever appended.
//! - Every transaction is indexed under its own content hash.
//! - A topic's position list has no duplicates and grows in append order.
//! - Deriving a block with [`Block::push_transaction`] leaves the source
//!   block untouched. Transactions are shared, never deep-copied.

use serde::{Deserialize, Serialize};
use shared_crypto::CryptoError;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::transaction::Transaction;
use super::value_objects::CURRENT_VERSION;

/// Block metadata: format version and topic index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: String,
    /// Topic -> positions of the transactions registered under it.
    pub index: BTreeMap<String, Vec<usize>>,
}

/// A batch of transactions with its topic index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Arc<Transaction>>,
}

impl Default for Block {
    fn default() -> Self {
        Self::empty()
    }
}

impl Block {
    /// Empty block at the current format version.
    pub fn empty() -> Self {
        Self {
            header: BlockHeader {
                version: CURRENT_VERSION.to_string(),
                index: BTreeMap::new(),
            },
            transactions: Vec::new(),
        }
    }

    /// New block equal to `self` with `transaction` appended.
    ///
    /// The transaction is indexed under each of `topics` and under its own
    /// content hash. Topics are opaque strings and never rejected.
    pub fn push_transaction(
        &self,
        transaction: impl Into<Arc<Transaction>>,
        topics: &[String],
    ) -> Result<Block, CryptoError> {
        let mut next = self.clone();
        next.append_transaction(transaction, topics)?;
        Ok(next)
    }

    /// Append in place and return the new transaction's position.
    ///
    /// On error the block is left unchanged.
    pub fn append_transaction(
        &mut self,
        transaction: impl Into<Arc<Transaction>>,
        topics: &[String],
    ) -> Result<usize, CryptoError> {
        let transaction = transaction.into();
        let position = self.transactions.len();
        let own_hash = transaction.content_hash()?;

        for topic in topics.iter().chain(std::iter::once(&own_hash)) {
            let positions = self.header.index.entry(topic.clone()).or_default();
            // `position` is new to this block, so it can only be last
            if positions.last() != Some(&position) {
                positions.push(position);
            }
        }

        self.transactions.push(transaction);
        Ok(position)
    }

    pub fn transactions(&self) -> &[Arc<Transaction>] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transaction_at(&self, position: usize) -> Option<&Arc<Transaction>> {
        self.transactions.get(position)
    }

    /// Positions registered under `topic`, empty if the topic is unknown.
    pub fn positions_for_topic(&self, topic: &str) -> &[usize] {
        self.header
            .index
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Transactions at `positions`, deduplicated, in ascending position
    /// order. Positions past the end are skipped.
    pub fn transactions_by_positions(&self, positions: &[usize]) -> Vec<Arc<Transaction>> {
        positions
            .iter()
            .copied()
            .collect::<BTreeSet<usize>>()
            .into_iter()
            .filter_map(|p| self.transactions.get(p).cloned())
            .collect()
    }

    /// Union of the positions of every topic in `topics`, ascending.
    pub fn indexes(&self, topics: &[String]) -> Vec<usize> {
        topics
            .iter()
            .flat_map(|topic| self.positions_for_topic(topic).iter().copied())
            .collect::<BTreeSet<usize>>()
            .into_iter()
            .collect()
    }

    /// Every topic key of the index.
    pub fn topics(&self) -> impl Iterator<Item = &String> {
        self.header.index.keys()
    }

    /// Structural check of a block read back from storage.
    pub fn validate(&self) -> Result<(), String> {
        if self.header.version.is_empty() {
            return Err("missing header version".to_string());
        }
        for (topic, positions) in &self.header.index {
            let mut seen = BTreeSet::new();
            for &position in positions {
                if position >= self.transactions.len() {
                    return Err(format!(
                        "topic {topic} references position {position} but block has {} transactions",
                        self.transactions.len()
                    ));
                }
                if !seen.insert(position) {
                    return Err(format!("topic {topic} lists position {position} twice"));
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
