//! # Core Entities
//!
//! Decoded transactions and the results of channel reconstruction.

use il_01_data_access::{ConfirmedTransaction, Transaction};
use serde_json::Value;
use shared_crypto::normalize_value_hash;
use shared_types::{ChannelKey, ChannelType, Location, StorageMeta, Timestamp};
use std::fmt;
use std::sync::Arc;

use super::errors::{ParseError, ValidationError};

// =============================================================================
// CLUSTER A: PARSED TRANSACTIONS
// =============================================================================

/// A persisted transaction decoded in its channel context.
#[derive(Debug, Clone)]
pub enum ParsedTransaction {
    /// Payload stored in the clear.
    Clear {
        transaction: Arc<Transaction>,
        data: Value,
    },
    /// Payload decrypted with the channel key.
    Encrypted {
        transaction: Arc<Transaction>,
        decrypted: Vec<u8>,
        declared_hash: String,
    },
}

/// What a valid parsed transaction yields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedData {
    pub data: Value,
    /// Parsed hash: Keccak-256 of the canonical decoded payload.
    pub hash: String,
    /// Address that signed the transaction.
    pub signer: String,
}

impl ParsedTransaction {
    pub fn transaction(&self) -> &Arc<Transaction> {
        match self {
            ParsedTransaction::Clear { transaction, .. }
            | ParsedTransaction::Encrypted { transaction, .. } => transaction,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, ParsedTransaction::Encrypted { .. })
    }

    /// Check the signature and payload, returning the decoded data.
    pub fn validate(&self) -> Result<ValidatedData, ValidationError> {
        let signer = self
            .transaction()
            .recover_signer()
            .map_err(|e| ValidationError::InvalidSignature(e.to_string()))?;

        match self {
            ParsedTransaction::Clear { data, .. } => Ok(ValidatedData {
                hash: normalize_value_hash(data),
                data: data.clone(),
                signer,
            }),
            ParsedTransaction::Encrypted {
                decrypted,
                declared_hash,
                ..
            } => {
                let data: Value = serde_json::from_slice(decrypted)
                    .map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;
                let hash = normalize_value_hash(&data);
                if !hash.eq_ignore_ascii_case(declared_hash) {
                    return Err(ValidationError::HashMismatch);
                }
                Ok(ValidatedData { data, hash, signer })
            }
        }
    }
}

/// Output of parsing one transaction.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub transaction: ParsedTransaction,
    /// Channel key derived from this transaction (first of an encrypted channel).
    pub channel_key: Option<ChannelKey>,
    /// Encryption method declared by this transaction.
    pub encryption_method: Option<String>,
}

// =============================================================================
// CLUSTER B: CHANNEL RECONSTRUCTION
// =============================================================================

/// A transaction kept in the clean channel history.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    pub data: Value,
    pub timestamp: Timestamp,
}

/// Why a transaction was left out of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    Parse(ParseError),
    Validation(ValidationError),
    /// Would-be first transaction whose hash is not the channel id.
    ChannelMismatch,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::Parse(e) => write!(f, "{e}"),
            IgnoreReason::Validation(e) => write!(f, "{e}"),
            IgnoreReason::ChannelMismatch => {
                write!(f, "first transaction hash does not match channel id")
            }
        }
    }
}

/// A transaction excluded from the channel, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoredTransaction {
    pub reason: IgnoreReason,
    pub transaction: ConfirmedTransaction,
}

/// Result of replaying a channel.
///
/// `transactions` and `ignored_transactions` have the input's length; at
/// every index exactly one of them is `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanChannel {
    pub channel_type: ChannelType,
    /// Key fixed by the first transaction of an encrypted channel.
    pub channel_key: Option<ChannelKey>,
    pub encryption_method: Option<String>,
    pub transactions: Vec<Option<ValidTransaction>>,
    pub ignored_transactions: Vec<Option<IgnoredTransaction>>,
}

impl CleanChannel {
    pub fn valid(&self) -> impl Iterator<Item = &ValidTransaction> {
        self.transactions.iter().flatten()
    }

    pub fn ignored(&self) -> impl Iterator<Item = &IgnoredTransaction> {
        self.ignored_transactions.iter().flatten()
    }
}

/// Channel type and key recovered from a channel's history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTypeAndKey {
    pub channel_type: ChannelType,
    pub channel_key: Option<ChannelKey>,
}

// =============================================================================
// CLUSTER C: SERVICE RESULTS
// =============================================================================

/// Outcome of persisting a transaction into a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistTransactionResult {
    pub channel_id: String,
    pub location: Location,
    pub storage_meta: StorageMeta,
    pub encryption_method: Option<String>,
    /// Topics the block was indexed under (channel id first).
    pub topics: Vec<String>,
}

/// A reconstructed channel plus where its transactions are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTransactions {
    pub channel: CleanChannel,
    pub locations: Vec<Location>,
    pub storage_metas: Vec<StorageMeta>,
}
